//! Single-object reads: GetProps, GetPropList, QueryColumns.

use crate::{
    catalog::{CatalogView, ObjectCatalog},
    error::{ErrorCode, NspiResult},
    identity::Mid,
    obs::Method,
    prop::{PropTag, PropType, tags},
    stat::{CP_WINUNICODE, Stat},
    table::{
        PropsReply, Session, check_code_page, flags,
        project::{Projector, columns},
    },
};

pub(super) fn get_props<C: ObjectCatalog>(
    session: &Session<'_, C>,
    flag_bits: u32,
    stat: &Stat,
    tags: Option<&[PropTag]>,
) -> NspiResult<PropsReply> {
    session.run(Method::GetProps, |span| {
        check_code_page(session.config(), stat.code_page)?;

        let view = session.view();
        let projector = Projector::new(
            &view,
            session.provider_guid(),
            flag_bits & flags::EPH_ID != 0,
            stat.container_id,
        );
        let row = projector.row(stat.current_rec, columns(tags));

        let code = if row.has_errors() {
            span.errors_returned();
            ErrorCode::ErrorsReturned
        } else {
            ErrorCode::Success
        };
        span.set_rows(1);

        Ok(PropsReply { code, row })
    })
}

pub(super) fn get_prop_list<C: ObjectCatalog>(
    session: &Session<'_, C>,
    flag_bits: u32,
    mid: Mid,
    code_page: u32,
) -> NspiResult<Vec<PropTag>> {
    session.run(Method::GetPropList, |span| {
        // Phase 1: the code page only picks the string width reported.
        let unicode = code_page == CP_WINUNICODE;
        if !unicode {
            check_code_page(session.config(), code_page)?;
        }

        // Phase 2: stored tags plus the entry id, typed for the caller.
        let view = session.view();
        let Some(stored) = view.prop_tags(mid) else {
            return Ok(Vec::new());
        };

        let mut list: Vec<PropTag> = stored
            .into_iter()
            .chain([tags::PID_TAG_ENTRY_ID])
            .filter(|tag| {
                flag_bits & flags::SKIP_OBJECTS == 0
                    || tag.prop_type() != Some(PropType::EmbeddedTable)
            })
            .map(|tag| match tag.prop_type() {
                Some(ty) if ty.is_string() => tag.with_type(ty.with_string_width(unicode)),
                _ => tag,
            })
            .collect();
        list.sort_unstable();
        list.dedup();

        span.set_rows(list.len());
        Ok(list)
    })
}

pub(super) fn query_columns<C: ObjectCatalog>(
    session: &Session<'_, C>,
    flag_bits: u32,
) -> NspiResult<Vec<PropTag>> {
    session.run(Method::QueryColumns, |span| {
        let unicode = flag_bits & flags::UNICODE_PROPTYPES != 0;
        let view = session.view();

        let mut columns: Vec<PropTag> = view
            .known_tags()
            .into_iter()
            .chain(tags::COMPUTED)
            .map(|tag| match tag.prop_type() {
                Some(ty) if ty.is_string() => tag.with_type(ty.with_string_width(unicode)),
                _ => tag,
            })
            .collect();
        columns.sort_unstable_by_key(|tag| tag.id());
        columns.dedup_by_key(|tag| tag.id());

        span.set_rows(columns.len());
        Ok(columns)
    })
}
