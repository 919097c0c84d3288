//! Directory writes: ModProps and ModLinkAtt.

use crate::{
    catalog::{CatalogView, CatalogWriter, ObjectCatalog},
    error::{ErrorCode, NspiResult},
    identity::{DisplayType, EntryId, Mid, ProviderGuid},
    obs::Method,
    prop::{PropTag, PropType, PropValue, TaggedValue, tags},
    stat::Stat,
    table::{Session, check_code_page, flags},
};

// Properties a caller may rewrite on a mail user.
const MODIFIABLE: [PropTag; 2] = [
    tags::PID_TAG_USER_X509_CERTIFICATE,
    tags::PID_TAG_ADDRESS_BOOK_X509_CERTIFICATE,
];

fn modifiable(tag: PropTag) -> bool {
    MODIFIABLE.iter().any(|m| m.same_property(tag))
}

pub(super) fn mod_props<C: ObjectCatalog + CatalogWriter>(
    session: &Session<'_, C>,
    stat: &Stat,
    remove: Option<&[PropTag]>,
    row: &[TaggedValue],
) -> NspiResult<()> {
    session.run(Method::ModProps, |span| {
        check_code_page(session.config(), stat.code_page)?;
        let remove = remove.ok_or(ErrorCode::InvalidParameter)?;

        // Phase 1: target object and permission.
        let mid = stat.current_rec;
        let view = session.view();
        if mid.is_reserved() || !view.contains(mid) {
            return Err(ErrorCode::InvalidParameter);
        }
        if view.display_type(mid) != Some(DisplayType::MAILUSER) {
            return Err(ErrorCode::AccessDenied);
        }
        let mut tags_touched = remove.iter().copied().chain(row.iter().map(|v| v.tag));
        if !tags_touched.all(modifiable) {
            return Err(ErrorCode::AccessDenied);
        }

        // Phase 2: certificates are stored as multi-valued binary.
        let set = row
            .iter()
            .map(|value| match &value.value {
                PropValue::MultiBinary(_) => Ok(TaggedValue::new(
                    value.tag.with_type(PropType::MultipleBinary),
                    value.value.clone(),
                )),
                _ => Err(ErrorCode::InvalidParameter),
            })
            .collect::<NspiResult<Vec<_>>>()?;

        session.server.catalog().modify_properties(mid, remove, &set)?;

        span.set_rows(1);
        tracing::debug!(?mid, removed = remove.len(), set = set.len(), "properties modified");
        Ok(())
    })
}

pub(super) fn mod_link_att<C: ObjectCatalog + CatalogWriter>(
    session: &Session<'_, C>,
    flag_bits: u32,
    tag: PropTag,
    mid: Mid,
    entry_ids: &[Vec<u8>],
) -> NspiResult<()> {
    session.run(Method::ModLinkAtt, |span| {
        // Phase 1: the link property and its owner.
        let (link, owner_type) = if tag.same_property(tags::PID_TAG_ADDRESS_BOOK_MEMBER) {
            (tags::PID_TAG_ADDRESS_BOOK_MEMBER, DisplayType::DISTLIST)
        } else if tag.same_property(tags::PID_TAG_ADDRESS_BOOK_PUBLIC_DELEGATES) {
            (
                tags::PID_TAG_ADDRESS_BOOK_PUBLIC_DELEGATES,
                DisplayType::MAILUSER,
            )
        } else {
            return Err(ErrorCode::NotFound);
        };

        let view = session.view();
        if mid.is_reserved() || !view.contains(mid) {
            return Err(ErrorCode::InvalidParameter);
        }
        if view.display_type(mid) != Some(owner_type) {
            return Err(ErrorCode::AccessDenied);
        }

        // Phase 2: decode every id before touching the directory.
        let mut targets = Vec::with_capacity(entry_ids.len());
        for bytes in entry_ids {
            let id = EntryId::decode(bytes).map_err(|err| {
                tracing::debug!(%err, "malformed entry id in link edit");
                ErrorCode::GeneralFailure
            })?;
            if let Some(target) = target_of(&view, session.provider_guid(), &id) {
                targets.push(target);
            }
        }

        let delete = flag_bits & flags::DELETE != 0;
        session
            .server
            .catalog()
            .modify_links(mid, link, &targets, delete)?;

        span.set_rows(targets.len());
        Ok(())
    })
}

// Live object an entry id names, if any. Ephemeral ids only resolve for
// the session that issued them.
fn target_of<V: CatalogView + ?Sized>(
    view: &V,
    provider: ProviderGuid,
    id: &EntryId,
) -> Option<Mid> {
    match id {
        EntryId::Ephemeral(id) => {
            (id.provider == provider && !id.mid.is_reserved() && view.contains(id.mid))
                .then_some(id.mid)
        }
        EntryId::Permanent(id) => view.resolve_dn(&id.dn),
    }
}
