//! Explicit-table producers: GetMatches, ResortRestriction, CompareMIds,
//! DNToMId and name resolution.

use crate::{
    catalog::{CatalogView, GAL, ObjectCatalog, collate},
    cursor,
    error::{ErrorCode, NspiResult},
    identity::Mid,
    obs::Method,
    prop::{PropTag, PropValue},
    restriction::{ObjectRow, Restriction, anr_matches, filter_rows},
    stat::{SortKey, SortType, Stat},
    table::{
        MatchesReply, PropertyName, ResolveReply, Session, check_code_page, container_rows,
        project::{Projector, columns, with_string_width},
        sort_key, to_u32, to_usize,
    },
};
use std::{cmp::Ordering, collections::HashSet};

pub(super) fn get_matches<C: ObjectCatalog>(
    session: &Session<'_, C>,
    stat: &mut Stat,
    filter: Option<&Restriction>,
    prop_name: Option<&PropertyName>,
    requested: u32,
    tags: Option<&[PropTag]>,
) -> NspiResult<MatchesReply> {
    session.run(Method::GetMatches, |span| {
        let config = session.config();
        check_code_page(config, stat.code_page)?;
        if requested > config.max_explicit_table {
            return Err(ErrorCode::TableTooBig);
        }
        let cap = to_usize(requested);
        let view = session.view();

        // Phase 1: build the explicit table.
        let mids = match filter {
            Some(filter) => {
                let key = match stat.sort() {
                    Some(SortType::DisplayName) => SortKey::DisplayName,
                    Some(SortType::PhoneticDisplayName) if config.phonetic_sort => {
                        SortKey::PhoneticDisplayName
                    }
                    _ => return Err(ErrorCode::GeneralFailure),
                };
                let rows = container_rows(&view, stat, key)?;
                filter.validate(config.max_restriction_depth)?;

                let (matched, scanned) = filter_rows(&view, rows, filter, cap);
                span.scanned(scanned);
                matched
            }
            None => {
                let current = stat.current_rec;
                if current.is_reserved() || !view.contains(current) {
                    return Err(ErrorCode::GeneralFailure);
                }
                let mut mids = match prop_name {
                    None => vec![current],
                    Some(name) => linked_objects(&view, current, name)?,
                };
                mids.truncate(cap);
                mids
            }
        };

        // Phase 2: project against the output STAT.
        let next = stat.with_container(stat.current_rec);
        let projector = Projector::new(&view, session.provider_guid(), true, next.container_id);
        let rows = projector.rows(&mids, columns(tags));

        span.set_rows(rows.len());
        *stat = next;
        Ok(MatchesReply { mids, rows })
    })
}

// Objects named by the DN values of a link property.
fn linked_objects<V: CatalogView + ?Sized>(
    view: &V,
    mid: Mid,
    name: &PropertyName,
) -> NspiResult<Vec<Mid>> {
    if name.guid != PropertyName::PS_MAPI {
        return Err(ErrorCode::GeneralFailure);
    }
    let id = u16::try_from(name.id).map_err(|_| ErrorCode::GeneralFailure)?;
    let tag = PropTag::from_parts(id, crate::prop::PropType::Unspecified);

    let linked = match view.property(mid, tag) {
        Some(PropValue::MultiString8(dns) | PropValue::MultiUnicode(dns)) => dns
            .iter()
            .filter_map(|dn| view.resolve_dn(dn))
            .collect(),
        Some(PropValue::String8(dn) | PropValue::Unicode(dn)) => {
            view.resolve_dn(dn).into_iter().collect()
        }
        _ => Vec::new(),
    };

    Ok(linked)
}

pub(super) fn resort_restriction<C: ObjectCatalog>(
    session: &Session<'_, C>,
    stat: &mut Stat,
    mids: &[Mid],
) -> NspiResult<Vec<Mid>> {
    session.run(Method::ResortRestriction, |span| {
        let config = session.config();
        check_code_page(config, stat.code_page)?;
        let key = sort_key(config, stat)?;

        let view = session.view();
        container_rows(&view, stat, key)?;

        // Live objects only, first occurrence wins.
        let mut seen = HashSet::new();
        let mut sorted: Vec<Mid> = mids
            .iter()
            .copied()
            .filter(|&mid| !mid.is_reserved() && view.contains(mid) && seen.insert(mid))
            .collect();
        sorted.sort_by(|a, b| by_sort_text(&view, key, *a, *b));

        let total = to_u32(sorted.len());
        let next = match sorted.iter().position(|&mid| mid == stat.current_rec) {
            Some(at) => stat.with_position(stat.current_rec, to_u32(at), total),
            None => stat.with_position(Mid::BEGINNING_OF_TABLE, 0, total),
        };

        span.set_rows(sorted.len());
        *stat = next;
        Ok(sorted)
    })
}

fn by_sort_text<V: CatalogView + ?Sized>(view: &V, key: SortKey, a: Mid, b: Mid) -> Ordering {
    let left = view.sort_text(a, key).unwrap_or_default();
    let right = view.sort_text(b, key).unwrap_or_default();

    collate(left, right).then_with(|| a.cmp(&b))
}

pub(super) fn compare_mids<C: ObjectCatalog>(
    session: &Session<'_, C>,
    stat: &Stat,
    mid1: Mid,
    mid2: Mid,
) -> NspiResult<i32> {
    session.run(Method::CompareMids, |_| {
        let config = session.config();
        check_code_page(config, stat.code_page)?;
        let key = sort_key(config, stat)?;

        let view = session.view();
        let rows = container_rows(&view, stat, key)?;

        let offset = |mid| {
            cursor::locate(rows, mid)
                .map(|slot| slot.offset(rows.len()))
                .map_err(|_| ErrorCode::GeneralFailure)
        };
        let ordering = offset(mid1)?.cmp(&offset(mid2)?);

        Ok(match ordering {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        })
    })
}

pub(super) fn dn_to_mid<C: ObjectCatalog>(
    session: &Session<'_, C>,
    names: &[&str],
) -> NspiResult<Vec<Mid>> {
    session.run(Method::DnToMid, |span| {
        let view = session.view();
        let mids: Vec<Mid> = names
            .iter()
            .map(|dn| view.resolve_dn(dn).unwrap_or(Mid::UNRESOLVED))
            .collect();

        span.set_rows(mids.len());
        Ok(mids)
    })
}

pub(super) fn resolve_names<C: ObjectCatalog>(
    session: &Session<'_, C>,
    method: Method,
    stat: &Stat,
    tags: Option<&[PropTag]>,
    names: &[&str],
    unicode: bool,
) -> NspiResult<ResolveReply> {
    session.run(method, |span| {
        check_code_page(session.config(), stat.code_page)?;

        let view = session.view();
        let gal = view
            .container_rows(GAL, SortKey::DisplayName)
            .unwrap_or_default();

        let mut scanned = 0;
        let mids: Vec<Mid> = names
            .iter()
            .map(|name| {
                let (mid, examined) = resolve_one(&view, gal, name);
                scanned += examined;
                mid
            })
            .collect();
        span.scanned(scanned);

        let resolved: Vec<Mid> = mids.iter().copied().filter(|m| !m.is_reserved()).collect();
        let columns = with_string_width(columns(tags), unicode);
        let projector = Projector::new(&view, session.provider_guid(), false, stat.container_id);
        let rows = projector.rows(&resolved, &columns);

        span.set_rows(rows.len());
        Ok(ResolveReply { mids, rows })
    })
}

// Resolve one name; DNs resolve directly, anything else by ANR over the GAL.
fn resolve_one<V: CatalogView + ?Sized>(view: &V, gal: &[Mid], name: &str) -> (Mid, usize) {
    let trimmed = name.trim();
    if trimmed.starts_with('/') {
        let mid = view.resolve_dn(trimmed).unwrap_or(Mid::UNRESOLVED);
        return (mid, 0);
    }

    let mut hits = gal
        .iter()
        .copied()
        .filter(|&mid| anr_matches(&ObjectRow::new(view, mid), trimmed));

    let mid = match (hits.next(), hits.next()) {
        (None, _) => Mid::UNRESOLVED,
        (Some(only), None) => only,
        (Some(_), Some(_)) => Mid::AMBIGUOUS,
    };

    (mid, gal.len())
}
