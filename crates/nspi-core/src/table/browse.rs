//! Positioning and sequential reads: UpdateStat, QueryRows, SeekEntries.

use crate::{
    catalog::{CatalogView, ObjectCatalog, fold},
    cursor::{self, Positioned, Slot},
    error::{ErrorCode, NspiResult},
    identity::Mid,
    obs::Method,
    prop::{PropTag, RowSet, TaggedValue, tags},
    stat::{SortKey, SortType, Stat},
    table::{
        Session, check_code_page, container_rows, flags,
        project::{Projector, columns},
        sort_key, to_u32, to_usize,
    },
};

pub(super) fn update_stat<C: ObjectCatalog>(
    session: &Session<'_, C>,
    stat: &mut Stat,
    want_delta: bool,
) -> NspiResult<Option<i32>> {
    session.run(Method::UpdateStat, |_| {
        let config = session.config();
        check_code_page(config, stat.code_page)?;
        let key = sort_key(config, stat)?;

        let view = session.view();
        let rows = container_rows(&view, stat, key)?;
        let positioned = cursor::position(rows, stat)?;

        let next = positioned.apply(*stat);
        let (next, moved) = if want_delta {
            (next.with_delta(0), Some(positioned.moved))
        } else {
            (next, None)
        };

        *stat = next;
        Ok(moved)
    })
}

pub(super) fn query_rows<C: ObjectCatalog>(
    session: &Session<'_, C>,
    flag_bits: u32,
    stat: &mut Stat,
    table: Option<&[Mid]>,
    count: u32,
    tags: Option<&[PropTag]>,
) -> NspiResult<RowSet> {
    session.run(Method::QueryRows, |span| {
        let config = session.config();
        check_code_page(config, stat.code_page)?;

        let view = session.view();
        let projector = Projector::new(
            &view,
            session.provider_guid(),
            flag_bits & flags::EPH_ID != 0,
            stat.container_id,
        );
        let columns = columns(tags);

        let (rows, next) = match table {
            Some(table) => read_explicit(&view, &projector, *stat, table, count, columns),
            None => {
                if count == 0 {
                    return Err(ErrorCode::InvalidParameter);
                }
                let key = sort_key(config, stat)?;
                let rows = container_rows(&view, stat, key)?;
                read_container(&projector, *stat, rows, count, columns)?
            }
        };

        span.set_rows(rows.len());
        *stat = next;
        Ok(rows)
    })
}

// Read live entries of an explicit table from its start. `count` caps the
// rows returned (0 = all); the STAT records how far the table was consumed
// and Delta is spent.
fn read_explicit<V: CatalogView + ?Sized>(
    view: &V,
    projector: &Projector<'_, V>,
    stat: Stat,
    table: &[Mid],
    count: u32,
    columns: &[PropTag],
) -> (RowSet, Stat) {
    let cap = if count == 0 { usize::MAX } else { to_usize(count) };

    let mut live = Vec::new();
    let mut consumed = 0;
    for &mid in table {
        if live.len() >= cap {
            break;
        }
        consumed += 1;
        if view.contains(mid) {
            live.push(mid);
        }
    }

    let current = table.get(consumed).copied().unwrap_or(Mid::END_OF_TABLE);
    let next = stat
        .with_position(current, to_u32(consumed), to_u32(table.len()))
        .with_delta(0);

    (projector.rows(&live, columns), next)
}

// Position, then read up to `count` rows forward and advance past them.
fn read_container<V: CatalogView + ?Sized>(
    projector: &Projector<'_, V>,
    stat: Stat,
    rows: &[Mid],
    count: u32,
    columns: &[PropTag],
) -> NspiResult<(RowSet, Stat)> {
    let positioned = cursor::position(rows, &stat)?;

    let start = positioned.slot.read_start(rows.len());
    let end = start.saturating_add(to_usize(count)).min(rows.len());
    let read = &rows[start..end];

    let after = if end < rows.len() {
        Slot::Row(end)
    } else {
        Slot::EndOfTable
    };
    let next = Positioned::at(rows, after).apply(stat).with_delta(0);

    Ok((projector.rows(read, columns), next))
}

pub(super) fn seek_entries<C: ObjectCatalog>(
    session: &Session<'_, C>,
    stat: &mut Stat,
    target: &TaggedValue,
    table: Option<&[Mid]>,
    tags: Option<&[PropTag]>,
) -> NspiResult<RowSet> {
    session.run(Method::SeekEntries, |span| {
        let config = session.config();
        check_code_page(config, stat.code_page)?;

        // Phase 1: the target must address the sort property.
        let (sort_tag, key) = match stat.sort() {
            Some(SortType::DisplayName) => (tags::PID_TAG_DISPLAY_NAME, SortKey::DisplayName),
            Some(SortType::PhoneticDisplayName) if config.phonetic_sort => (
                tags::PID_TAG_ADDRESS_BOOK_PHONETIC_DISPLAY_NAME,
                SortKey::PhoneticDisplayName,
            ),
            _ => return Err(ErrorCode::GeneralFailure),
        };
        let string_typed = target
            .tag
            .prop_type()
            .is_some_and(|ty| ty.is_string() && !ty.is_multi());
        if !target.tag.same_property(sort_tag) || !string_typed {
            return Err(ErrorCode::GeneralFailure);
        }
        let needle = target
            .value
            .as_text()
            .map(fold)
            .ok_or(ErrorCode::GeneralFailure)?;

        // Phase 2: first row at or after the target.
        let view = session.view();
        let rows = match table {
            Some(table) => table,
            None => container_rows(&view, stat, key)?,
        };
        let found = rows
            .iter()
            .position(|&mid| fold(view.sort_text(mid, key).unwrap_or_default()) >= needle)
            .ok_or(ErrorCode::NotFound)?;

        // Phase 3: project as a plain read from the found row.
        let projector = Projector::new(&view, session.provider_guid(), false, stat.container_id);
        let read = if table.is_some() {
            &rows[found..]
        } else {
            &rows[found..=found]
        };
        let out = projector.rows(read, columns(tags));

        span.set_rows(out.len());
        *stat = Positioned::at(rows, Slot::Row(found)).apply(*stat).with_delta(0);
        Ok(out)
    })
}
