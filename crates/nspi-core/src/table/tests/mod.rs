mod edit;

use crate::{
    catalog::MemoryCatalog,
    identity::Mid,
    prop::{PropValue, PropertyRow, tags},
    stat::Stat,
    table::{NspiServer, Session},
};

// Bind on `server` and hand back the live session.
pub(super) fn open(server: &NspiServer<MemoryCatalog>) -> Session<'_, MemoryCatalog> {
    let binding = match server.bind(0, &Stat::default(), false) {
        Ok(binding) => binding,
        Err(code) => panic!("bind must succeed: {code}"),
    };

    match server.session(binding.handle) {
        Some(session) => session,
        None => panic!("bound handle must name a session"),
    }
}

// A STAT positioned at `current` in the GAL.
pub(super) fn at(current: Mid) -> Stat {
    Stat {
        current_rec: current,
        ..Stat::default()
    }
}

pub(super) fn display_name(row: &PropertyRow) -> Option<&str> {
    row.value_of(tags::PID_TAG_DISPLAY_NAME)
        .and_then(PropValue::as_text)
}

pub(super) fn names(rows: &[PropertyRow]) -> Vec<&str> {
    rows.iter().filter_map(display_name).collect()
}
