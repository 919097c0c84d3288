//! Core engine for NSPI address-book access: entry identities, STAT
//! positioning, restriction evaluation, and the table operations built on
//! top of them, with the domain vocabulary exported via the `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod catalog;
pub mod cursor;
pub mod error;
pub mod identity;
pub mod obs;
pub mod prop;
pub mod restriction;
pub mod stat;
pub mod table;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary and the method surface.
/// No catalog internals, cursor math or metrics plumbing are re-exported here.
///

pub mod prelude {
    pub use crate::{
        catalog::{CatalogView as _, GAL, ObjectCatalog as _},
        error::{ErrorCode, NspiResult},
        identity::{DisplayType, EntryId, Mid},
        prop::{PropTag, PropType, PropValue, PropertyRow, TaggedValue, tags},
        restriction::{FuzzyLevel, Relop, Restriction},
        stat::{SortType, Stat},
        table::{AddressBook, AddressBookEdit, NspiServer, PropertyName, Session},
    };
}
