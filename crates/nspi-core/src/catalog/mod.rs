//! Module: catalog
//! Responsibility: the directory data contract the table engine reads
//! through, plus the in-memory implementation.
//! Does not own: positioning, projection or restriction semantics.
//!
//! Invariants:
//! - One `view()` is an immutable snapshot; every read within one method
//!   goes through the same view.
//! - Container rows are ordered by the requested sort key under the
//!   engine collation, Minimal Entry ID breaking ties.
//! - Container `0` is the Global Address List.

mod memory;
mod seed;

#[cfg(test)]
mod tests;

pub use memory::{ContainerRecord, Directory, MemoryCatalog, TemplateRecord};

use crate::{
    error::InternalError,
    identity::{DisplayType, Mid},
    prop::{PropTag, PropValue, TaggedValue},
    stat::SortKey,
};
use std::{cmp::Ordering, sync::Arc};

/// Container id of the Global Address List.
pub const GAL: Mid = Mid::new(0);

///
/// ObjectCatalog
///
/// Source of consistent directory snapshots.
///

pub trait ObjectCatalog: Send + Sync {
    type View: CatalogView;

    fn view(&self) -> Self::View;
}

///
/// CatalogView
///
/// Read access to one directory snapshot.
///

pub trait CatalogView {
    /// Rows of a container in sort order; `None` for unknown containers.
    fn container_rows(&self, container: Mid, key: SortKey) -> Option<&[Mid]>;

    /// Whether `mid` names a live object of any kind.
    fn contains(&self, mid: Mid) -> bool;

    fn display_type(&self, mid: Mid) -> Option<DisplayType>;

    fn dn(&self, mid: Mid) -> Option<&str>;

    /// Stored value for `tag`'s property id, whatever its stored type.
    fn property(&self, mid: Mid, tag: PropTag) -> Option<&PropValue>;

    /// Tags of every stored property, typed as stored.
    fn prop_tags(&self, mid: Mid) -> Option<Vec<PropTag>>;

    /// Case-insensitive DN lookup.
    fn resolve_dn(&self, dn: &str) -> Option<Mid>;

    /// Address-book containers in hierarchy order.
    fn containers(&self) -> &[ContainerRecord];

    fn hierarchy_version(&self) -> u32;

    fn templates(&self) -> &[TemplateRecord];

    /// Every property tag stored anywhere in the directory.
    fn known_tags(&self) -> Vec<PropTag>;

    /// Text the object sorts by under `key`.
    fn sort_text(&self, mid: Mid, key: SortKey) -> Option<&str>;

    fn total_count(&self, container: Mid) -> Option<u32> {
        self.container_rows(container, SortKey::DisplayName)
            .map(|rows| u32::try_from(rows.len()).unwrap_or(u32::MAX))
    }
}

impl<V: CatalogView + ?Sized> CatalogView for Arc<V> {
    fn container_rows(&self, container: Mid, key: SortKey) -> Option<&[Mid]> {
        (**self).container_rows(container, key)
    }

    fn contains(&self, mid: Mid) -> bool {
        (**self).contains(mid)
    }

    fn display_type(&self, mid: Mid) -> Option<DisplayType> {
        (**self).display_type(mid)
    }

    fn dn(&self, mid: Mid) -> Option<&str> {
        (**self).dn(mid)
    }

    fn property(&self, mid: Mid, tag: PropTag) -> Option<&PropValue> {
        (**self).property(mid, tag)
    }

    fn prop_tags(&self, mid: Mid) -> Option<Vec<PropTag>> {
        (**self).prop_tags(mid)
    }

    fn resolve_dn(&self, dn: &str) -> Option<Mid> {
        (**self).resolve_dn(dn)
    }

    fn containers(&self) -> &[ContainerRecord] {
        (**self).containers()
    }

    fn hierarchy_version(&self) -> u32 {
        (**self).hierarchy_version()
    }

    fn templates(&self) -> &[TemplateRecord] {
        (**self).templates()
    }

    fn known_tags(&self) -> Vec<PropTag> {
        (**self).known_tags()
    }

    fn sort_text(&self, mid: Mid, key: SortKey) -> Option<&str> {
        (**self).sort_text(mid, key)
    }
}

///
/// CatalogWriter
///
/// Mutation side of a catalog. Each call is atomic: it either applies
/// completely or leaves the directory untouched.
///

pub trait CatalogWriter {
    /// Remove `remove`, then store `set`, on one object.
    fn modify_properties(
        &self,
        mid: Mid,
        remove: &[PropTag],
        set: &[TaggedValue],
    ) -> Result<(), InternalError>;

    /// Add (or with `delete`, remove) link targets of a DN-valued property.
    fn modify_links(
        &self,
        mid: Mid,
        tag: PropTag,
        targets: &[Mid],
        delete: bool,
    ) -> Result<(), InternalError>;
}

/// Engine collation: case-insensitive, then ordinal.
#[must_use]
pub fn collate(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));

    folded.then_with(|| left.cmp(right))
}

/// Folded form of `text` used for prefix matching.
#[must_use]
pub fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}
