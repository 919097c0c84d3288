use super::{PropTag, PropValue};
use crate::error::ErrorCode;
use derive_more::{Deref, IntoIterator};

///
/// TaggedValue
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedValue {
    pub tag: PropTag,
    pub value: PropValue,
}

impl TaggedValue {
    #[must_use]
    pub const fn new(tag: PropTag, value: PropValue) -> Self {
        Self { tag, value }
    }

    /// Error slot for a property that could not be returned.
    #[must_use]
    pub const fn error(tag: PropTag, code: ErrorCode) -> Self {
        Self {
            tag: tag.as_error(),
            value: PropValue::Error(code),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.value, PropValue::Error(_))
    }
}

///
/// PropertyRow
///
/// One projected row. Column order is the requested tag order, duplicates
/// included.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct PropertyRow(#[into_iterator(owned, ref)] Vec<TaggedValue>);

impl PropertyRow {
    #[must_use]
    pub const fn new(values: Vec<TaggedValue>) -> Self {
        Self(values)
    }

    /// Look up the first column addressing `tag`'s property id.
    #[must_use]
    pub fn value_of(&self, tag: PropTag) -> Option<&PropValue> {
        self.0
            .iter()
            .find(|v| v.tag.same_property(tag))
            .map(|v| &v.value)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(TaggedValue::is_error)
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<TaggedValue> {
        self.0
    }
}

/// Ordered rows returned by table reads.
pub type RowSet = Vec<PropertyRow>;
