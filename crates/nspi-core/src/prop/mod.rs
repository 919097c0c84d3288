//! Module: prop
//! Responsibility: property tags, property types and typed property values.
//! Does not own: which properties an object has (catalog) or row assembly
//! (table projection).
//!
//! Invariants:
//! - A tag is `(id << 16) | type`; two tags naming the same id address the
//!   same stored value regardless of the requested type.
//! - Narrow/wide string conversion is the only type conversion performed.

mod compare;
mod row;
pub mod tags;
mod value;


pub use compare::{compare_values, text_eq_ignore_case};
pub use row::{PropertyRow, RowSet, TaggedValue};
pub use value::PropValue;

use std::fmt;

///
/// PropType
///
/// Property types recognised by the engine. Discriminants are the wire values.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u16)]
pub enum PropType {
    Unspecified = 0x0000,
    Null = 0x0001,
    Integer16 = 0x0002,
    Integer32 = 0x0003,
    ErrorCode = 0x000A,
    Boolean = 0x000B,
    EmbeddedTable = 0x000D,
    Integer64 = 0x0014,
    String8 = 0x001E,
    String = 0x001F,
    Time = 0x0040,
    Guid = 0x0048,
    Binary = 0x0102,
    MultipleInteger16 = 0x1002,
    MultipleInteger32 = 0x1003,
    MultipleString8 = 0x101E,
    MultipleString = 0x101F,
    MultipleTime = 0x1040,
    MultipleGuid = 0x1048,
    MultipleBinary = 0x1102,
}

impl PropType {
    /// Bit marking a multi-valued type.
    pub const MULTI_FLAG: u16 = 0x1000;

    const ALL: [Self; 20] = [
        Self::Unspecified,
        Self::Null,
        Self::Integer16,
        Self::Integer32,
        Self::ErrorCode,
        Self::Boolean,
        Self::EmbeddedTable,
        Self::Integer64,
        Self::String8,
        Self::String,
        Self::Time,
        Self::Guid,
        Self::Binary,
        Self::MultipleInteger16,
        Self::MultipleInteger32,
        Self::MultipleString8,
        Self::MultipleString,
        Self::MultipleTime,
        Self::MultipleGuid,
        Self::MultipleBinary,
    ];

    #[must_use]
    pub const fn raw(self) -> u16 {
        self as u16
    }

    #[must_use]
    pub fn from_raw(raw: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.raw() == raw)
    }

    #[must_use]
    pub const fn is_multi(self) -> bool {
        self.raw() & Self::MULTI_FLAG != 0
    }

    /// Narrow or wide string, single or multi-valued.
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(
            self,
            Self::String8 | Self::String | Self::MultipleString8 | Self::MultipleString
        )
    }

    /// Swap a string type for its wide (`unicode = true`) or narrow form.
    /// Non-string types are returned unchanged.
    #[must_use]
    pub const fn with_string_width(self, unicode: bool) -> Self {
        match (self, unicode) {
            (Self::String8 | Self::String, true) => Self::String,
            (Self::String8 | Self::String, false) => Self::String8,
            (Self::MultipleString8 | Self::MultipleString, true) => Self::MultipleString,
            (Self::MultipleString8 | Self::MultipleString, false) => Self::MultipleString8,
            (other, _) => other,
        }
    }
}

///
/// PropTag
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PropTag(u32);

impl PropTag {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn from_parts(id: u16, prop_type: PropType) -> Self {
        Self(((id as u32) << 16) | prop_type.raw() as u32)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Property identifier (high 16 bits).
    #[must_use]
    pub const fn id(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Raw type bits (low 16 bits).
    #[must_use]
    pub const fn type_bits(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    #[must_use]
    pub fn prop_type(self) -> Option<PropType> {
        PropType::from_raw(self.type_bits())
    }

    /// Same property id with a different type.
    #[must_use]
    pub const fn with_type(self, prop_type: PropType) -> Self {
        Self::from_parts(self.id(), prop_type)
    }

    /// Same property id re-typed as an error-code slot.
    #[must_use]
    pub const fn as_error(self) -> Self {
        self.with_type(PropType::ErrorCode)
    }

    #[must_use]
    pub const fn same_property(self, other: Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for PropTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropTag({:#010X})", self.0)
    }
}

impl fmt::Display for PropTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

impl From<u32> for PropTag {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
