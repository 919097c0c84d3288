use super::PropType;
use crate::error::ErrorCode;

///
/// PropValue
///
/// One typed property value. String values keep their narrow/wide form so
/// projections can report the type a caller asked for.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PropValue {
    Null,
    Integer16(i16),
    Integer32(i32),
    Integer64(i64),
    Boolean(bool),
    Error(ErrorCode),
    String8(String),
    Unicode(String),
    /// FILETIME ticks.
    Time(u64),
    Guid([u8; 16]),
    Binary(Vec<u8>),
    MultiInteger16(Vec<i16>),
    MultiInteger32(Vec<i32>),
    MultiString8(Vec<String>),
    MultiUnicode(Vec<String>),
    MultiTime(Vec<u64>),
    MultiGuid(Vec<[u8; 16]>),
    MultiBinary(Vec<Vec<u8>>),
}

impl PropValue {
    #[must_use]
    pub const fn prop_type(&self) -> PropType {
        match self {
            Self::Null => PropType::Null,
            Self::Integer16(_) => PropType::Integer16,
            Self::Integer32(_) => PropType::Integer32,
            Self::Integer64(_) => PropType::Integer64,
            Self::Boolean(_) => PropType::Boolean,
            Self::Error(_) => PropType::ErrorCode,
            Self::String8(_) => PropType::String8,
            Self::Unicode(_) => PropType::String,
            Self::Time(_) => PropType::Time,
            Self::Guid(_) => PropType::Guid,
            Self::Binary(_) => PropType::Binary,
            Self::MultiInteger16(_) => PropType::MultipleInteger16,
            Self::MultiInteger32(_) => PropType::MultipleInteger32,
            Self::MultiString8(_) => PropType::MultipleString8,
            Self::MultiUnicode(_) => PropType::MultipleString,
            Self::MultiTime(_) => PropType::MultipleTime,
            Self::MultiGuid(_) => PropType::MultipleGuid,
            Self::MultiBinary(_) => PropType::MultipleBinary,
        }
    }

    /// Single-valued text, either width.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String8(s) | Self::Unicode(s) => Some(s),
            _ => None,
        }
    }

    /// Every text value, single or multi-valued.
    #[must_use]
    pub fn text_values(&self) -> Vec<&str> {
        match self {
            Self::String8(s) | Self::Unicode(s) => vec![s.as_str()],
            Self::MultiString8(v) | Self::MultiUnicode(v) => v.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Every binary value, single or multi-valued.
    #[must_use]
    pub fn binary_values(&self) -> Vec<&[u8]> {
        match self {
            Self::Binary(b) => vec![b.as_slice()],
            Self::MultiBinary(v) => v.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    /// Convert to `target`, if the value can be reported as that type.
    ///
    /// `Unspecified` keeps the stored type. Narrow and wide strings convert
    /// into each other; every other mismatch yields `None`.
    #[must_use]
    pub fn coerce(&self, target: PropType) -> Option<Self> {
        if target == PropType::Unspecified || target == self.prop_type() {
            return Some(self.clone());
        }

        let converted = match (self, target) {
            (Self::String8(s) | Self::Unicode(s), PropType::String8) => Self::String8(s.clone()),
            (Self::String8(s) | Self::Unicode(s), PropType::String) => Self::Unicode(s.clone()),
            (Self::MultiString8(v) | Self::MultiUnicode(v), PropType::MultipleString8) => {
                Self::MultiString8(v.clone())
            }
            (Self::MultiString8(v) | Self::MultiUnicode(v), PropType::MultipleString) => {
                Self::MultiUnicode(v.clone())
            }
            _ => return None,
        };

        Some(converted)
    }

    /// Multi-valued properties with no values are treated as absent.
    #[must_use]
    pub fn is_empty_multi(&self) -> bool {
        match self {
            Self::MultiInteger16(v) => v.is_empty(),
            Self::MultiInteger32(v) => v.is_empty(),
            Self::MultiString8(v) | Self::MultiUnicode(v) => v.is_empty(),
            Self::MultiTime(v) => v.is_empty(),
            Self::MultiGuid(v) => v.is_empty(),
            Self::MultiBinary(v) => v.is_empty(),
            _ => false,
        }
    }
}
