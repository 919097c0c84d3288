use super::PropValue;
use std::cmp::Ordering;

/// Compare two single-valued property values.
///
/// Integers (including booleans) compare numerically across widths, text
/// compares ordinally across narrow/wide forms, binaries and GUIDs compare
/// bytewise. Any other pairing is incomparable and yields `None`.
#[must_use]
pub fn compare_values(left: &PropValue, right: &PropValue) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (numeric(left), numeric(right)) {
        return Some(l.cmp(&r));
    }

    match (left, right) {
        (PropValue::Time(l), PropValue::Time(r)) => Some(l.cmp(r)),
        (PropValue::Binary(l), PropValue::Binary(r)) => Some(l.as_slice().cmp(r.as_slice())),
        (PropValue::Guid(l), PropValue::Guid(r)) => Some(l.cmp(r)),
        _ => match (left.as_text(), right.as_text()) {
            (Some(l), Some(r)) => Some(l.cmp(r)),
            _ => None,
        },
    }
}

/// Case-insensitive text equality under the engine's collation.
#[must_use]
pub fn text_eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

// Widen integer-like values to one domain; booleans compare as 0/1.
const fn numeric(value: &PropValue) -> Option<i64> {
    match value {
        PropValue::Integer16(v) => Some(*v as i64),
        PropValue::Integer32(v) => Some(*v as i64),
        PropValue::Integer64(v) => Some(*v),
        PropValue::Boolean(v) => Some(*v as i64),
        _ => None,
    }
}
