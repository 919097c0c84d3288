use crate::{
    catalog::CatalogView,
    identity::Mid,
    prop::{PropTag, PropValue, compare_values, tags},
    restriction::{FuzzyLevel, Relop, Restriction, anr_matches},
};
use std::cmp::Ordering;

///
/// PropertySource
///
/// Minimal property access used by the evaluator, so it runs over catalog
/// objects and plain test rows alike.
///

pub trait PropertySource {
    fn prop(&self, tag: PropTag) -> Option<&PropValue>;

    fn dn(&self) -> Option<&str>;
}

///
/// ObjectRow
///
/// One catalog object viewed as a property source.
///

pub struct ObjectRow<'a, V: ?Sized> {
    view: &'a V,
    mid: Mid,
}

impl<'a, V: CatalogView + ?Sized> ObjectRow<'a, V> {
    pub const fn new(view: &'a V, mid: Mid) -> Self {
        Self { view, mid }
    }
}

impl<V: CatalogView + ?Sized> PropertySource for ObjectRow<'_, V> {
    fn prop(&self, tag: PropTag) -> Option<&PropValue> {
        self.view.property(self.mid, tag)
    }

    fn dn(&self) -> Option<&str> {
        self.view.dn(self.mid)
    }
}

/// Evaluate one restriction against one row.
#[must_use]
pub fn evaluate<R: PropertySource + ?Sized>(row: &R, restriction: &Restriction) -> bool {
    match restriction {
        Restriction::And(children) => children.iter().all(|c| evaluate(row, c)),
        Restriction::Or(children) => children.iter().any(|c| evaluate(row, c)),
        Restriction::Not(child) => !evaluate(row, child),
        Restriction::Exists { tag } => row.prop(*tag).is_some(),
        Restriction::Content { fuzzy, tag, value } => eval_content(row, *tag, value, *fuzzy),
        Restriction::Property { relop, tag, value } => {
            if tag.same_property(tags::PID_TAG_ANR) {
                return value.as_text().is_some_and(|text| anr_matches(row, text));
            }
            eval_property(row, *tag, *relop, value)
        }
    }
}

/// Scan `rows` in order and keep matches, stopping once `cap` were found.
/// Returns the matches and the number of rows examined.
#[must_use]
pub fn filter_rows<V: CatalogView + ?Sized>(
    view: &V,
    rows: &[Mid],
    restriction: &Restriction,
    cap: usize,
) -> (Vec<Mid>, usize) {
    let mut matched = Vec::new();
    let mut scanned = 0;

    for &mid in rows {
        if matched.len() >= cap {
            break;
        }
        scanned += 1;
        if evaluate(&ObjectRow::new(view, mid), restriction) {
            matched.push(mid);
        }
    }

    (matched, scanned)
}

// Substring/prefix/full match over every text (or binary) value.
fn eval_content<R: PropertySource + ?Sized>(
    row: &R,
    tag: PropTag,
    needle: &PropValue,
    fuzzy: FuzzyLevel,
) -> bool {
    let Some(stored) = row.prop(tag) else {
        return false;
    };

    if let Some(needle) = needle.as_text() {
        let fold = |s: &str| -> String {
            if fuzzy.ignore_case() {
                s.chars().flat_map(char::to_lowercase).collect()
            } else {
                s.to_string()
            }
        };
        let needle = fold(needle);

        return stored
            .text_values()
            .into_iter()
            .any(|hay| match_mode(fold(hay).as_bytes(), needle.as_bytes(), fuzzy));
    }

    if let PropValue::Binary(needle) = needle {
        return stored
            .binary_values()
            .into_iter()
            .any(|hay| match_mode(hay, needle, fuzzy));
    }

    false
}

fn match_mode(hay: &[u8], needle: &[u8], fuzzy: FuzzyLevel) -> bool {
    match fuzzy.mode() {
        FuzzyLevel::FULLSTRING => hay == needle,
        FuzzyLevel::PREFIX => hay.starts_with(needle),
        FuzzyLevel::SUBSTRING => needle.is_empty() || hay.windows(needle.len()).any(|w| w == needle),
        _ => false,
    }
}

// Relational comparison; multi-valued properties match if any value does.
fn eval_property<R: PropertySource + ?Sized>(
    row: &R,
    tag: PropTag,
    relop: Relop,
    literal: &PropValue,
) -> bool {
    let Some(stored) = row.prop(tag) else {
        return false;
    };

    let holds = |ord: Ordering| match relop {
        Relop::Lt => ord == Ordering::Less,
        Relop::Le => ord != Ordering::Greater,
        Relop::Gt => ord == Ordering::Greater,
        Relop::Ge => ord != Ordering::Less,
        Relop::Eq => ord == Ordering::Equal,
        Relop::Ne => ord != Ordering::Equal,
        Relop::Re | Relop::MemberOfDl => false,
    };

    expand(stored)
        .iter()
        .any(|value| compare_values(value, literal).is_some_and(holds))
}

// Split a multi-valued property into single values for comparison.
fn expand(value: &PropValue) -> Vec<PropValue> {
    match value {
        PropValue::MultiInteger16(v) => v.iter().copied().map(PropValue::Integer16).collect(),
        PropValue::MultiInteger32(v) => v.iter().copied().map(PropValue::Integer32).collect(),
        PropValue::MultiString8(v) => v.iter().cloned().map(PropValue::String8).collect(),
        PropValue::MultiUnicode(v) => v.iter().cloned().map(PropValue::Unicode).collect(),
        PropValue::MultiTime(v) => v.iter().copied().map(PropValue::Time).collect(),
        PropValue::MultiGuid(v) => v.iter().copied().map(PropValue::Guid).collect(),
        PropValue::MultiBinary(v) => v.iter().cloned().map(PropValue::Binary).collect(),
        single => vec![single.clone()],
    }
}
