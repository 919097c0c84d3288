use crate::{
    catalog::fold,
    prop::{PropTag, tags},
    restriction::PropertySource,
};

// Properties whose values an ANR query may prefix-match.
const ANR_PROPERTIES: [PropTag; 6] = [
    tags::PID_TAG_DISPLAY_NAME,
    tags::PID_TAG_ACCOUNT,
    tags::PID_TAG_GIVEN_NAME,
    tags::PID_TAG_SURNAME,
    tags::PID_TAG_SMTP_ADDRESS,
    tags::PID_TAG_ADDRESS_BOOK_PHONETIC_DISPLAY_NAME,
];

/// Ambiguous name resolution for one object.
///
/// - `/o=...` style input matches a DN exactly (case-insensitive).
/// - `SMTP:addr` matches the SMTP address exactly.
/// - Anything else is a case-insensitive prefix of a name property or of
///   any word of the display name.
#[must_use]
pub fn anr_matches<R: PropertySource + ?Sized>(row: &R, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }

    if query.starts_with('/') {
        return row.dn().is_some_and(|dn| dn.eq_ignore_ascii_case(query));
    }

    if let Some(address) = strip_prefix_ignore_case(query, "smtp:") {
        return row
            .prop(tags::PID_TAG_SMTP_ADDRESS)
            .and_then(|v| v.as_text())
            .is_some_and(|smtp| smtp.eq_ignore_ascii_case(address));
    }

    let needle = fold(query);
    let prefixed = |text: &str| fold(text).starts_with(&needle);

    ANR_PROPERTIES.iter().any(|&tag| {
        row.prop(tag).and_then(|v| v.as_text()).is_some_and(|text| {
            prefixed(text)
                || (tag == tags::PID_TAG_DISPLAY_NAME && text.split_whitespace().any(&prefixed))
        })
    })
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
