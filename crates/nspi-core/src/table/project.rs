use crate::{
    catalog::CatalogView,
    error::ErrorCode,
    identity::{EntryId, EphemeralEntryId, GUID_NSPI, Mid, PermanentEntryId, ProviderGuid},
    prop::{PropTag, PropType, PropValue, PropertyRow, RowSet, TaggedValue, tags},
};

// Requested columns, or the default projection.
pub(super) fn columns(requested: Option<&[PropTag]>) -> &[PropTag] {
    requested.unwrap_or(&tags::DEFAULT_COLUMNS)
}

// Force every string column to the narrow or wide form.
pub(super) fn with_string_width(columns: &[PropTag], unicode: bool) -> Vec<PropTag> {
    columns
        .iter()
        .map(|&tag| match tag.prop_type() {
            Some(ty) if ty.is_string() => tag.with_type(ty.with_string_width(unicode)),
            _ => tag,
        })
        .collect()
}

///
/// Projector
///
/// Builds rows for objects of one snapshot. Every requested column yields
/// exactly one slot, in request order; a value that is absent or cannot be
/// reported as the requested type becomes a `NotFound` error slot.
///

pub(super) struct Projector<'v, V: ?Sized> {
    view: &'v V,
    provider: ProviderGuid,
    ephemeral: bool,
    container: Mid,
}

impl<'v, V: CatalogView + ?Sized> Projector<'v, V> {
    pub(super) const fn new(
        view: &'v V,
        provider: ProviderGuid,
        ephemeral: bool,
        container: Mid,
    ) -> Self {
        Self {
            view,
            provider,
            ephemeral,
            container,
        }
    }

    pub(super) fn rows(&self, mids: &[Mid], columns: &[PropTag]) -> RowSet {
        mids.iter().map(|&mid| self.row(mid, columns)).collect()
    }

    pub(super) fn row(&self, mid: Mid, columns: &[PropTag]) -> PropertyRow {
        PropertyRow::new(columns.iter().map(|&tag| self.cell(mid, tag)).collect())
    }

    fn cell(&self, mid: Mid, tag: PropTag) -> TaggedValue {
        let Some(target) = tag.prop_type() else {
            return TaggedValue::error(tag, ErrorCode::NotFound);
        };

        match self.value(mid, tag).and_then(|v| v.coerce(target)) {
            Some(value) if target == PropType::Unspecified => {
                TaggedValue::new(tag.with_type(value.prop_type()), value)
            }
            Some(value) => TaggedValue::new(tag, value),
            None => TaggedValue::error(tag, ErrorCode::NotFound),
        }
    }

    fn value(&self, mid: Mid, tag: PropTag) -> Option<PropValue> {
        if mid.is_reserved() || !self.view.contains(mid) {
            return None;
        }

        if tag.same_property(tags::PID_TAG_ENTRY_ID) {
            return self.entry_id(mid).map(|id| PropValue::Binary(id.encode()));
        }
        if tag.same_property(tags::PID_TAG_RECORD_KEY) {
            return self
                .permanent_id(mid)
                .map(|id| PropValue::Binary(id.encode()));
        }
        if tag.same_property(tags::PID_TAG_INSTANCE_KEY) {
            return Some(PropValue::Binary(mid.to_le_bytes().to_vec()));
        }
        if tag.same_property(tags::PID_TAG_SEARCH_KEY) {
            return self.view.dn(mid).map(|dn| PropValue::Binary(search_key(dn)));
        }
        if tag.same_property(tags::PID_TAG_MAPPING_SIGNATURE) {
            return Some(PropValue::Binary(GUID_NSPI.as_bytes().to_vec()));
        }
        if tag.same_property(tags::PID_TAG_ADDRESS_BOOK_CONTAINER_ID) {
            return Some(PropValue::Integer32(self.container.raw().cast_signed()));
        }

        self.view.property(mid, tag).cloned()
    }

    fn entry_id(&self, mid: Mid) -> Option<EntryId> {
        if self.ephemeral {
            let display_type = self.view.display_type(mid)?;
            return Some(EntryId::Ephemeral(EphemeralEntryId::new(
                self.provider,
                display_type,
                mid,
            )));
        }

        self.permanent_id(mid).map(EntryId::Permanent)
    }

    fn permanent_id(&self, mid: Mid) -> Option<PermanentEntryId> {
        let display_type = self.view.display_type(mid)?;
        let dn = self.view.dn(mid)?;

        PermanentEntryId::new(display_type, dn).ok()
    }
}

// "EX:" + upper-cased DN, NUL terminated.
fn search_key(dn: &str) -> Vec<u8> {
    let mut key = b"EX:".to_vec();
    key.extend(dn.to_ascii_uppercase().bytes());
    key.push(0);

    key
}
