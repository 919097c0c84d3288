//! Module: table
//! Responsibility: the address-book method surface. Each method composes
//! cursor positioning, restriction evaluation and row projection over one
//! catalog snapshot.
//! Does not own: wire marshaling, session transport or directory storage.
//!
//! Invariants:
//! - A method takes exactly one catalog view at entry.
//! - The caller's STAT is replaced only when the method succeeds.
//! - Reserved parameters never influence a result.

mod browse;
mod edit;
pub mod flags;
mod project;
mod props;
mod search;
mod session;
mod special;

#[cfg(test)]
mod tests;

pub use session::{Binding, ContextHandle, NspiServer, Session};

use crate::{
    catalog::{CatalogView, CatalogWriter, ObjectCatalog},
    error::{ErrorCode, NspiResult},
    identity::Mid,
    obs::Method,
    prop::{PropTag, PropertyRow, RowSet, TaggedValue},
    restriction::Restriction,
    stat::{CP_WINUNICODE, SortKey, SortType, Stat},
};
use nspi_config::ServerSection;

///
/// PropertyName
///
/// Named-property reference; only the PS_MAPI namespace, where `id` is a
/// property id, is understood.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PropertyName {
    pub guid: [u8; 16],
    pub id: u32,
}

impl PropertyName {
    /// PS_MAPI {00020328-0000-0000-C000-000000000046}.
    pub const PS_MAPI: [u8; 16] = [
        0x28, 0x03, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x46,
    ];

    #[must_use]
    pub fn mapi(tag: PropTag) -> Self {
        Self {
            guid: Self::PS_MAPI,
            id: u32::from(tag.id()),
        }
    }
}

///
/// PropsReply
///
/// One projected object. `code` is `Success` or `ErrorsReturned`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropsReply {
    pub code: ErrorCode,
    pub row: PropertyRow,
}

///
/// MatchesReply
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MatchesReply {
    pub mids: Vec<Mid>,
    pub rows: RowSet,
}

///
/// ResolveReply
///
/// One entry of `mids` per input name: `Mid::UNRESOLVED`, `Mid::AMBIGUOUS`
/// or the resolved object. `rows` holds only the resolved names.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolveReply {
    pub mids: Vec<Mid>,
    pub rows: RowSet,
}

///
/// SpecialTable
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SpecialTable {
    pub version: u32,
    pub rows: RowSet,
}

///
/// AddressBook
///
/// Read side of the method surface for one bound session.
///

pub trait AddressBook {
    /// Position the STAT without reading rows. With `want_delta`, returns
    /// the distance actually moved and zeroes `Delta`.
    fn update_stat(&self, reserved: u32, stat: &mut Stat, want_delta: bool)
    -> NspiResult<Option<i32>>;

    fn query_rows(
        &self,
        flags: u32,
        stat: &mut Stat,
        table: Option<&[Mid]>,
        count: u32,
        tags: Option<&[PropTag]>,
    ) -> NspiResult<RowSet>;

    fn get_props(&self, flags: u32, stat: &Stat, tags: Option<&[PropTag]>)
    -> NspiResult<PropsReply>;

    #[allow(clippy::too_many_arguments)]
    fn get_matches(
        &self,
        reserved: u32,
        stat: &mut Stat,
        reserved_table: Option<&[Mid]>,
        reserved2: u32,
        filter: Option<&Restriction>,
        prop_name: Option<&PropertyName>,
        requested: u32,
        tags: Option<&[PropTag]>,
    ) -> NspiResult<MatchesReply>;

    fn seek_entries(
        &self,
        reserved: u32,
        stat: &mut Stat,
        target: &TaggedValue,
        table: Option<&[Mid]>,
        tags: Option<&[PropTag]>,
    ) -> NspiResult<RowSet>;

    fn resort_restriction(&self, reserved: u32, stat: &mut Stat, mids: &[Mid])
    -> NspiResult<Vec<Mid>>;

    fn compare_mids(&self, reserved: u32, stat: &Stat, mid1: Mid, mid2: Mid) -> NspiResult<i32>;

    fn dn_to_mid(&self, reserved: u32, names: &[&str]) -> NspiResult<Vec<Mid>>;

    fn resolve_names(
        &self,
        reserved: u32,
        stat: &Stat,
        tags: Option<&[PropTag]>,
        names: &[&str],
    ) -> NspiResult<ResolveReply>;

    fn resolve_names_w(
        &self,
        reserved: u32,
        stat: &Stat,
        tags: Option<&[PropTag]>,
        names: &[&str],
    ) -> NspiResult<ResolveReply>;

    fn get_prop_list(&self, flags: u32, mid: Mid, code_page: u32) -> NspiResult<Vec<PropTag>>;

    fn query_columns(&self, reserved: u32, flags: u32) -> NspiResult<Vec<PropTag>>;

    fn get_special_table(&self, flags: u32, stat: &Stat, version: u32) -> NspiResult<SpecialTable>;

    fn get_template_info(
        &self,
        flags: u32,
        display_type: u32,
        dn: Option<&str>,
        code_page: u32,
        locale: u32,
    ) -> NspiResult<PropertyRow>;
}

///
/// AddressBookEdit
///
/// Write side of the method surface; needs a writable catalog.
///

pub trait AddressBookEdit {
    fn mod_props(
        &self,
        reserved: u32,
        stat: &Stat,
        remove: Option<&[PropTag]>,
        row: &[TaggedValue],
    ) -> NspiResult<()>;

    fn mod_link_att(&self, flags: u32, tag: PropTag, mid: Mid, entry_ids: &[Vec<u8>])
    -> NspiResult<()>;
}

impl<C: ObjectCatalog> AddressBook for Session<'_, C> {
    fn update_stat(
        &self,
        _reserved: u32,
        stat: &mut Stat,
        want_delta: bool,
    ) -> NspiResult<Option<i32>> {
        browse::update_stat(self, stat, want_delta)
    }

    fn query_rows(
        &self,
        flags: u32,
        stat: &mut Stat,
        table: Option<&[Mid]>,
        count: u32,
        tags: Option<&[PropTag]>,
    ) -> NspiResult<RowSet> {
        browse::query_rows(self, flags, stat, table, count, tags)
    }

    fn get_props(
        &self,
        flags: u32,
        stat: &Stat,
        tags: Option<&[PropTag]>,
    ) -> NspiResult<PropsReply> {
        props::get_props(self, flags, stat, tags)
    }

    #[allow(clippy::too_many_arguments)]
    fn get_matches(
        &self,
        _reserved: u32,
        stat: &mut Stat,
        _reserved_table: Option<&[Mid]>,
        _reserved2: u32,
        filter: Option<&Restriction>,
        prop_name: Option<&PropertyName>,
        requested: u32,
        tags: Option<&[PropTag]>,
    ) -> NspiResult<MatchesReply> {
        search::get_matches(self, stat, filter, prop_name, requested, tags)
    }

    fn seek_entries(
        &self,
        _reserved: u32,
        stat: &mut Stat,
        target: &TaggedValue,
        table: Option<&[Mid]>,
        tags: Option<&[PropTag]>,
    ) -> NspiResult<RowSet> {
        browse::seek_entries(self, stat, target, table, tags)
    }

    fn resort_restriction(
        &self,
        _reserved: u32,
        stat: &mut Stat,
        mids: &[Mid],
    ) -> NspiResult<Vec<Mid>> {
        search::resort_restriction(self, stat, mids)
    }

    fn compare_mids(&self, _reserved: u32, stat: &Stat, mid1: Mid, mid2: Mid) -> NspiResult<i32> {
        search::compare_mids(self, stat, mid1, mid2)
    }

    fn dn_to_mid(&self, _reserved: u32, names: &[&str]) -> NspiResult<Vec<Mid>> {
        search::dn_to_mid(self, names)
    }

    fn resolve_names(
        &self,
        _reserved: u32,
        stat: &Stat,
        tags: Option<&[PropTag]>,
        names: &[&str],
    ) -> NspiResult<ResolveReply> {
        search::resolve_names(self, Method::ResolveNames, stat, tags, names, false)
    }

    fn resolve_names_w(
        &self,
        _reserved: u32,
        stat: &Stat,
        tags: Option<&[PropTag]>,
        names: &[&str],
    ) -> NspiResult<ResolveReply> {
        search::resolve_names(self, Method::ResolveNamesW, stat, tags, names, true)
    }

    fn get_prop_list(&self, flags: u32, mid: Mid, code_page: u32) -> NspiResult<Vec<PropTag>> {
        props::get_prop_list(self, flags, mid, code_page)
    }

    fn query_columns(&self, _reserved: u32, flags: u32) -> NspiResult<Vec<PropTag>> {
        props::query_columns(self, flags)
    }

    fn get_special_table(&self, flags: u32, stat: &Stat, _version: u32) -> NspiResult<SpecialTable> {
        special::get_special_table(self, flags, stat)
    }

    fn get_template_info(
        &self,
        flags: u32,
        display_type: u32,
        dn: Option<&str>,
        code_page: u32,
        locale: u32,
    ) -> NspiResult<PropertyRow> {
        special::get_template_info(self, flags, display_type, dn, code_page, locale)
    }
}

impl<C: ObjectCatalog + CatalogWriter> AddressBookEdit for Session<'_, C> {
    fn mod_props(
        &self,
        _reserved: u32,
        stat: &Stat,
        remove: Option<&[PropTag]>,
        row: &[TaggedValue],
    ) -> NspiResult<()> {
        edit::mod_props(self, stat, remove, row)
    }

    fn mod_link_att(
        &self,
        flags: u32,
        tag: PropTag,
        mid: Mid,
        entry_ids: &[Vec<u8>],
    ) -> NspiResult<()> {
        edit::mod_link_att(self, flags, tag, mid, entry_ids)
    }
}

// CP_WINUNICODE is never a STAT code page; anything else must be configured.
fn check_code_page(config: &ServerSection, code_page: u32) -> NspiResult<()> {
    if code_page == CP_WINUNICODE || !config.supports_code_page(code_page) {
        return Err(ErrorCode::InvalidCodepage);
    }

    Ok(())
}

// Collation key for the STAT's sort type.
fn sort_key(config: &ServerSection, stat: &Stat) -> NspiResult<SortKey> {
    match stat.sort() {
        Some(SortType::PhoneticDisplayName) if !config.phonetic_sort => {
            Err(ErrorCode::GeneralFailure)
        }
        Some(sort) => Ok(sort.key()),
        None => Err(ErrorCode::GeneralFailure),
    }
}

// Sorted rows of the STAT's container.
fn container_rows<'v, V: CatalogView + ?Sized>(
    view: &'v V,
    stat: &Stat,
    key: SortKey,
) -> NspiResult<&'v [Mid]> {
    view.container_rows(stat.container_id, key)
        .ok_or(ErrorCode::InvalidBookmark)
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
