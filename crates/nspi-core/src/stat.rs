//! STAT: the caller-owned position block threaded through table operations.
//!
//! Operations never mutate a STAT in place. They build the successor with
//! the `with_*` helpers and the caller's copy is replaced only on success.

use crate::identity::Mid;

pub use nspi_config::{CP_TELETEX, CP_WINUNICODE, NSPI_DEFAULT_LOCALE};

///
/// SortType
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u32)]
pub enum SortType {
    DisplayName = 0,
    PhoneticDisplayName = 3,
    DisplayNameReadOnly = 1000,
    DisplayNameW = 1001,
}

impl SortType {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::DisplayName),
            3 => Some(Self::PhoneticDisplayName),
            1000 => Some(Self::DisplayNameReadOnly),
            1001 => Some(Self::DisplayNameW),
            _ => None,
        }
    }

    /// Collation dimension a container is ordered by under this sort type.
    #[must_use]
    pub const fn key(self) -> SortKey {
        match self {
            Self::PhoneticDisplayName => SortKey::PhoneticDisplayName,
            Self::DisplayName | Self::DisplayNameReadOnly | Self::DisplayNameW => {
                SortKey::DisplayName
            }
        }
    }
}

///
/// SortKey
///
/// Property a container's rows are ordered by.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SortKey {
    DisplayName,
    PhoneticDisplayName,
}

///
/// Stat
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stat {
    /// Raw sort type; unknown values pass through untouched.
    pub sort_type: u32,
    pub container_id: Mid,
    pub current_rec: Mid,
    pub delta: i32,
    pub num_pos: u32,
    pub total_recs: u32,
    pub code_page: u32,
    pub template_locale: u32,
    pub sort_locale: u32,
}

impl Stat {
    /// A beginning-of-table STAT over the GAL with default locales.
    #[must_use]
    pub const fn new(code_page: u32) -> Self {
        Self {
            sort_type: SortType::DisplayName.raw(),
            container_id: Mid::new(0),
            current_rec: Mid::BEGINNING_OF_TABLE,
            delta: 0,
            num_pos: 0,
            total_recs: 0,
            code_page,
            template_locale: NSPI_DEFAULT_LOCALE,
            sort_locale: NSPI_DEFAULT_LOCALE,
        }
    }

    #[must_use]
    pub const fn sort(&self) -> Option<SortType> {
        SortType::from_raw(self.sort_type)
    }

    /// Copy with a new position triple.
    #[must_use]
    pub const fn with_position(self, current_rec: Mid, num_pos: u32, total_recs: u32) -> Self {
        Self {
            current_rec,
            num_pos,
            total_recs,
            ..self
        }
    }

    #[must_use]
    pub const fn with_delta(self, delta: i32) -> Self {
        Self { delta, ..self }
    }

    #[must_use]
    pub const fn with_total_recs(self, total_recs: u32) -> Self {
        Self { total_recs, ..self }
    }

    #[must_use]
    pub const fn with_container(self, container_id: Mid) -> Self {
        Self {
            container_id,
            ..self
        }
    }
}

impl Default for Stat {
    fn default() -> Self {
        Self::new(1252)
    }
}

///
/// TESTS
///
