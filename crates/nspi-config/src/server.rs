use crate::{CP_TELETEX, CP_WINUNICODE, ConfigError, NSPI_DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};

///
/// ServerSection
///
/// Protocol policy knobs. Every field has a default so an empty
/// `[server]` table is a valid configuration.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerSection {
    /// Server name, mixed into session provider GUID derivation.
    pub name: String,

    /// Accept binds carrying the anonymous-login flag.
    pub allow_anonymous: bool,

    /// 8-bit code pages accepted in STAT blocks.
    pub code_pages: Vec<u32>,

    /// Locales the server has templates and collation for.
    pub locales: Vec<u32>,

    /// Phonetic display-name sorting is available.
    pub phonetic_sort: bool,

    /// Upper bound on rows requested from an explicit-table build.
    pub max_explicit_table: u32,

    /// Maximum nesting depth of a restriction tree.
    pub max_restriction_depth: u32,
}

impl ServerSection {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.code_pages.is_empty() {
            return Err(ConfigError::NoCodePages);
        }
        if self.code_pages.contains(&CP_WINUNICODE) {
            return Err(ConfigError::UnicodeCodePage(CP_WINUNICODE));
        }
        if !self.locales.contains(&NSPI_DEFAULT_LOCALE) {
            return Err(ConfigError::MissingDefaultLocale(NSPI_DEFAULT_LOCALE));
        }
        if self.max_explicit_table == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_explicit_table",
            });
        }
        if self.max_restriction_depth == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_restriction_depth",
            });
        }

        Ok(())
    }

    /// Whether `code_page` is an accepted 8-bit code page.
    #[must_use]
    pub fn supports_code_page(&self, code_page: u32) -> bool {
        code_page != CP_WINUNICODE && self.code_pages.contains(&code_page)
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: "nspidb".to_string(),
            allow_anonymous: true,
            code_pages: vec![1252, 20127, CP_TELETEX, 28591],
            locales: vec![NSPI_DEFAULT_LOCALE],
            phonetic_sort: true,
            max_explicit_table: 10_000,
            max_restriction_depth: 32,
        }
    }
}
