use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no 8-bit code pages configured")]
    NoCodePages,

    #[error("code page {0:#06x} is unicode and cannot be listed as an 8-bit code page")]
    UnicodeCodePage(u32),

    #[error("locale list must include the default locale {0:#06x}")]
    MissingDefaultLocale(u32),

    #[error("limit '{field}' must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("duplicate distinguished name '{dn}'")]
    DuplicateDn { dn: String },

    #[error("'{from}' references unknown entry '{to}'")]
    UnknownReference { from: String, to: String },
}
