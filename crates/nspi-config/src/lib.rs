//! Server configuration and directory seed schema for NspiDB.
//!
//! Configuration is loaded from TOML. The `[server]` table controls protocol
//! policy (code pages, locales, limits); the `[directory]` table seeds the
//! in-memory catalog with containers, objects and templates.

mod error;
mod seed;
mod server;

#[cfg(test)]
mod tests;

pub use error::ConfigError;
pub use seed::{
    ContainerSeed, DirectorySeed, ObjectKind, ObjectSeed, PropertySeed, SeedValue, TemplateSeed,
};
pub use server::ServerSection;

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

///
/// Constants
///

/// Unicode code page; never valid where an 8-bit code page is required.
pub const CP_WINUNICODE: u32 = 0x04B0;

/// Teletex code page, always accepted by a conforming server.
pub const CP_TELETEX: u32 = 0x4F25;

/// Default locale every server must support.
pub const NSPI_DEFAULT_LOCALE: u32 = 0x0409;

///
/// ServerConfig
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub directory: DirectorySeed,
}

impl ServerConfig {
    /// Parse and validate a configuration document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        validate_directory(&self.directory)
    }
}

// Every DN is unique (case-insensitive) and every reference names a
// declared container or object.
fn validate_directory(directory: &DirectorySeed) -> Result<(), ConfigError> {
    // Phase 1: collect declared names.
    let mut containers = HashSet::new();
    let mut all = HashSet::new();

    for container in &directory.containers {
        let key = container.dn.to_ascii_lowercase();
        if !all.insert(key.clone()) {
            return Err(ConfigError::DuplicateDn {
                dn: container.dn.clone(),
            });
        }
        containers.insert(key);
    }
    for dn in directory
        .objects
        .iter()
        .map(|o| &o.dn)
        .chain(directory.templates.iter().map(|t| &t.dn))
    {
        if !all.insert(dn.to_ascii_lowercase()) {
            return Err(ConfigError::DuplicateDn { dn: dn.clone() });
        }
    }

    // Phase 2: resolve references.
    let dangling = |from: &str, to: &str| ConfigError::UnknownReference {
        from: from.to_string(),
        to: to.to_string(),
    };

    for container in &directory.containers {
        if let Some(parent) = &container.parent
            && !containers.contains(&parent.to_ascii_lowercase())
        {
            return Err(dangling(&container.dn, parent));
        }
    }

    for object in &directory.objects {
        for container in &object.containers {
            if !containers.contains(&container.to_ascii_lowercase()) {
                return Err(dangling(&object.dn, container));
            }
        }
        for link in object.members.iter().chain(&object.public_delegates) {
            if !all.contains(&link.to_ascii_lowercase()) {
                return Err(dangling(&object.dn, link));
            }
        }
    }

    Ok(())
}
