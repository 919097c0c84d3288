//! ## Crate layout
//! - `config`: TOML server configuration and directory seeds.
//! - `core`: entry identities, STAT positioning, restrictions, the catalog
//!   contract and the address-book method surface.
//! - `error`: the public error type returned while opening a server.
//!
//! The `prelude` module mirrors the surface a protocol front end needs:
//! bind a session, then drive the `AddressBook` methods through it.

pub use nspi_config as config;
pub use nspi_core as core;

mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

use nspi_config::ServerConfig;
use nspi_core::catalog::MemoryCatalog;
use std::path::Path;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server over the in-memory catalog.
pub type Server = nspi_core::table::NspiServer<MemoryCatalog>;

/// Load a TOML configuration file and build a server from it.
pub fn open(path: impl AsRef<Path>) -> Result<Server, Error> {
    let config = ServerConfig::load(path)?;

    from_config(&config)
}

/// Parse a TOML configuration document and build a server from it.
pub fn from_toml_str(source: &str) -> Result<Server, Error> {
    let config = ServerConfig::from_toml_str(source)?;

    from_config(&config)
}

/// Build a server from an already parsed configuration.
pub fn from_config(config: &ServerConfig) -> Result<Server, Error> {
    config.validate()?;
    let catalog = MemoryCatalog::from_seed(&config.directory)?;

    tracing::info!(
        server = %config.server.name,
        containers = config.directory.containers.len(),
        objects = config.directory.objects.len(),
        templates = config.directory.templates.len(),
        "directory loaded"
    );

    Ok(Server::new(catalog, config.server.clone()))
}

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Server,
        core::{
            catalog::{CatalogView as _, GAL, ObjectCatalog as _},
            error::{ErrorCode, NspiResult},
            identity::{DisplayType, EntryId, Mid},
            prop::{PropTag, PropType, PropValue, PropertyRow, TaggedValue, tags},
            restriction::{FuzzyLevel, Relop, Restriction},
            stat::{SortType, Stat},
            table::{
                AddressBook, AddressBookEdit, Binding, ContextHandle, PropertyName, Session, flags,
            },
        },
    };
}
