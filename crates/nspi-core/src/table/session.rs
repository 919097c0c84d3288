use crate::{
    catalog::ObjectCatalog,
    error::{ErrorCode, NspiResult},
    identity::ProviderGuid,
    obs::{
        Method,
        sink::{MetricsEvent, Span, record},
    },
    stat::Stat,
    table::{check_code_page, flags},
};
use dashmap::DashMap;
use nspi_config::ServerSection;
use sha2::{Digest, Sha256};
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

const GUID_DOMAIN_TAG: &[u8] = b"nspi:session-guid:v1";

///
/// ContextHandle
///
/// Opaque handle naming one bound session.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ContextHandle(u64);

impl ContextHandle {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx-{:08x}", self.0)
    }
}

///
/// Binding
///
/// Result of a successful bind. `server_guid` is present only when the
/// caller asked for it.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Binding {
    pub handle: ContextHandle,
    pub server_guid: Option<ProviderGuid>,
}

///
/// NspiServer
///
/// Owns the catalog, the server settings and the bound sessions.
///

#[derive(Debug)]
pub struct NspiServer<C: ObjectCatalog> {
    catalog: C,
    config: ServerSection,
    sessions: DashMap<ContextHandle, ProviderGuid>,
    next_handle: AtomicU64,
    nonce: u128,
}

impl<C: ObjectCatalog> NspiServer<C> {
    #[must_use]
    pub fn new(catalog: C, config: ServerSection) -> Self {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());

        Self {
            catalog,
            config,
            sessions: DashMap::new(),
            next_handle: AtomicU64::new(1),
            nonce,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &ServerSection {
        &self.config
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Open a session. Flag bits other than anonymous-login are ignored.
    pub fn bind(&self, flags: u32, stat: &Stat, want_guid: bool) -> NspiResult<Binding> {
        let mut span = Span::new(Method::Bind);
        let result = self.bind_inner(flags, stat, want_guid);

        span.finish(result)
    }

    fn bind_inner(&self, flags: u32, stat: &Stat, want_guid: bool) -> NspiResult<Binding> {
        check_code_page(&self.config, stat.code_page)?;
        if flags & flags::ANONYMOUS_LOGIN != 0 && !self.config.allow_anonymous {
            return Err(ErrorCode::LogonFailed);
        }

        let handle = ContextHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let guid = self.derive_guid(handle);
        self.sessions.insert(handle, guid);

        record(MetricsEvent::SessionBound);
        tracing::info!(%handle, server = %self.config.name, "session bound");

        Ok(Binding {
            handle,
            server_guid: want_guid.then_some(guid),
        })
    }

    /// Close a session: `UNBIND_SUCCESS`, or `UNBIND_FAILURE` for an
    /// unknown handle.
    pub fn unbind(&self, handle: ContextHandle, _reserved: u32) -> u32 {
        let mut span = Span::new(Method::Unbind);
        let removed = self.sessions.remove(&handle).is_some();
        let _ = span.finish(Ok(()));

        if removed {
            record(MetricsEvent::SessionUnbound);
            tracing::info!(%handle, "session unbound");
            flags::UNBIND_SUCCESS
        } else {
            tracing::debug!(%handle, "unbind of unknown session");
            flags::UNBIND_FAILURE
        }
    }

    /// The bound session behind `handle`.
    #[must_use]
    pub fn session(&self, handle: ContextHandle) -> Option<Session<'_, C>> {
        let guid = *self.sessions.get(&handle)?;

        Some(Session {
            server: self,
            handle,
            guid,
        })
    }

    // Provider GUIDs are unique per server instance and handle.
    fn derive_guid(&self, handle: ContextHandle) -> ProviderGuid {
        let mut hasher = Sha256::new();
        hasher.update(GUID_DOMAIN_TAG);
        write_framed(&mut hasher, self.config.name.as_bytes());
        write_framed(&mut hasher, &self.nonce.to_le_bytes());
        write_framed(&mut hasher, &handle.0.to_le_bytes());

        let digest = hasher.finalize();
        let mut guid = [0u8; 16];
        guid.copy_from_slice(&digest[..16]);

        ProviderGuid(guid)
    }
}

fn write_framed(hasher: &mut Sha256, bytes: &[u8]) {
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    hasher.update(len.to_be_bytes());
    hasher.update(bytes);
}

///
/// Session
///
/// A bound session: the method surface plus the provider GUID its
/// Ephemeral entry IDs carry.
///

pub struct Session<'a, C: ObjectCatalog> {
    pub(super) server: &'a NspiServer<C>,
    handle: ContextHandle,
    guid: ProviderGuid,
}

impl<C: ObjectCatalog> Session<'_, C> {
    #[must_use]
    pub const fn handle(&self) -> ContextHandle {
        self.handle
    }

    #[must_use]
    pub const fn provider_guid(&self) -> ProviderGuid {
        self.guid
    }

    pub(super) const fn config(&self) -> &ServerSection {
        &self.server.config
    }

    pub(super) fn view(&self) -> C::View {
        self.server.catalog.view()
    }

    // Run one method under a metrics span.
    pub(super) fn run<T>(
        &self,
        method: Method,
        body: impl FnOnce(&mut Span) -> NspiResult<T>,
    ) -> NspiResult<T> {
        let mut span = Span::new(method);
        let result = body(&mut span);
        tracing::debug!(
            handle = %self.handle,
            method = method.label(),
            ok = result.is_ok(),
            "method complete"
        );

        span.finish(result)
    }
}
