//! Module: identity
//! Responsibility: Minimal, Ephemeral and Permanent Entry ID encoding and
//! decoding.
//! Does not own: resolving identifiers to objects (catalog) or choosing
//! which form a projection returns (table).
//! Boundary: every Entry ID byte layout read or written by the engine.
//!
//! Invariants:
//! - Encoding is exact and little-endian; decoding accepts only the
//!   canonical layout and never truncates the DN.
//! - Minimal Entry IDs below `Mid::FIRST_ASSIGNABLE` are reserved positioning
//!   or resolution sentinels and never name objects.
//! - Permanent Entry IDs always carry `GUID_NSPI` and are session-independent.

#[cfg(test)]
mod tests;

use std::fmt;
use thiserror::Error as ThisError;

///
/// Constants
///

const ID_TYPE_EPHEMERAL: u8 = 0x87;
const ID_TYPE_PERMANENT: u8 = 0x00;
const R4_VALUE: u32 = 0x0000_0001;

/// Provider UID carried by every Permanent Entry ID.
pub const GUID_NSPI: ProviderGuid = ProviderGuid([
    0xDC, 0xA7, 0x40, 0xC8, 0xC0, 0x42, 0x10, 0x1A, 0xB4, 0xB9, 0x08, 0x00, 0x2B, 0x2F, 0xE1, 0x82,
]);

// IDType + R1..R3 + ProviderUID + R4 + DisplayType
const HEADER_LEN: usize = 4 + 16 + 4 + 4;

///
/// MalformedIdentifier
/// Decode errors for Entry ID byte strings.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum MalformedIdentifier {
    #[error("entry id has {len} bytes, expected {expected}")]
    InvalidLength { len: usize, expected: usize },

    #[error("entry id is truncated ({len} bytes)")]
    Truncated { len: usize },

    #[error("unknown entry id type {0:#04x}")]
    UnknownIdType(u8),

    #[error("reserved entry id bytes are non-zero")]
    NonZeroReserved,

    #[error("entry id R4 field is {0:#010x}, expected 0x00000001")]
    InvalidR4(u32),

    #[error("permanent entry id does not carry the NSPI provider uid")]
    ForeignProvider,

    #[error("permanent entry id DN is not NUL-terminated")]
    MissingTerminator,

    #[error("permanent entry id DN is not ASCII")]
    NonAscii,
}

///
/// Mid
///
/// Minimal Entry ID: a session-scoped 32-bit object identifier.
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Mid(u32);

impl Mid {
    pub const BEGINNING_OF_TABLE: Self = Self(0);
    pub const CURRENT: Self = Self(1);
    pub const END_OF_TABLE: Self = Self(2);

    // Name-resolution results share the low reserved range.
    pub const UNRESOLVED: Self = Self(0);
    pub const AMBIGUOUS: Self = Self(1);
    pub const RESOLVED: Self = Self(2);

    /// First value that can be assigned to an object.
    pub const FIRST_ASSIGNABLE: Self = Self(0x10);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Reserved values never identify an object.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_ASSIGNABLE.0
    }

    #[must_use]
    pub const fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Debug for Mid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BEGINNING_OF_TABLE => f.write_str("Mid(BEGINNING_OF_TABLE)"),
            Self::CURRENT => f.write_str("Mid(CURRENT)"),
            Self::END_OF_TABLE => f.write_str("Mid(END_OF_TABLE)"),
            Self(raw) => write!(f, "Mid({raw:#x})"),
        }
    }
}

impl From<u32> for Mid {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

///
/// ProviderGuid
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ProviderGuid(pub [u8; 16]);

impl ProviderGuid {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

///
/// DisplayType
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DisplayType(pub u32);

impl DisplayType {
    pub const MAILUSER: Self = Self(0x0000_0000);
    pub const DISTLIST: Self = Self(0x0000_0001);
    pub const FORUM: Self = Self(0x0000_0002);
    pub const AGENT: Self = Self(0x0000_0003);
    pub const ORGANIZATION: Self = Self(0x0000_0004);
    pub const PRIVATE_DISTLIST: Self = Self(0x0000_0005);
    pub const REMOTE_MAILUSER: Self = Self(0x0000_0006);
    pub const CONTAINER: Self = Self(0x0000_0100);
    pub const TEMPLATE: Self = Self(0x0000_0101);
    pub const ADDRESS_TEMPLATE: Self = Self(0x0000_0102);
    pub const SEARCH: Self = Self(0x0000_0200);

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// MAPI object type reported through PidTagObjectType.
    #[must_use]
    pub const fn object_type(self) -> u32 {
        match self {
            Self::CONTAINER | Self::SEARCH => 0x0000_0004, // MAPI_ABCONT
            Self::DISTLIST | Self::PRIVATE_DISTLIST => 0x0000_0008, // MAPI_DISTLIST
            _ => 0x0000_0006, // MAPI_MAILUSER
        }
    }
}

///
/// EphemeralEntryId
///
/// Session-scoped identifier: the session provider UID plus a Minimal
/// Entry ID. Always 32 bytes.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EphemeralEntryId {
    pub provider: ProviderGuid,
    pub display_type: DisplayType,
    pub mid: Mid,
}

impl EphemeralEntryId {
    pub const ENCODED_LEN: usize = HEADER_LEN + 4;

    #[must_use]
    pub const fn new(provider: ProviderGuid, display_type: DisplayType, mid: Mid) -> Self {
        Self {
            provider,
            display_type,
            mid,
        }
    }

    #[must_use]
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0] = ID_TYPE_EPHEMERAL;
        out[4..20].copy_from_slice(self.provider.as_bytes());
        out[20..24].copy_from_slice(&R4_VALUE.to_le_bytes());
        out[24..28].copy_from_slice(&self.display_type.raw().to_le_bytes());
        out[28..32].copy_from_slice(&self.mid.to_le_bytes());

        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MalformedIdentifier> {
        // Phase 1: exact size and header.
        if bytes.len() != Self::ENCODED_LEN {
            return Err(MalformedIdentifier::InvalidLength {
                len: bytes.len(),
                expected: Self::ENCODED_LEN,
            });
        }
        let header = Header::decode(bytes, ID_TYPE_EPHEMERAL)?;

        // Phase 2: trailing Minimal Entry ID.
        let mid = Mid(read_u32(bytes, HEADER_LEN));

        Ok(Self {
            provider: header.provider,
            display_type: header.display_type,
            mid,
        })
    }
}

///
/// PermanentEntryId
///
/// Session-independent identifier: display type plus the object DN.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PermanentEntryId {
    pub display_type: DisplayType,
    pub dn: String,
}

impl PermanentEntryId {
    /// Build from a DN; non-ASCII DNs cannot be represented.
    pub fn new(
        display_type: DisplayType,
        dn: impl Into<String>,
    ) -> Result<Self, MalformedIdentifier> {
        let dn = dn.into();
        if !dn.is_ascii() {
            return Err(MalformedIdentifier::NonAscii);
        }

        Ok(Self { display_type, dn })
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.dn.len() + 1);
        out.extend_from_slice(&[ID_TYPE_PERMANENT, 0, 0, 0]);
        out.extend_from_slice(GUID_NSPI.as_bytes());
        out.extend_from_slice(&R4_VALUE.to_le_bytes());
        out.extend_from_slice(&self.display_type.raw().to_le_bytes());
        out.extend_from_slice(self.dn.as_bytes());
        out.push(0);

        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MalformedIdentifier> {
        // Phase 1: header, which must name the NSPI provider.
        if bytes.len() <= HEADER_LEN {
            return Err(MalformedIdentifier::Truncated { len: bytes.len() });
        }
        let header = Header::decode(bytes, ID_TYPE_PERMANENT)?;
        if header.provider != GUID_NSPI {
            return Err(MalformedIdentifier::ForeignProvider);
        }

        // Phase 2: the DN runs to the single trailing NUL.
        let body = &bytes[HEADER_LEN..];
        let Some((&0, dn)) = body.split_last() else {
            return Err(MalformedIdentifier::MissingTerminator);
        };
        if dn.contains(&0) {
            return Err(MalformedIdentifier::MissingTerminator);
        }
        if !dn.is_ascii() {
            return Err(MalformedIdentifier::NonAscii);
        }

        Ok(Self {
            display_type: header.display_type,
            dn: dn.iter().map(|&b| char::from(b)).collect(),
        })
    }
}

///
/// EntryId
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryId {
    Ephemeral(EphemeralEntryId),
    Permanent(PermanentEntryId),
}

impl EntryId {
    /// Decode either form, dispatching on the IDType byte.
    pub fn decode(bytes: &[u8]) -> Result<Self, MalformedIdentifier> {
        match bytes.first() {
            Some(&ID_TYPE_EPHEMERAL) => EphemeralEntryId::decode(bytes).map(Self::Ephemeral),
            Some(&ID_TYPE_PERMANENT) => PermanentEntryId::decode(bytes).map(Self::Permanent),
            Some(&other) => Err(MalformedIdentifier::UnknownIdType(other)),
            None => Err(MalformedIdentifier::Truncated { len: 0 }),
        }
    }

    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Ephemeral(id) => id.encode().to_vec(),
            Self::Permanent(id) => id.encode(),
        }
    }

    #[must_use]
    pub const fn display_type(&self) -> DisplayType {
        match self {
            Self::Ephemeral(id) => id.display_type,
            Self::Permanent(id) => id.display_type,
        }
    }
}

///
/// Header
/// Shared 28-byte prefix of both Entry ID forms.
///

struct Header {
    provider: ProviderGuid,
    display_type: DisplayType,
}

impl Header {
    // Caller guarantees `bytes.len() >= HEADER_LEN`.
    fn decode(bytes: &[u8], expected_type: u8) -> Result<Self, MalformedIdentifier> {
        if bytes[0] != expected_type {
            return Err(MalformedIdentifier::UnknownIdType(bytes[0]));
        }
        if bytes[1..4] != [0, 0, 0] {
            return Err(MalformedIdentifier::NonZeroReserved);
        }

        let mut provider = [0u8; 16];
        provider.copy_from_slice(&bytes[4..20]);

        let r4 = read_u32(bytes, 20);
        if r4 != R4_VALUE {
            return Err(MalformedIdentifier::InvalidR4(r4));
        }

        Ok(Self {
            provider: ProviderGuid(provider),
            display_type: DisplayType(read_u32(bytes, 24)),
        })
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);

    u32::from_le_bytes(word)
}
