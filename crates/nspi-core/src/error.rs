use std::fmt;
use thiserror::Error as ThisError;

///
/// NspiResult
///
/// Result of one address-book method. The error side never carries
/// `ErrorCode::Success`.
///

pub type NspiResult<T> = Result<T, ErrorCode>;

///
/// ErrorCode
///
/// Protocol status codes returned across the method boundary.
/// Discriminants are the wire values.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, ThisError)]
#[repr(u32)]
pub enum ErrorCode {
    #[error("success")]
    Success = 0x0000_0000,

    #[error("one or more properties were returned as errors")]
    ErrorsReturned = 0x0004_0380,

    #[error("general failure")]
    GeneralFailure = 0x8000_4005,

    #[error("not supported")]
    NotSupported = 0x8004_0102,

    #[error("invalid object")]
    InvalidObject = 0x8004_0108,

    #[error("out of resources")]
    OutOfResources = 0x8004_010E,

    #[error("not found")]
    NotFound = 0x8004_010F,

    #[error("logon failed")]
    LogonFailed = 0x8004_0111,

    #[error("restriction too complex")]
    TooComplex = 0x8004_0117,

    #[error("invalid code page")]
    InvalidCodepage = 0x8004_011E,

    #[error("invalid locale")]
    InvalidLocale = 0x8004_011F,

    #[error("table too big")]
    TableTooBig = 0x8004_0403,

    #[error("invalid bookmark")]
    InvalidBookmark = 0x8004_0405,

    #[error("access denied")]
    AccessDenied = 0x8007_0005,

    #[error("not enough memory")]
    NotEnoughMemory = 0x8007_000E,

    #[error("invalid parameter")]
    InvalidParameter = 0x8007_0057,
}

impl ErrorCode {
    const ALL: [Self; 16] = [
        Self::Success,
        Self::ErrorsReturned,
        Self::GeneralFailure,
        Self::NotSupported,
        Self::InvalidObject,
        Self::OutOfResources,
        Self::NotFound,
        Self::LogonFailed,
        Self::TooComplex,
        Self::InvalidCodepage,
        Self::InvalidLocale,
        Self::TableTooBig,
        Self::InvalidBookmark,
        Self::AccessDenied,
        Self::NotEnoughMemory,
        Self::InvalidParameter,
    ];

    /// Wire value of this status.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Map a wire value back to a known status.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Success-class statuses carry a valid reply.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::ErrorsReturned)
    }

    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ErrorsReturned => "errors_returned",
            Self::GeneralFailure => "general_failure",
            Self::NotSupported => "not_supported",
            Self::InvalidObject => "invalid_object",
            Self::OutOfResources => "out_of_resources",
            Self::NotFound => "not_found",
            Self::LogonFailed => "logon_failed",
            Self::TooComplex => "too_complex",
            Self::InvalidCodepage => "invalid_codepage",
            Self::InvalidLocale => "invalid_locale",
            Self::TableTooBig => "table_too_big",
            Self::InvalidBookmark => "invalid_bookmark",
            Self::AccessDenied => "access_denied",
            Self::NotEnoughMemory => "not_enough_memory",
            Self::InvalidParameter => "invalid_parameter",
        }
    }
}

///
/// InternalError
///
/// Structured engine error with a stable internal classification.
/// Never crosses the method boundary; it is logged and collapsed to
/// `ErrorCode::GeneralFailure` there.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a catalog-origin invariant violation.
    pub(crate) fn catalog_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Catalog,
            message.into(),
        )
    }

    /// Construct a catalog-origin not-found error.
    pub(crate) fn catalog_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, ErrorOrigin::Catalog, message.into())
    }

    /// Construct a catalog-origin unsupported error.
    pub(crate) fn catalog_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Catalog, message.into())
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<InternalError> for ErrorCode {
    fn from(err: InternalError) -> Self {
        tracing::warn!(error = %err.display_with_class(), "internal error at method boundary");

        Self::GeneralFailure
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    NotFound,
    Internal,
    Conflict,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Catalog,
    Cursor,
    Restriction,
    Session,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Catalog => "catalog",
            Self::Cursor => "cursor",
            Self::Restriction => "restriction",
            Self::Session => "session",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
