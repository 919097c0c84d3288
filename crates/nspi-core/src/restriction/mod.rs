//! Module: restriction
//! Responsibility: restriction trees, their validation and evaluation.
//! Does not own: which rows are scanned or how matches become tables.
//!
//! Invariants:
//! - Trees are validated before any row is evaluated.
//! - Evaluation is total: an absent property or a type mismatch makes the
//!   node false; it never fails the request.

mod anr;
mod eval;

#[cfg(test)]
mod tests;

pub use anr::anr_matches;
pub use eval::{ObjectRow, PropertySource, evaluate, filter_rows};

use crate::{
    error::ErrorCode,
    prop::{PropTag, PropValue, tags},
};

///
/// Relop
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Relop {
    Lt = 0,
    Le = 1,
    Gt = 2,
    Ge = 3,
    Eq = 4,
    Ne = 5,
    Re = 6,
    MemberOfDl = 100,
}

impl Relop {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Lt),
            1 => Some(Self::Le),
            2 => Some(Self::Gt),
            3 => Some(Self::Ge),
            4 => Some(Self::Eq),
            5 => Some(Self::Ne),
            6 => Some(Self::Re),
            100 => Some(Self::MemberOfDl),
            _ => None,
        }
    }
}

///
/// FuzzyLevel
///
/// Content-restriction match mode (low word) and modifiers (high word).
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FuzzyLevel(pub u32);

impl FuzzyLevel {
    pub const FULLSTRING: u32 = 0x0000_0000;
    pub const SUBSTRING: u32 = 0x0000_0001;
    pub const PREFIX: u32 = 0x0000_0002;
    pub const IGNORECASE: u32 = 0x0001_0000;
    pub const IGNORENONSPACE: u32 = 0x0002_0000;
    pub const LOOSE: u32 = 0x0004_0000;

    #[must_use]
    pub const fn new(mode: u32, modifiers: u32) -> Self {
        Self(mode | modifiers)
    }

    #[must_use]
    pub const fn mode(self) -> u32 {
        self.0 & 0xFFFF
    }

    /// Any modifier relaxes comparison to case-insensitive.
    #[must_use]
    pub const fn ignore_case(self) -> bool {
        self.0 & (Self::IGNORECASE | Self::IGNORENONSPACE | Self::LOOSE) != 0
    }
}

///
/// Restriction
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Restriction {
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Content {
        fuzzy: FuzzyLevel,
        tag: PropTag,
        value: PropValue,
    },
    Property {
        relop: Relop,
        tag: PropTag,
        value: PropValue,
    },
    Exists {
        tag: PropTag,
    },
}

impl Restriction {
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::Or(children)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(child: Self) -> Self {
        Self::Not(Box::new(child))
    }

    #[must_use]
    pub const fn exists(tag: PropTag) -> Self {
        Self::Exists { tag }
    }

    #[must_use]
    pub const fn content(tag: PropTag, value: PropValue, fuzzy: FuzzyLevel) -> Self {
        Self::Content { fuzzy, tag, value }
    }

    #[must_use]
    pub const fn property(tag: PropTag, relop: Relop, value: PropValue) -> Self {
        Self::Property { relop, tag, value }
    }

    /// Ambiguous name resolution over the object's name properties.
    #[must_use]
    pub fn anr(text: impl Into<String>) -> Self {
        Self::Property {
            relop: Relop::Eq,
            tag: tags::PID_TAG_ANR,
            value: PropValue::Unicode(text.into()),
        }
    }

    /// Reject trees the evaluator cannot run.
    pub fn validate(&self, max_depth: u32) -> Result<(), ErrorCode> {
        self.validate_at(1, max_depth)
    }

    fn validate_at(&self, depth: u32, max_depth: u32) -> Result<(), ErrorCode> {
        if depth > max_depth {
            return Err(ErrorCode::TooComplex);
        }

        match self {
            Self::And(children) | Self::Or(children) => children
                .iter()
                .try_for_each(|c| c.validate_at(depth + 1, max_depth)),
            Self::Not(child) => child.validate_at(depth + 1, max_depth),
            Self::Content { fuzzy, value, .. } => {
                let matchable = value.as_text().is_some() || matches!(value, PropValue::Binary(_));
                if fuzzy.mode() > FuzzyLevel::PREFIX || !matchable {
                    return Err(ErrorCode::TooComplex);
                }
                Ok(())
            }
            Self::Property { relop, tag, value } => {
                if matches!(relop, Relop::Re | Relop::MemberOfDl) {
                    return Err(ErrorCode::TooComplex);
                }
                if tag.same_property(tags::PID_TAG_ANR)
                    && (*relop != Relop::Eq || value.as_text().is_none())
                {
                    return Err(ErrorCode::TooComplex);
                }
                Ok(())
            }
            Self::Exists { .. } => Ok(()),
        }
    }
}
