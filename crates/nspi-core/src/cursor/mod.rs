//! Module: cursor
//! Responsibility: resolve a STAT against one container's sorted rows.
//! Does not own: reading rows, STAT write-back policy or error-code mapping.
//!
//! Invariants:
//! - Beginning-of-table sits before row 0 and reports NumPos 0;
//!   end-of-table sits after the last row and reports NumPos = TotalRecs.
//! - A Delta of 0 never moves an absolute position.
//! - Moves past either end clamp: below row 0 to row 0, past the last row
//!   to end-of-table.


use crate::{error::ErrorCode, identity::Mid, stat::Stat};
use thiserror::Error as ThisError;

///
/// CursorError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum CursorError {
    #[error("current record {0:?} is not a row of the container")]
    RowNotFound(Mid),
}

impl From<CursorError> for ErrorCode {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::RowNotFound(_) => Self::NotFound,
        }
    }
}

///
/// Slot
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot {
    BeginningOfTable,
    Row(usize),
    EndOfTable,
}

impl Slot {
    /// Signed offset; beginning-of-table is one before row 0.
    #[must_use]
    pub fn offset(self, len: usize) -> i64 {
        match self {
            Self::BeginningOfTable => -1,
            Self::Row(i) => to_i64(i),
            Self::EndOfTable => to_i64(len),
        }
    }

    /// Index of the first row a read from this slot returns.
    #[must_use]
    pub const fn read_start(self, len: usize) -> usize {
        match self {
            Self::BeginningOfTable => 0,
            Self::Row(i) => i,
            Self::EndOfTable => len,
        }
    }
}

///
/// Positioned
///
/// A resolved cursor position and what it reports back through the STAT.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Positioned {
    pub slot: Slot,
    pub current_rec: Mid,
    pub num_pos: u32,
    pub total_recs: u32,
    /// Signed distance actually travelled while applying Delta.
    pub moved: i32,
}

impl Positioned {
    /// Describe `slot` within `rows`.
    #[must_use]
    pub fn at(rows: &[Mid], slot: Slot) -> Self {
        let (current_rec, num_pos) = match slot {
            Slot::BeginningOfTable => (Mid::BEGINNING_OF_TABLE, 0),
            Slot::Row(i) => (rows[i], to_u32(i)),
            Slot::EndOfTable => (Mid::END_OF_TABLE, to_u32(rows.len())),
        };

        Self {
            slot,
            current_rec,
            num_pos,
            total_recs: to_u32(rows.len()),
            moved: 0,
        }
    }

    /// Copy the reported position into a STAT, leaving every other field.
    #[must_use]
    pub const fn apply(&self, stat: Stat) -> Stat {
        stat.with_position(self.current_rec, self.num_pos, self.total_recs)
    }
}

/// Resolve `stat` against `rows`: locate the starting slot (absolute or
/// fractional), then apply `stat.delta`.
pub fn position(rows: &[Mid], stat: &Stat) -> Result<Positioned, CursorError> {
    // Phase 1: starting slot.
    let start = if stat.current_rec == Mid::CURRENT {
        fractional_start(rows.len(), stat.num_pos, stat.total_recs)
    } else {
        locate(rows, stat.current_rec)?
    };

    // Phase 2: apply Delta.
    Ok(seek(rows, start, stat.delta))
}

/// Move `delta` rows from `start`, clamping at both ends.
///
/// The low clamp is row 0, never beginning-of-table, so a negative delta
/// from beginning-of-table lands on row 0 and reports `moved = 1`.
#[must_use]
pub fn seek(rows: &[Mid], start: Slot, delta: i32) -> Positioned {
    let len = rows.len();
    if delta == 0 {
        return Positioned::at(rows, start);
    }

    let target = start.offset(len) + i64::from(delta);
    let slot = if len == 0 || target >= to_i64(len) {
        Slot::EndOfTable
    } else if target < 0 {
        Slot::Row(0)
    } else {
        Slot::Row(usize::try_from(target).unwrap_or(0))
    };

    let moved = slot.offset(len) - start.offset(len);

    Positioned {
        moved: i32::try_from(moved).unwrap_or(delta),
        ..Positioned::at(rows, slot)
    }
}

/// Slot named by an absolute `CurrentRec`: a sentinel or a row's Mid.
pub fn locate(rows: &[Mid], current: Mid) -> Result<Slot, CursorError> {
    match current {
        Mid::BEGINNING_OF_TABLE => Ok(Slot::BeginningOfTable),
        Mid::END_OF_TABLE => Ok(Slot::EndOfTable),
        mid => rows
            .iter()
            .position(|&row| row == mid)
            .map(Slot::Row)
            .ok_or(CursorError::RowNotFound(mid)),
    }
}

/// Re-estimate a client's fractional position against the actual row count:
/// `floor(actual * num_pos / client_total)`, clamped to the table.
#[must_use]
pub fn fractional_start(actual: usize, num_pos: u32, client_total: u32) -> Slot {
    if client_total == 0 || actual == 0 {
        return if actual == 0 {
            Slot::EndOfTable
        } else {
            Slot::Row(0)
        };
    }

    let actual_wide = u64::try_from(actual).unwrap_or(u64::MAX);
    let intended = actual_wide.saturating_mul(u64::from(num_pos)) / u64::from(client_total);

    match usize::try_from(intended) {
        Ok(i) if i < actual => Slot::Row(i),
        _ => Slot::EndOfTable,
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
