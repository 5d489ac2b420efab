//! Forward-only match status machine: `coming → live → finished`, with the
//! direct `coming → finished` jump allowed.

use thiserror::Error;

use crate::dao::models::MatchStatus;

/// Effect a requested status change has on a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Requested status equals the current one.
    Unchanged,
    /// Moves forward without finishing.
    Advance,
    /// Moves into `finished`, which reconciles team statistics.
    Finalize,
}

/// Attempted transition that the match lifecycle forbids.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move match from `{}` to `{}`", from.as_str(), to.as_str())]
pub struct InvalidTransition {
    /// Status read from the store.
    pub from: MatchStatus,
    /// Requested status.
    pub to: MatchStatus,
}

impl InvalidTransition {
    /// Whether the match was already finished, which makes any change illegal.
    pub fn already_finished(&self) -> bool {
        self.from == MatchStatus::Finished
    }
}

/// Classify the transition from `from` to `to`.
pub fn plan(from: MatchStatus, to: MatchStatus) -> Result<StatusChange, InvalidTransition> {
    use MatchStatus::{Coming, Finished, Live};

    match (from, to) {
        (Finished, _) => Err(InvalidTransition { from, to }),
        (Coming, Coming) | (Live, Live) => Ok(StatusChange::Unchanged),
        (Coming, Live) => Ok(StatusChange::Advance),
        (Coming | Live, Finished) => Ok(StatusChange::Finalize),
        (Live, Coming) => Err(InvalidTransition { from, to }),
    }
}
