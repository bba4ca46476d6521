pub mod bracket;
pub mod scoring;

pub use bracket::{BracketMatch, BracketState, MatchId, Matchup, RecordOutcome, Side, round_name};
pub use scoring::{
    Dart, DartThrow, GamePlayerState, GameState, GameVariant, MoveHistoryEntry, Multiplier,
    ThrowOutcome,
};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Rejections — every engine precondition violation, as a typed value
// ---------------------------------------------------------------------------

/// Why an engine operation refused an input.
///
/// Operations are total over their preconditions: a rejection is returned and
/// the state the operation was called on is left untouched. There are no
/// panicking paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("a bracket needs at least 2 entrants")]
    InsufficientEntrants,
    #[error("pick two different, non-empty player names")]
    DuplicateOrMissingSelection,
    #[error("no match {0} in this bracket")]
    MatchNotFound(MatchId),
    #[error("match {0} is still waiting on a player")]
    MatchNotContestable(MatchId),
    #[error("turn already complete")]
    TurnAlreadyComplete,
    #[error("nothing to undo")]
    NothingToUndo,
}
