//! Error taxonomy shared by every engine operation.
//!
//! Player-facing rejections (bad coordinates, illegal moves, smashes that hit
//! nothing) are ordinary `Err` values: the grid is untouched when one of them
//! is returned. [`EngineError::InternalInvariantViolation`] is different; it
//! means a resolution loop ran past its cap and the grid may be mid-cascade.
use crate::config::MatchDiscipline;

/// Why a swap (or other geometry-dependent action) was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InvalidMoveReason {
    /// The two coordinates are not at Manhattan distance 1.
    #[display("cells are not orthogonally adjacent")]
    NotAdjacent,
    /// A swap trial is already pending and must be settled first.
    #[display("a swap trial is already in progress")]
    TrialInProgress,
    /// `settle_swap` was called without a pending trial.
    #[display("no swap trial is pending")]
    NoPendingSwap,
    /// One of the swapped cells holds no value.
    #[display("cannot swap an empty cell")]
    EmptyCell,
    /// The action does not exist under the configured matching discipline.
    #[display("action is not available under the {_0} discipline")]
    WrongDiscipline(MatchDiscipline),
}

/// Why a smash found nothing to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EmptyMatchReason {
    /// The seed cell is empty.
    #[display("the selected cell is empty")]
    EmptyCell,
    /// The seed value is outside the smashable subset.
    #[display("value {value} is not smashable")]
    NotSmashable {
        /// Value found at the seed.
        value: u8,
    },
    /// The connected region is below the minimum group size.
    #[display("group of {size} is below the minimum of {min}")]
    GroupTooSmall {
        /// Size of the region around the seed.
        size: usize,
        /// Configured minimum group size.
        min: usize,
    },
}

/// Errors returned by the grid, the resolver and the engine façade.
#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum EngineError {
    /// A coordinate lies outside the grid.
    #[display("coordinate ({row}, {col}) is outside the {rows}x{cols} grid")]
    InvalidCoordinate {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid height.
        rows: usize,
        /// Grid width.
        cols: usize,
    },
    /// A geometry- or state-dependent rejection.
    #[display("invalid move: {reason}")]
    InvalidMove {
        /// What made the move illegal.
        reason: InvalidMoveReason,
    },
    /// A value-dependent rejection of a smash.
    #[display("nothing to smash: {reason}")]
    EmptyMatch {
        /// What made the smash empty.
        reason: EmptyMatchReason,
    },
    /// A value outside the type alphabet.
    #[display("value {value} is outside the alphabet 0..{alphabet_size}")]
    InvalidValue {
        /// Offending value.
        value: u8,
        /// Configured alphabet size.
        alphabet_size: u8,
    },
    /// A dropped value cannot land because the column is full.
    #[display("column {col} is full")]
    ColumnFull {
        /// Full column.
        col: usize,
    },
    /// The configuration cannot produce a working engine.
    #[display("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A resolution loop exceeded its iteration cap.
    #[display("resolution did not stabilise within {steps} steps")]
    InternalInvariantViolation {
        /// Iteration cap that was exceeded.
        steps: usize,
    },
}

impl EngineError {
    /// Returns `true` for ordinary rejections of a player action.
    ///
    /// Rejections leave the grid untouched; everything else is either a setup
    /// mistake or a defect.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidCoordinate { .. }
                | EngineError::InvalidMove { .. }
                | EngineError::EmptyMatch { .. }
                | EngineError::InvalidValue { .. }
                | EngineError::ColumnFull { .. }
        )
    }

    pub(crate) fn invalid_move(reason: InvalidMoveReason) -> Self {
        EngineError::InvalidMove { reason }
    }

    pub(crate) fn empty_match(reason: EmptyMatchReason) -> Self {
        EngineError::EmptyMatch { reason }
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
