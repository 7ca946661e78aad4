//! Two-phase swap protocol: apply, evaluate, then commit or revert.
//!
//! The trial keeps the values it swapped so a revert restores them exactly,
//! whatever happened to the rest of the grid in between.
use crate::error::{EngineError, InvalidMoveReason};
use crate::grid::{Cell, Coord, Grid};
use crate::matcher;
use log::trace;

/// A swap that has been applied to the grid but not yet settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SwapAttempt {
    /// First cell named by the player.
    pub from: Coord,
    /// Second cell named by the player.
    pub to: Coord,
    /// Value at `from` before the swap.
    pub from_value: u8,
    /// Value at `to` before the swap.
    pub to_value: u8,
}

/// Where the trial is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum TrialState {
    /// No swap in flight.
    #[default]
    Idle,
    /// Swap applied, not yet evaluated.
    PendingSwap(SwapAttempt),
    /// The swap created a run and stays.
    Committed(SwapAttempt),
    /// The swap created nothing and must be undone.
    Reverting(SwapAttempt),
}

/// Outcome of [`SwapTrial::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum TrialDecision {
    /// Keep the swap and resolve the grid.
    Commit,
    /// Put both values back.
    Revert,
}

/// Returns `true` if `a` and `b` are at Manhattan distance exactly 1.
pub fn are_adjacent(a: Coord, b: Coord) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// State machine for one swap at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SwapTrial {
    state: TrialState,
}

impl SwapTrial {
    /// Current state.
    pub fn state(&self) -> TrialState {
        self.state
    }

    /// Returns `true` when no swap is in flight.
    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Validates and applies a swap.
    ///
    /// # Errors
    /// - [`InvalidMoveReason::TrialInProgress`] unless idle;
    /// - [`EngineError::InvalidCoordinate`] for an out-of-range cell;
    /// - [`InvalidMoveReason::NotAdjacent`] unless the cells touch orthogonally;
    /// - [`InvalidMoveReason::EmptyCell`] if either cell is empty.
    ///
    /// The grid is unchanged on every error.
    pub fn begin(
        &mut self,
        grid: &mut Grid,
        from: Coord,
        to: Coord,
    ) -> Result<SwapAttempt, EngineError> {
        if !self.state.is_idle() {
            return Err(EngineError::invalid_move(InvalidMoveReason::TrialInProgress));
        }
        let a = grid.get(from.0, from.1)?;
        let b = grid.get(to.0, to.1)?;
        if !are_adjacent(from, to) {
            return Err(EngineError::invalid_move(InvalidMoveReason::NotAdjacent));
        }
        let (Cell::Value(from_value), Cell::Value(to_value)) = (a, b) else {
            return Err(EngineError::invalid_move(InvalidMoveReason::EmptyCell));
        };

        grid.swap(from, to)?;
        let attempt = SwapAttempt {
            from,
            to,
            from_value,
            to_value,
        };
        trace!("swap {from:?} <-> {to:?} applied for evaluation");
        self.state = TrialState::PendingSwap(attempt);
        Ok(attempt)
    }

    /// Scans the whole grid for runs and decides the trial's fate.
    ///
    /// # Errors
    /// [`InvalidMoveReason::NoPendingSwap`] unless a swap is pending.
    pub fn evaluate(&mut self, grid: &Grid, min_run: usize) -> Result<TrialDecision, EngineError> {
        let TrialState::PendingSwap(attempt) = self.state else {
            return Err(EngineError::invalid_move(InvalidMoveReason::NoPendingSwap));
        };
        if matcher::find_runs(grid, min_run).is_empty() {
            self.state = TrialState::Reverting(attempt);
            Ok(TrialDecision::Revert)
        } else {
            self.state = TrialState::Committed(attempt);
            Ok(TrialDecision::Commit)
        }
    }

    /// Completes an evaluated trial and returns to idle.
    ///
    /// A committed trial leaves the grid alone. A reverting trial writes the
    /// original values back to both cells.
    ///
    /// # Errors
    /// [`InvalidMoveReason::NoPendingSwap`] when idle and
    /// [`InvalidMoveReason::TrialInProgress`] when not yet evaluated.
    pub fn finish(&mut self, grid: &mut Grid) -> Result<SwapAttempt, EngineError> {
        match self.state {
            TrialState::Idle => Err(EngineError::invalid_move(InvalidMoveReason::NoPendingSwap)),
            TrialState::PendingSwap(_) => {
                Err(EngineError::invalid_move(InvalidMoveReason::TrialInProgress))
            }
            TrialState::Committed(attempt) => {
                self.state = TrialState::Idle;
                Ok(attempt)
            }
            TrialState::Reverting(attempt) => {
                grid.put(attempt.from.0, attempt.from.1, Cell::Value(attempt.from_value));
                grid.put(attempt.to.0, attempt.to.1, Cell::Value(attempt.to_value));
                trace!("swap {:?} <-> {:?} reverted", attempt.from, attempt.to);
                self.state = TrialState::Idle;
                Ok(attempt)
            }
        }
    }

    /// Drops whatever trial is in flight without touching the grid.
    pub fn abandon(&mut self) {
        self.state = TrialState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_str_array;

    #[test]
    fn test_are_adjacent() {
        assert!(are_adjacent((0, 0), (0, 1)));
        assert!(are_adjacent((3, 2), (2, 2)));
        assert!(!are_adjacent((0, 0), (1, 1)));
        assert!(!are_adjacent((0, 0), (0, 0)));
        assert!(!are_adjacent((0, 0), (0, 2)));
    }

    #[test]
    fn test_commit_path() {
        let mut grid = grid_from_str_array(&["001", "230", "452"], 6).unwrap();
        let mut trial = SwapTrial::default();

        trial.begin(&mut grid, (0, 2), (1, 2)).unwrap();
        assert!(trial.state().is_pending_swap());
        assert_eq!(trial.evaluate(&grid, 3).unwrap(), TrialDecision::Commit);
        assert!(trial.state().is_committed());

        let attempt = trial.finish(&mut grid).unwrap();
        assert_eq!((attempt.from_value, attempt.to_value), (1, 0));
        assert!(trial.is_idle());
        assert_eq!(grid.get(0, 2).unwrap(), Cell::Value(0));
    }

    #[test]
    fn test_revert_restores_values() {
        let mut grid = grid_from_str_array(&["012", "345"], 6).unwrap();
        let before = grid.clone();
        let mut trial = SwapTrial::default();

        trial.begin(&mut grid, (0, 0), (1, 0)).unwrap();
        assert_ne!(grid, before);
        assert_eq!(trial.evaluate(&grid, 3).unwrap(), TrialDecision::Revert);
        trial.finish(&mut grid).unwrap();
        assert_eq!(grid, before);
        assert!(trial.is_idle());
    }

    #[test]
    fn test_begin_rejections_leave_grid_untouched() {
        let mut grid = grid_from_str_array(&["01.", "234"], 6).unwrap();
        let before = grid.clone();
        let mut trial = SwapTrial::default();

        let err = trial.begin(&mut grid, (0, 0), (1, 1)).unwrap_err();
        assert_eq!(err, EngineError::invalid_move(InvalidMoveReason::NotAdjacent));
        let err = trial.begin(&mut grid, (0, 1), (0, 2)).unwrap_err();
        assert_eq!(err, EngineError::invalid_move(InvalidMoveReason::EmptyCell));
        let err = trial.begin(&mut grid, (1, 2), (2, 2)).unwrap_err();
        assert!(err.is_invalid_coordinate());
        assert_eq!(grid, before);
        assert!(trial.is_idle());
    }

    #[test]
    fn test_out_of_order_calls() {
        let mut grid = grid_from_str_array(&["012", "345"], 6).unwrap();
        let mut trial = SwapTrial::default();

        assert_eq!(
            trial.finish(&mut grid).unwrap_err(),
            EngineError::invalid_move(InvalidMoveReason::NoPendingSwap)
        );
        assert!(trial.evaluate(&grid, 3).is_err());

        trial.begin(&mut grid, (0, 0), (0, 1)).unwrap();
        assert_eq!(
            trial.begin(&mut grid, (1, 0), (1, 1)).unwrap_err(),
            EngineError::invalid_move(InvalidMoveReason::TrialInProgress)
        );
        assert_eq!(
            trial.finish(&mut grid).unwrap_err(),
            EngineError::invalid_move(InvalidMoveReason::TrialInProgress)
        );

        trial.abandon();
        assert!(trial.is_idle());
    }
}
