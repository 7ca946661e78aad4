//! Player actions as values, with a compact text form for scripts.
//!
//! | text              | action                         |
//! |-------------------|--------------------------------|
//! | `swap 0,1 0,2`    | swap `(0, 1)` with `(0, 2)`    |
//! | `smash 3,4`       | smash the group at `(3, 4)`    |
//! | `drop 2 5`        | drop value 5 into column 2     |
//! | `spawn`           | drop a random value somewhere  |
//! | `undo`            | undo the last accepted action  |
use crate::engine::{DropOutcome, Engine, SmashOutcome, SwapOutcome};
use crate::error::EngineError;
use crate::grid::Coord;
use crate::source::ValueSource;
use std::fmt;
use std::str::FromStr;

/// One thing a player can ask the engine to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Swap two adjacent cells.
    Swap(Coord, Coord),
    /// Smash the group containing a cell.
    Smash(Coord),
    /// Drop a value into a column.
    Drop {
        /// Target column.
        col: usize,
        /// Value to drop.
        value: u8,
    },
    /// Drop a value drawn from the engine's source.
    Spawn,
    /// Undo the last accepted action.
    Undo,
}

/// What an applied action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionReport {
    /// Outcome of a swap.
    Swap(SwapOutcome),
    /// Outcome of a smash.
    Smash(SmashOutcome),
    /// Outcome of a drop or spawn.
    Drop(DropOutcome),
    /// Whether anything was undone.
    Undo(bool),
}

impl ActionReport {
    /// Points the action scored.
    pub fn score_delta(&self) -> u64 {
        match self {
            ActionReport::Swap(outcome) => outcome.score_delta(),
            ActionReport::Smash(outcome) => outcome.score_delta,
            ActionReport::Drop(_) | ActionReport::Undo(_) => 0,
        }
    }
}

impl fmt::Display for ActionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionReport::Swap(outcome) if outcome.committed => write!(
                f,
                "committed, removed {:?} for {} points",
                outcome.removed_per_cascade(),
                outcome.score_delta()
            ),
            ActionReport::Swap(_) => write!(f, "no run formed, swap reverted"),
            ActionReport::Smash(outcome) => write!(
                f,
                "smashed {} cells of {} for {} points",
                outcome.removed_count(),
                outcome.value,
                outcome.score_delta
            ),
            ActionReport::Drop(outcome) => write!(
                f,
                "{} landed at ({}, {})",
                outcome.value, outcome.row, outcome.col
            ),
            ActionReport::Undo(true) => write!(f, "undone"),
            ActionReport::Undo(false) => write!(f, "nothing to undo"),
        }
    }
}

impl Action {
    /// Sends the action to `engine`.
    pub fn apply<S: ValueSource>(
        &self,
        engine: &mut Engine<S>,
    ) -> Result<ActionReport, EngineError> {
        match *self {
            Action::Swap(a, b) => engine.request_swap(a, b).map(ActionReport::Swap),
            Action::Smash((r, c)) => engine.request_smash(r, c).map(ActionReport::Smash),
            Action::Drop { col, value } => engine.request_drop(col, value).map(ActionReport::Drop),
            Action::Spawn => engine.spawn_drop().map(ActionReport::Drop),
            Action::Undo => Ok(ActionReport::Undo(engine.undo_last_action())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Swap(a, b) => write!(f, "swap {},{} {},{}", a.0, a.1, b.0, b.1),
            Action::Smash((r, c)) => write!(f, "smash {r},{c}"),
            Action::Drop { col, value } => write!(f, "drop {col} {value}"),
            Action::Spawn => write!(f, "spawn"),
            Action::Undo => write!(f, "undo"),
        }
    }
}

/// Error returned when an action line cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseActionError {
    /// The line was blank.
    #[display("empty action")]
    Empty,
    /// The first word is not a known action.
    #[display("unknown action '{name}'")]
    UnknownAction {
        /// The unrecognized word.
        name: String,
    },
    /// The action has the wrong number or shape of arguments.
    #[display("bad arguments for '{name}', expected: {expected}")]
    BadArguments {
        /// Action name.
        name: String,
        /// Expected form.
        expected: &'static str,
    },
}

fn parse_coord(s: &str) -> Option<Coord> {
    let (r, c) = s.split_once(',')?;
    Some((r.trim().parse().ok()?, c.trim().parse().ok()?))
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(ParseActionError::Empty)?;
        let args: Vec<&str> = words.collect();
        let bad = |expected| ParseActionError::BadArguments {
            name: name.to_string(),
            expected,
        };

        match name {
            "swap" => match args.as_slice() {
                [a, b] => Ok(Action::Swap(
                    parse_coord(a).ok_or_else(|| bad("swap r,c r,c"))?,
                    parse_coord(b).ok_or_else(|| bad("swap r,c r,c"))?,
                )),
                _ => Err(bad("swap r,c r,c")),
            },
            "smash" => match args.as_slice() {
                [a] => parse_coord(a)
                    .map(Action::Smash)
                    .ok_or_else(|| bad("smash r,c")),
                _ => Err(bad("smash r,c")),
            },
            "drop" => match args.as_slice() {
                [col, value] => match (col.parse(), value.parse()) {
                    (Ok(col), Ok(value)) => Ok(Action::Drop { col, value }),
                    _ => Err(bad("drop col value")),
                },
                _ => Err(bad("drop col value")),
            },
            "spawn" if args.is_empty() => Ok(Action::Spawn),
            "undo" if args.is_empty() => Ok(Action::Undo),
            "spawn" | "undo" => Err(bad("no arguments")),
            _ => Err(ParseActionError::UnknownAction {
                name: name.to_string(),
            }),
        }
    }
}
