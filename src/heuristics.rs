//! Move-choice strategies for automated play.
//!
//! Each `choose_*` function looks at an engine without changing it and
//! returns the action it would play, or `None` if it has nothing to suggest.
use crate::action::Action;
use crate::config::MatchDiscipline;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::matcher;
use crate::score::ScoreModel;
use crate::source::ValueSource;
use log::debug;

/// How an automated player picks its next move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    /// Play the move that scores the most right now.
    #[default]
    MaxScore,
    /// Play the first legal move in row-major order.
    FirstFound,
}

/// Chooses the swap with the highest immediate score, cascades included.
///
/// Every candidate goes through [`Engine::preview_swap`], so the prediction
/// uses the same refill values the real move will get. Ties go to the earliest
/// candidate.
///
/// # Returns
/// The predicted score and the swap, or `None` if no swap creates a run.
pub fn choose_swap_max_score<S: ValueSource + Clone>(engine: &Engine<S>) -> Option<(u64, Action)> {
    let mut best: Option<(u64, Action)> = None;
    for (a, b) in matcher::find_scoring_swaps(engine.grid(), engine.config().min_run_length) {
        let Ok(outcome) = engine.preview_swap(a, b) else {
            continue;
        };
        let score = outcome.score_delta();
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, Action::Swap(a, b)));
        }
    }
    best
}

/// Chooses the smashable group worth the most points; larger groups win ties.
///
/// # Returns
/// The score and a smash on the group's first cell, or `None` if no group is
/// large enough.
pub fn choose_smash_max_score<S: ValueSource>(engine: &Engine<S>) -> Option<(u64, Action)> {
    let config = engine.config();
    let model = ScoreModel::new(config.base_points_per_tile, config.connectivity_scoring);
    matcher::find_all_groups(engine.grid(), &config.smashable, config.min_group_size)
        .into_iter()
        .filter_map(|group| {
            let &(r, c) = group.first()?;
            let value = engine.grid().at(r, c).value()?;
            Some((model.group_delta(group.len(), value), group.len(), (r, c)))
        })
        // `max_by_key` keeps the last maximum; reverse to prefer the first.
        .rev()
        .max_by_key(|&(score, size, _)| (score, size))
        .map(|(score, _, at)| (score, Action::Smash(at)))
}

/// Chooses the first available move in row-major order.
pub fn choose_first_found<S: ValueSource>(engine: &Engine<S>) -> Option<Action> {
    let config = engine.config();
    match config.discipline {
        MatchDiscipline::Run => matcher::find_scoring_swaps(engine.grid(), config.min_run_length)
            .first()
            .map(|&(a, b)| Action::Swap(a, b)),
        MatchDiscipline::Connectivity => {
            matcher::find_all_groups(engine.grid(), &config.smashable, config.min_group_size)
                .first()
                .and_then(|group| group.first())
                .map(|&at| Action::Smash(at))
        }
    }
}

/// Chooses the next move under `strategy`.
pub fn choose_move<S: ValueSource + Clone>(
    engine: &Engine<S>,
    strategy: Strategy,
) -> Option<Action> {
    match (strategy, engine.config().discipline) {
        (Strategy::MaxScore, MatchDiscipline::Run) => {
            choose_swap_max_score(engine).map(|(_, action)| action)
        }
        (Strategy::MaxScore, MatchDiscipline::Connectivity) => {
            choose_smash_max_score(engine).map(|(_, action)| action)
        }
        (Strategy::FirstFound, _) => choose_first_found(engine),
    }
}

/// Summary of one automated game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayReport {
    /// Final score.
    pub score: u64,
    /// Accepted actions, drops included.
    pub moves: u32,
    /// Deepest chain reached.
    pub best_chain: u32,
    /// `true` if the game ended because nothing was left to play, `false` if
    /// it hit the move limit.
    pub finished: bool,
}

/// Plays until no move is left or `max_moves` actions have been taken.
///
/// When the strategy has nothing to smash and drops are possible, a value is
/// spawned instead; a full column ends the game.
///
/// # Errors
/// Only [`EngineError::InternalInvariantViolation`] escapes; rejections of
/// chosen moves cannot happen because every move comes from a scan.
pub fn play_out<S: ValueSource + Clone>(
    engine: &mut Engine<S>,
    strategy: Strategy,
    max_moves: u32,
) -> Result<PlayReport, EngineError> {
    let mut finished = false;
    for _ in 0..max_moves {
        let action = match choose_move(engine, strategy) {
            Some(action) => action,
            None if engine.config().discipline.is_connectivity() && engine.has_moves() => {
                Action::Spawn
            }
            None => {
                finished = true;
                break;
            }
        };
        match action.apply(engine) {
            Ok(_) => {}
            Err(EngineError::ColumnFull { col }) => {
                debug!("column {col} is full; game over");
                finished = true;
                break;
            }
            Err(err) => return Err(err),
        }
    }
    let state = engine.score_state();
    Ok(PlayReport {
        score: state.score(),
        moves: state.moves(),
        best_chain: state.best_chain(),
        finished,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::source::{RandomSource, SequenceSource};
    use crate::utils::grid_from_str_array;

    #[test]
    fn test_choose_smash_max_score_prefers_points() {
        // Two 0s are worth 2, three 1s are worth 6.
        let grid = grid_from_str_array(&["0039", "1119", "2345"], 10).unwrap();
        let config = EngineConfig::smash().with_dimensions(3, 4);
        let engine = Engine::with_grid(config, grid, SequenceSource::new(vec![0])).unwrap();
        assert_eq!(choose_smash_max_score(&engine), Some((6, Action::Smash((1, 0)))));
        assert_eq!(choose_first_found(&engine), Some(Action::Smash((0, 0))));
    }

    #[test]
    fn test_choose_swap_max_score() {
        let grid = grid_from_str_array(&["001", "230", "452"], 6).unwrap();
        let config = EngineConfig::crush().with_dimensions(3, 3);
        let source = SequenceSource::new(vec![3, 4, 5]);
        let engine = Engine::with_grid(config, grid.clone(), source).unwrap();

        let (score, action) = choose_swap_max_score(&engine).unwrap();
        assert_eq!(action, Action::Swap((0, 2), (1, 2)));
        assert!(score >= 30);
        // Choosing must not touch the engine.
        assert_eq!(engine.grid(), &grid);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_no_moves_on_stuck_grid() {
        let grid = grid_from_str_array(&["01", "23"], 6).unwrap();
        let config = EngineConfig::crush().with_dimensions(2, 2);
        let mut engine = Engine::with_grid(config, grid, SequenceSource::new(vec![0])).unwrap();
        assert_eq!(choose_move(&engine, Strategy::MaxScore), None);

        let report = play_out(&mut engine, Strategy::MaxScore, 10).unwrap();
        assert!(report.finished);
        assert_eq!(report.moves, 0);
    }

    #[test]
    fn test_play_out_crush_scores() {
        let config = EngineConfig::crush().with_seed(3);
        let mut engine = Engine::new(config).unwrap();
        let report = play_out(&mut engine, Strategy::MaxScore, 20).unwrap();
        assert_eq!(report.score, engine.score());
        assert!(report.moves <= 20);
        if report.moves > 0 {
            assert!(report.score > 0);
            assert!(report.best_chain >= 1);
        }
    }

    #[test]
    fn test_play_out_stack_ends_on_full_column() {
        let config = EngineConfig::stack().with_dimensions(4, 3).with_seed(5);
        let mut engine = Engine::with_source(config, RandomSource::seeded(5)).unwrap();
        let report = play_out(&mut engine, Strategy::FirstFound, 10_000).unwrap();
        assert!(report.finished);
        assert!(report.moves > 0);
    }
}
