//! The engine façade that front-ends use.
//!
//! `Engine` owns the grid, the value source, the scoring state, the swap trial
//! and an undo history. Every player action goes through one of its
//! `request_*` methods, which either apply the action completely or reject it
//! with an [`EngineError`] and leave everything untouched.
use crate::config::{EngineConfig, InitialFill, MatchDiscipline, RefillPolicy};
use crate::error::{EmptyMatchReason, EngineError, InvalidMoveReason};
use crate::grid::{Cell, Coord, Grid};
use crate::matcher::{self, MatchSet, SmashableSet};
use crate::resolver::{Resolution, Resolver};
use crate::score::{ScoreModel, ScoreState};
use crate::source::{RandomSource, ValueSource};
use crate::swap::{SwapAttempt, SwapTrial, TrialState};
use log::debug;
use std::collections::BTreeSet;

/// Result of a settled swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOutcome {
    /// The swap that was tried.
    pub attempt: SwapAttempt,
    /// `true` if the swap created a run and stayed; `false` if it was reverted.
    pub committed: bool,
    /// Cascade steps triggered by the swap; empty when reverted.
    pub resolution: Resolution,
}

impl SwapOutcome {
    /// Points scored by the swap.
    pub fn score_delta(&self) -> u64 {
        self.resolution.score_delta()
    }

    /// Cells removed per cascade step.
    pub fn removed_per_cascade(&self) -> Vec<usize> {
        self.resolution.removed_per_cascade()
    }
}

/// Result of a successful smash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmashOutcome {
    /// The value the group held.
    pub value: u8,
    /// Cells removed, as they were before gravity.
    pub cleared: MatchSet,
    /// Points scored.
    pub score_delta: u64,
}

impl SmashOutcome {
    /// Number of cells removed.
    pub fn removed_count(&self) -> usize {
        self.cleared.len()
    }
}

/// Where a dropped value came to rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DropOutcome {
    /// Column the value was dropped into.
    pub col: usize,
    /// Row it landed on.
    pub row: usize,
    /// The dropped value.
    pub value: u8,
}

fn rejected(err: EngineError) -> EngineError {
    debug!("action rejected: {err}");
    err
}

/// A single game session.
///
/// # Examples
/// ```
/// use tile_cascade::config::EngineConfig;
/// use tile_cascade::engine::Engine;
/// use tile_cascade::matcher::find_scoring_swaps;
///
/// let mut engine = Engine::new(EngineConfig::crush().with_seed(7)).unwrap();
/// if let Some(&(a, b)) = find_scoring_swaps(engine.grid(), 3).first() {
///     let outcome = engine.request_swap(a, b).unwrap();
///     assert!(outcome.committed);
///     assert_eq!(engine.score(), outcome.score_delta());
/// }
///
/// // Non-adjacent swaps are refused and change nothing.
/// let before = engine.grid().clone();
/// assert!(engine.request_swap((0, 0), (2, 2)).unwrap_err().is_rejection());
/// assert_eq!(engine.grid(), &before);
/// ```
#[derive(Clone, Debug)]
pub struct Engine<S: ValueSource = RandomSource> {
    config: EngineConfig,
    grid: Grid,
    source: S,
    resolver: Resolver,
    scoring: ScoreModel,
    trial: SwapTrial,
    state: ScoreState,
    history: Vec<(Grid, ScoreState)>, // (grid, score) after each accepted action, for undo
}

impl Engine<RandomSource> {
    /// Creates an engine from a configuration, seeding the value source from
    /// `config.seed` or from the operating system.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] if the configuration does not validate.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let source = match config.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        Engine::with_source(config, source)
    }

    /// Creates a run-matching engine of the given size with default rules.
    ///
    /// # Arguments
    /// * `rows`: Grid height.
    /// * `cols`: Grid width.
    /// * `alphabet_size`: Number of distinct values.
    ///
    /// # Returns
    /// A seeded-from-entropy engine whose grid has no runs of three.
    pub fn initialize(rows: usize, cols: usize, alphabet_size: u8) -> Result<Self, EngineError> {
        Engine::new(
            EngineConfig::crush()
                .with_dimensions(rows, cols)
                .with_alphabet(alphabet_size),
        )
    }
}

impl<S: ValueSource> Engine<S> {
    /// Creates an engine drawing every value from `source`.
    ///
    /// A `Random` initial fill is cleaned of runs before play starts, whatever
    /// the discipline, then handed to [`Resolver::stabilize`] so the first
    /// action always starts from a stable grid.
    ///
    /// # Arguments
    /// * `config` - Grid shape, rules and presets.
    /// * `source` - Supplies the initial population, refills and spawns.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] if the configuration does not validate,
    /// and [`EngineError::InternalInvariantViolation`] if the initial grid
    /// cannot be cleaned.
    pub fn with_source(config: EngineConfig, mut source: S) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = match config.initial_fill {
            InitialFill::Random => {
                let mut grid = Grid::initialize(
                    config.rows,
                    config.cols,
                    config.alphabet_size,
                    config.min_run_length,
                    &mut source,
                )?;
                let steps = Resolver::from_config(&config).stabilize(&mut grid, &mut source)?;
                debug!(
                    "initial {}x{} grid ready after {steps} clearing steps",
                    grid.rows(),
                    grid.cols()
                );
                grid
            }
            InitialFill::Empty => {
                Grid::new_empty(config.rows, config.cols, config.alphabet_size)?
            }
        };
        Ok(Engine::assemble(config, grid, source))
    }

    /// Creates an engine around an existing grid, used as-is.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] if the configuration does not validate
    /// or the grid's shape or alphabet differs from it.
    pub fn with_grid(config: EngineConfig, grid: Grid, source: S) -> Result<Self, EngineError> {
        config.validate()?;
        if (grid.rows(), grid.cols(), grid.alphabet_size())
            != (config.rows, config.cols, config.alphabet_size)
        {
            return Err(EngineError::invalid_config(format!(
                "grid is {}x{} over {} values but the configuration asks for {}x{} over {}",
                grid.rows(),
                grid.cols(),
                grid.alphabet_size(),
                config.rows,
                config.cols,
                config.alphabet_size
            )));
        }
        Ok(Engine::assemble(config, grid, source))
    }

    fn assemble(config: EngineConfig, grid: Grid, source: S) -> Self {
        let state = ScoreState::default();
        Engine {
            resolver: Resolver::from_config(&config),
            scoring: ScoreModel::new(config.base_points_per_tile, config.connectivity_scoring),
            history: vec![(grid.clone(), state)],
            config,
            grid,
            source,
            trial: SwapTrial::default(),
            state,
        }
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the cell at `(r, c)`.
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`] when out of range.
    pub fn inspect(&self, r: usize, c: usize) -> Result<Cell, EngineError> {
        self.grid.get(r, c)
    }

    /// Total points scored.
    pub fn score(&self) -> u64 {
        self.state.score()
    }

    /// Chain counter; 0 between actions.
    pub fn chain(&self) -> u32 {
        self.state.chain()
    }

    /// Full scoring state, including last and best chain.
    pub fn score_state(&self) -> &ScoreState {
        &self.state
    }

    /// Number of accepted actions that changed the grid.
    pub fn moves(&self) -> u32 {
        self.state.moves()
    }

    /// State of the swap trial.
    pub fn trial_state(&self) -> TrialState {
        self.trial.state()
    }

    fn require(&self, discipline: MatchDiscipline) -> Result<(), EngineError> {
        if self.config.discipline == discipline {
            Ok(())
        } else {
            Err(rejected(EngineError::invalid_move(
                InvalidMoveReason::WrongDiscipline(self.config.discipline),
            )))
        }
    }

    fn record(&mut self) {
        self.history.push((self.grid.clone(), self.state));
    }

    /// Applies a swap and leaves it pending, so a front end can show it
    /// before [`Engine::settle_swap`] decides its fate.
    ///
    /// # Errors
    /// Rejections from [`SwapTrial::begin`], or
    /// [`InvalidMoveReason::WrongDiscipline`] outside run matching.
    pub fn begin_swap(&mut self, a: Coord, b: Coord) -> Result<SwapAttempt, EngineError> {
        self.require(MatchDiscipline::Run)?;
        self.trial.begin(&mut self.grid, a, b).map_err(rejected)
    }

    /// Evaluates the pending swap, then either resolves the cascade or puts
    /// both cells back.
    ///
    /// # Errors
    /// [`InvalidMoveReason::NoPendingSwap`] when nothing is pending, and
    /// [`EngineError::InternalInvariantViolation`] when the cascade does not
    /// settle. In the latter case the grid is left mid-cascade and no points
    /// are awarded.
    pub fn settle_swap(&mut self) -> Result<SwapOutcome, EngineError> {
        let decision = self
            .trial
            .evaluate(&self.grid, self.config.min_run_length)
            .map_err(rejected)?;
        let attempt = self.trial.finish(&mut self.grid)?;

        if decision.is_revert() {
            debug!("swap {:?} <-> {:?} made no run; reverted", attempt.from, attempt.to);
            self.state.apply_resolution(&Resolution::default());
            return Ok(SwapOutcome {
                attempt,
                committed: false,
                resolution: Resolution::default(),
            });
        }

        let resolution = self.resolver.resolve(&mut self.grid, &mut self.source)?;
        self.state.apply_resolution(&resolution);
        self.record();
        debug!(
            "swap {:?} <-> {:?} committed: {} steps, {} points",
            attempt.from,
            attempt.to,
            resolution.steps.len(),
            resolution.score_delta()
        );
        Ok(SwapOutcome {
            attempt,
            committed: true,
            resolution,
        })
    }

    /// Swaps two adjacent cells and settles the result in one call.
    ///
    /// `Ok` means the request was accepted; check
    /// [`SwapOutcome::committed`] to see whether it scored or was reverted.
    ///
    /// # Arguments
    /// * `a`: `(row, col)` of the first cell.
    /// * `b`: `(row, col)` of the second cell; must be orthogonally adjacent
    ///   to `a`.
    ///
    /// # Returns
    /// The attempt, whether it was kept, and the cascade steps it triggered.
    ///
    /// # Errors
    /// Everything [`Engine::begin_swap`] and [`Engine::settle_swap`] report.
    /// Rejections leave the grid and score untouched.
    pub fn request_swap(&mut self, a: Coord, b: Coord) -> Result<SwapOutcome, EngineError> {
        self.begin_swap(a, b)?;
        self.settle_swap()
    }

    /// Plays a swap on copies of the grid and value source and reports what
    /// it would do. The engine itself, its history included, is not touched.
    ///
    /// The copied source hands out the same refill values the real move
    /// would get, so the predicted cascade matches [`Engine::request_swap`].
    ///
    /// # Errors
    /// The same rejections as [`Engine::request_swap`].
    pub fn preview_swap(&self, a: Coord, b: Coord) -> Result<SwapOutcome, EngineError>
    where
        S: Clone,
    {
        self.require(MatchDiscipline::Run)?;
        let mut grid = self.grid.clone();
        let mut source = self.source.clone();
        let mut trial = SwapTrial::default();
        trial.begin(&mut grid, a, b)?;
        let decision = trial.evaluate(&grid, self.config.min_run_length)?;
        let attempt = trial.finish(&mut grid)?;
        let resolution = if decision.is_commit() {
            self.resolver.resolve(&mut grid, &mut source)?
        } else {
            Resolution::default()
        };
        Ok(SwapOutcome {
            attempt,
            committed: decision.is_commit(),
            resolution,
        })
    }

    /// Smashes the connected group at `(r, c)` using the configured
    /// smashable values.
    ///
    /// # Arguments
    /// * `r`: The row index (0-based).
    /// * `c`: The column index (0-based).
    ///
    /// # Errors
    /// See [`Engine::request_smash_with`].
    pub fn request_smash(&mut self, r: usize, c: usize) -> Result<SmashOutcome, EngineError> {
        let smashable = self.config.smashable.clone();
        self.request_smash_with(r, c, &smashable)
    }

    /// Smashes the connected group at `(r, c)` if its value is in `smashable`
    /// and it has at least the configured minimum size.
    ///
    /// The group is cleared, gravity runs on the affected columns (refilling
    /// per the policy) and the group is scored. Groups formed by gravity are
    /// left for the player.
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`], [`EngineError::EmptyMatch`] with the
    /// reason nothing was removed, or [`InvalidMoveReason::WrongDiscipline`]
    /// outside connectivity matching.
    pub fn request_smash_with(
        &mut self,
        r: usize,
        c: usize,
        smashable: &SmashableSet,
    ) -> Result<SmashOutcome, EngineError> {
        self.require(MatchDiscipline::Connectivity)?;
        let value = match self.grid.get(r, c).map_err(rejected)? {
            Cell::Empty => {
                return Err(rejected(EngineError::empty_match(EmptyMatchReason::EmptyCell)))
            }
            Cell::Value(v) if !smashable.contains(&v) => {
                return Err(rejected(EngineError::empty_match(
                    EmptyMatchReason::NotSmashable { value: v },
                )))
            }
            Cell::Value(v) => v,
        };
        let group = matcher::flood_region(&self.grid, r, c);
        if group.len() < self.config.min_group_size {
            return Err(rejected(EngineError::empty_match(
                EmptyMatchReason::GroupTooSmall {
                    size: group.len(),
                    min: self.config.min_group_size,
                },
            )));
        }

        for &(gr, gc) in &group {
            self.grid.put(gr, gc, Cell::Empty);
        }
        let columns: BTreeSet<usize> = group.iter().map(|&(_, gc)| gc).collect();
        for col in columns {
            match self.config.refill {
                RefillPolicy::Refill => self.grid.collapse_column(col, &mut self.source)?,
                RefillPolicy::LeaveEmpty => self.grid.compact_column(col)?,
            };
        }

        let points = self.scoring.group_delta(group.len(), value);
        self.state.apply_smash(points);
        self.record();
        debug!("smashed {} cells of {value} at ({r}, {c}) for {points} points", group.len());
        Ok(SmashOutcome {
            value,
            cleared: group,
            score_delta: points,
        })
    }

    /// Drops `value` into column `col`. Nothing is matched on landing.
    ///
    /// # Arguments
    /// * `col`: Target column (0-based).
    /// * `value`: Value to drop; must be below the alphabet size.
    ///
    /// # Returns
    /// Where the value came to rest.
    ///
    /// # Errors
    /// [`EngineError::ColumnFull`] when the column's top cell is occupied,
    /// which ends a stacking game.
    pub fn request_drop(&mut self, col: usize, value: u8) -> Result<DropOutcome, EngineError> {
        self.require(MatchDiscipline::Connectivity)?;
        let row = self.grid.drop_into_column(col, value).map_err(rejected)?;
        self.state.apply_placement();
        self.record();
        debug!("dropped {value} into column {col}, landed on row {row}");
        Ok(DropOutcome { col, row, value })
    }

    /// Drops a value drawn from the source into a column drawn from the
    /// source. The column is drawn first.
    ///
    /// # Errors
    /// [`EngineError::ColumnFull`] when the drawn column is full, and
    /// [`InvalidMoveReason::WrongDiscipline`] outside connectivity matching.
    pub fn spawn_drop(&mut self) -> Result<DropOutcome, EngineError> {
        self.require(MatchDiscipline::Connectivity)?;
        let col = self.source.next_index(self.grid.cols());
        let value = self.source.next_value(self.grid.alphabet_size());
        self.request_drop(col, value)
    }

    /// Overwrites a cell without running any matching.
    ///
    /// This is an editing aid: it does not count as a move, does not score
    /// and is not recorded for undo.
    ///
    /// # Arguments
    /// * `r`: The row index (0-based).
    /// * `c`: The column index (0-based).
    /// * `value`: The new value.
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`] or [`EngineError::InvalidValue`].
    pub fn set_cell(&mut self, r: usize, c: usize, value: u8) -> Result<(), EngineError> {
        self.grid.set(r, c, value)
    }

    /// Replaces a non-empty cell with a fresh value from the source, without
    /// running any matching.
    ///
    /// # Returns
    /// The new value.
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`], or
    /// [`InvalidMoveReason::EmptyCell`] for an empty cell.
    pub fn reroll_cell(&mut self, r: usize, c: usize) -> Result<u8, EngineError> {
        if self.grid.get(r, c)?.is_empty() {
            return Err(EngineError::invalid_move(InvalidMoveReason::EmptyCell));
        }
        self.grid.fill_random(r, c, &mut self.source)
    }

    /// Returns `true` if some action could still remove cells.
    ///
    /// Under run matching that is a swap creating a run. Under connectivity
    /// matching it is a smashable group or a column with room for a drop.
    pub fn has_moves(&self) -> bool {
        match self.config.discipline {
            MatchDiscipline::Run => {
                !matcher::find_scoring_swaps(&self.grid, self.config.min_run_length).is_empty()
            }
            MatchDiscipline::Connectivity => {
                (0..self.grid.cols()).any(|c| self.grid.at(0, c).is_empty())
                    || !matcher::find_all_groups(
                        &self.grid,
                        &self.config.smashable,
                        self.config.min_group_size,
                    )
                    .is_empty()
            }
        }
    }

    /// Returns the grid and score to where they were before the last
    /// accepted action.
    ///
    /// # Returns
    /// * `true` if an action was undone.
    /// * `false` if there is nothing to undo or a swap is pending.
    pub fn undo_last_action(&mut self) -> bool {
        if !self.trial.is_idle() || self.history.len() <= 1 {
            return false;
        }
        self.history.pop();
        let Some((grid, state)) = self.history.last() else {
            return false;
        };
        self.grid = grid.clone();
        self.state = *state;
        debug!("undid last action; score back to {}", self.state.score());
        true
    }
}
