//! Engine configuration and the presets for the three supported games.
use crate::error::EngineError;
use crate::grid::validate_shape;
use crate::matcher::{SmashableSet, DEFAULT_MIN_GROUP, DEFAULT_MIN_RUN};
use crate::resolver::DEFAULT_MAX_CASCADE_STEPS;
use crate::score::{ConnectivityScoring, DEFAULT_POINTS_PER_TILE};

/// Which removal rule drives the game.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant,
)]
pub enum MatchDiscipline {
    /// Swap adjacent cells to form straight runs; removals cascade.
    #[default]
    #[display("run")]
    Run,
    /// Click a cell to remove its connected group; no cascades.
    #[display("connectivity")]
    Connectivity,
}

/// What happens to cells vacated by gravity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefillPolicy {
    /// Vacated cells receive fresh values from the value source.
    #[default]
    Refill,
    /// Vacated cells stay empty.
    LeaveEmpty,
}

/// How the grid is populated at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InitialFill {
    /// Every cell gets a value and no runs are left.
    #[default]
    Random,
    /// The grid starts empty and fills through drops.
    Empty,
}

/// Everything needed to build an [`Engine`](crate::engine::Engine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Grid height.
    pub rows: usize,
    /// Grid width.
    pub cols: usize,
    /// Number of cell values; values are `0..alphabet_size`.
    pub alphabet_size: u8,
    /// Removal rule.
    pub discipline: MatchDiscipline,
    /// Shortest straight run that is removed.
    pub min_run_length: usize,
    /// Smallest connected group that can be smashed.
    pub min_group_size: usize,
    /// Base points per tile for cascades.
    pub base_points_per_tile: u64,
    /// Values that may be smashed.
    pub smashable: SmashableSet,
    /// Scoring rule for smashes.
    pub connectivity_scoring: ConnectivityScoring,
    /// Refill behaviour after gravity.
    pub refill: RefillPolicy,
    /// Initial population.
    pub initial_fill: InitialFill,
    /// Cascade steps allowed per action before giving up.
    pub max_cascade_steps: usize,
    /// Seed for the value source; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::crush()
    }
}

impl EngineConfig {
    /// Match-three swapping on an 8x8 grid with six values.
    pub fn crush() -> Self {
        EngineConfig {
            rows: 8,
            cols: 8,
            alphabet_size: 6,
            discipline: MatchDiscipline::Run,
            min_run_length: DEFAULT_MIN_RUN,
            min_group_size: DEFAULT_MIN_GROUP,
            base_points_per_tile: DEFAULT_POINTS_PER_TILE,
            smashable: SmashableSet::new(),
            connectivity_scoring: ConnectivityScoring::ByValue,
            refill: RefillPolicy::Refill,
            initial_fill: InitialFill::Random,
            max_cascade_steps: DEFAULT_MAX_CASCADE_STEPS,
            seed: None,
        }
    }

    /// Smash groups of 0s and 1s among the digits 0-9; refilled from above.
    pub fn smash() -> Self {
        EngineConfig {
            alphabet_size: 10,
            discipline: MatchDiscipline::Connectivity,
            smashable: SmashableSet::from([0, 1]),
            connectivity_scoring: ConnectivityScoring::ByValue,
            ..EngineConfig::crush()
        }
    }

    /// Digits drop into a 10x7 well; smashing 0s and 1s scores 10 per tile and
    /// nothing is refilled.
    pub fn stack() -> Self {
        EngineConfig {
            rows: 10,
            cols: 7,
            refill: RefillPolicy::LeaveEmpty,
            initial_fill: InitialFill::Empty,
            connectivity_scoring: ConnectivityScoring::PerTile(DEFAULT_POINTS_PER_TILE),
            ..EngineConfig::smash()
        }
    }

    /// Replaces the grid dimensions.
    pub fn with_dimensions(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Replaces the alphabet size.
    pub fn with_alphabet(mut self, alphabet_size: u8) -> Self {
        self.alphabet_size = alphabet_size;
        self
    }

    /// Fixes the value source seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the configuration describes a playable engine.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_shape(self.rows, self.cols, self.alphabet_size)?;
        if self.min_run_length < 2 {
            return Err(EngineError::invalid_config(format!(
                "minimum run length must be at least 2, got {}",
                self.min_run_length
            )));
        }
        if self.min_group_size == 0 {
            return Err(EngineError::invalid_config(
                "minimum group size must be at least 1",
            ));
        }
        if self.max_cascade_steps == 0 {
            return Err(EngineError::invalid_config(
                "cascade step cap must be at least 1",
            ));
        }
        if let Some(&value) = self.smashable.iter().find(|&&v| v >= self.alphabet_size) {
            return Err(EngineError::invalid_config(format!(
                "smashable value {value} is outside the alphabet 0..{}",
                self.alphabet_size
            )));
        }
        if self.discipline.is_connectivity() && self.smashable.is_empty() {
            return Err(EngineError::invalid_config(
                "connectivity matching needs at least one smashable value",
            ));
        }
        if self.discipline.is_run() && self.initial_fill == InitialFill::Empty {
            return Err(EngineError::invalid_config(
                "run matching needs a populated grid",
            ));
        }
        Ok(())
    }
}
