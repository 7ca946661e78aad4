//! Scoring rules and the running score.
use crate::resolver::Resolution;

/// Points per removed tile used by the run-matching presets.
pub const DEFAULT_POINTS_PER_TILE: u64 = 10;

/// How a connectivity smash is scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectivityScoring {
    /// `size * (value + 1)`: higher values are worth more.
    #[default]
    ByValue,
    /// `size * points`, whatever the value.
    PerTile(u64),
}

/// Pure mapping from removals to score deltas.
///
/// # Examples
/// ```
/// use tile_cascade::score::{ConnectivityScoring, ScoreModel};
///
/// let model = ScoreModel::new(10, ConnectivityScoring::ByValue);
/// assert_eq!(model.cascade_delta(3, 1), 30);
/// assert_eq!(model.cascade_delta(4, 2), 80);
/// assert_eq!(model.group_delta(5, 1), 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScoreModel {
    base_points_per_tile: u64,
    connectivity: ConnectivityScoring,
}

impl Default for ScoreModel {
    fn default() -> Self {
        ScoreModel::new(DEFAULT_POINTS_PER_TILE, ConnectivityScoring::ByValue)
    }
}

impl ScoreModel {
    /// Creates a model from the per-tile base and the connectivity rule.
    pub fn new(base_points_per_tile: u64, connectivity: ConnectivityScoring) -> Self {
        ScoreModel {
            base_points_per_tile,
            connectivity,
        }
    }

    /// Points for one cascade step: `removed * base * depth`.
    ///
    /// `depth` is 1 for the first step of a resolution and grows by one per
    /// follow-on step.
    pub fn cascade_delta(&self, removed: usize, depth: u32) -> u64 {
        removed as u64 * self.base_points_per_tile * u64::from(depth)
    }

    /// Points for smashing a group of `size` cells holding `value`.
    pub fn group_delta(&self, size: usize, value: u8) -> u64 {
        match self.connectivity {
            ConnectivityScoring::ByValue => size as u64 * (u64::from(value) + 1),
            ConnectivityScoring::PerTile(points) => size as u64 * points,
        }
    }
}

/// Running score of one engine.
///
/// The score only ever grows. The chain counter goes up by one for every
/// resolution step that removes cells and drops back to 0 as soon as a step
/// removes nothing, so between actions it is 0 and [`ScoreState::last_chain`]
/// holds the depth the previous action reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScoreState {
    score: u64,
    chain: u32,
    last_chain: u32,
    best_chain: u32,
    moves: u32,
}

impl ScoreState {
    /// Total points scored so far.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Current chain counter (0 once an action has settled).
    pub fn chain(&self) -> u32 {
        self.chain
    }

    /// Depth reached by the most recent action; 0 if it removed nothing.
    pub fn last_chain(&self) -> u32 {
        self.last_chain
    }

    /// Deepest chain reached in this game.
    pub fn best_chain(&self) -> u32 {
        self.best_chain
    }

    /// Number of accepted actions that removed or placed cells.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    fn record_step(&mut self, points: u64) {
        self.chain += 1;
        self.score += points;
    }

    fn settle(&mut self) {
        self.last_chain = self.chain;
        self.best_chain = self.best_chain.max(self.chain);
        self.chain = 0;
    }

    /// Folds a finished cascade into the score. An empty resolution (a
    /// reverted swap) only resets the chain.
    pub fn apply_resolution(&mut self, resolution: &Resolution) {
        for step in &resolution.steps {
            self.record_step(step.score);
        }
        if !resolution.is_empty() {
            self.moves += 1;
        }
        self.settle();
    }

    /// Records a single smash worth `points`.
    pub fn apply_smash(&mut self, points: u64) {
        self.record_step(points);
        self.moves += 1;
        self.settle();
    }

    /// Records a placement that removed nothing.
    pub fn apply_placement(&mut self) {
        self.moves += 1;
        self.settle();
    }
}
