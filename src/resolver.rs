//! The cascade loop: scan, clear, collapse, rescan until stable.
use crate::config::{EngineConfig, RefillPolicy};
use crate::error::EngineError;
use crate::grid::{Cell, Grid};
use crate::matcher::{self, MatchSet};
use crate::score::ScoreModel;
use crate::source::ValueSource;
use log::{debug, error, trace};

/// Default cap on cascade steps within one resolution.
pub const DEFAULT_MAX_CASCADE_STEPS: usize = 256;

/// One round of removal within a resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadeStep {
    /// 1 for the first step, then 2, 3, ...
    pub depth: u32,
    /// Cells cleared in this step, before gravity moved anything.
    pub cleared: MatchSet,
    /// Points awarded for this step.
    pub score: u64,
}

impl CascadeStep {
    /// Number of cells removed in this step.
    pub fn removed(&self) -> usize {
        self.cleared.len()
    }
}

/// The ordered steps of one resolution, for a renderer to replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Steps in the order they happened.
    pub steps: Vec<CascadeStep>,
}

impl Resolution {
    /// Returns `true` if nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cells removed per step, in order.
    pub fn removed_per_cascade(&self) -> Vec<usize> {
        self.steps.iter().map(CascadeStep::removed).collect()
    }

    /// Cells removed over all steps.
    pub fn total_removed(&self) -> usize {
        self.steps.iter().map(CascadeStep::removed).sum()
    }

    /// Points awarded over all steps.
    pub fn score_delta(&self) -> u64 {
        self.steps.iter().map(|step| step.score).sum()
    }

    /// Depth of the last step; 0 for an empty resolution.
    pub fn chain_depth(&self) -> u32 {
        self.steps.last().map_or(0, |step| step.depth)
    }
}

/// Drives run-match cascades to a stable grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolver {
    scoring: ScoreModel,
    min_run: usize,
    refill: RefillPolicy,
    max_steps: usize,
}

impl Resolver {
    /// Creates a resolver.
    pub fn new(
        scoring: ScoreModel,
        min_run: usize,
        refill: RefillPolicy,
        max_steps: usize,
    ) -> Self {
        Resolver {
            scoring,
            min_run,
            refill,
            max_steps,
        }
    }

    /// Creates a resolver matching an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Resolver::new(
            ScoreModel::new(config.base_points_per_tile, config.connectivity_scoring),
            config.min_run_length,
            config.refill,
            config.max_cascade_steps,
        )
    }

    /// Runs cascades until the run scan comes back empty.
    ///
    /// Each step clears every matched cell, applies gravity to every column
    /// (refilling per the policy) and scores `removed * base * depth`.
    ///
    /// # Errors
    /// [`EngineError::InternalInvariantViolation`] when the grid is still
    /// unstable after the configured number of steps. The grid is left as it
    /// was after the last completed step.
    pub fn resolve<S: ValueSource + ?Sized>(
        &self,
        grid: &mut Grid,
        source: &mut S,
    ) -> Result<Resolution, EngineError> {
        let mut resolution = Resolution::default();
        loop {
            let matched = matcher::find_runs(grid, self.min_run);
            if matched.is_empty() {
                trace!("grid stable after {} cascade steps", resolution.steps.len());
                return Ok(resolution);
            }
            if resolution.steps.len() >= self.max_steps {
                error!(
                    "cascade still finding matches after {} steps; giving up",
                    self.max_steps
                );
                return Err(EngineError::InternalInvariantViolation {
                    steps: self.max_steps,
                });
            }

            let depth = resolution.steps.len() as u32 + 1;
            self.clear_and_collapse(grid, &matched, source)?;
            let score = self.scoring.cascade_delta(matched.len(), depth);
            debug!(
                "cascade step {depth}: cleared {} cells for {score} points",
                matched.len()
            );
            resolution.steps.push(CascadeStep {
                depth,
                cleared: matched,
                score,
            });
        }
    }

    /// Clears runs until the grid is stable, without scoring anything.
    ///
    /// Used on a freshly populated grid before play starts.
    ///
    /// # Returns
    /// The number of clearing steps it took; 0 for a grid that was already
    /// stable.
    ///
    /// # Errors
    /// [`EngineError::InternalInvariantViolation`] under the same cap as
    /// [`Resolver::resolve`].
    pub fn stabilize<S: ValueSource + ?Sized>(
        &self,
        grid: &mut Grid,
        source: &mut S,
    ) -> Result<usize, EngineError> {
        let mut steps = 0;
        loop {
            let matched = matcher::find_runs(grid, self.min_run);
            if matched.is_empty() {
                return Ok(steps);
            }
            if steps >= self.max_steps {
                error!("grid still unstable after {} clearing steps", self.max_steps);
                return Err(EngineError::InternalInvariantViolation {
                    steps: self.max_steps,
                });
            }
            self.clear_and_collapse(grid, &matched, source)?;
            steps += 1;
            trace!("stabilize step {steps}: cleared {} cells", matched.len());
        }
    }

    fn clear_and_collapse<S: ValueSource + ?Sized>(
        &self,
        grid: &mut Grid,
        matched: &MatchSet,
        source: &mut S,
    ) -> Result<(), EngineError> {
        for &(r, c) in matched {
            grid.put(r, c, Cell::Empty);
        }
        for c in 0..grid.cols() {
            match self.refill {
                RefillPolicy::Refill => grid.collapse_column(c, source)?,
                RefillPolicy::LeaveEmpty => grid.compact_column(c)?,
            };
        }
        Ok(())
    }
}
