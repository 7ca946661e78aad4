//! # Tile Cascade
//!
//! A rule engine for tile-matching puzzle games on a rectangular grid. It
//! owns the grid, decides what matches, removes matched tiles, lets the rest
//! fall, refills the gaps and keeps score, including chain bonuses when one
//! move sets off a cascade.
//!
//! Two removal rules are supported:
//! - run matching: swap two adjacent tiles so that three or more equal values
//!   line up; the removal may cascade;
//! - connectivity matching: pick a tile and remove its whole connected group
//!   of equal values, provided the value is smashable.
//!
//! The library is used by three binaries:
//! - `play`: interactive terminal game for any preset.
//! - `replay`: loads a grid from a file and applies a scripted list of actions.
//! - `simulate`: plays seeded games with an automated strategy and reports
//!   averages.
//!
//! ## Modules
//! - `grid`: cells, the grid and its gravity and refill primitives.
//! - `matcher`: run scans and connected-group searches.
//! - `resolver`: the cascade loop.
//! - `swap`: the two-phase swap trial.
//! - `score`: scoring rules and running score.
//! - `engine`: the `Engine` façade tying everything together.
//! - `config`, `error`, `source`: configuration, errors and value generators.
//! - `action`, `heuristics`, `cli`: scripted actions, automated play and
//!   shared command-line arguments.
//! - `utils`: parsing grids from text.

pub mod action;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod heuristics;
pub mod matcher;
pub mod resolver;
pub mod score;
pub mod source;
pub mod swap;
pub mod utils;
