//! Pure scans over a grid snapshot.
//!
//! Two disciplines are supported:
//! - run matching: straight horizontal or vertical runs of equal values,
//!   scanned over the whole grid;
//! - connectivity matching: the 4-connected region around one seed cell,
//!   limited to a set of smashable values.
//!
//! Scans never mutate the grid and return coordinates as a [`MatchSet`].
use crate::grid::{Cell, Coord, Grid};
use std::collections::{BTreeSet, VecDeque};

/// A set of grid coordinates, ordered row-major.
pub type MatchSet = BTreeSet<Coord>;

/// Values eligible for connectivity removal.
pub type SmashableSet = BTreeSet<u8>;

/// Default minimum run length for run matching.
pub const DEFAULT_MIN_RUN: usize = 3;

/// Default minimum region size for connectivity matching.
pub const DEFAULT_MIN_GROUP: usize = 2;

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Collects every cell that belongs to a run of `min_run` or more equal values.
///
/// Rows are scanned left to right and columns top to bottom; a cell matched in
/// both directions appears once. Empty cells never form runs.
///
/// # Examples
/// ```
/// use tile_cascade::matcher::find_runs;
/// use tile_cascade::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["1112", "3452", "3412"], 6).unwrap();
/// let runs = find_runs(&grid, 3);
/// assert_eq!(
///     runs.into_iter().collect::<Vec<_>>(),
///     vec![(0, 0), (0, 1), (0, 2), (0, 3), (1, 3), (2, 3)]
/// );
/// ```
pub fn find_runs(grid: &Grid, min_run: usize) -> MatchSet {
    let mut matched = MatchSet::new();
    for r in 0..grid.rows() {
        scan_line(&mut matched, grid.cols(), min_run, |i| grid.at(r, i), |i| (r, i));
    }
    for c in 0..grid.cols() {
        scan_line(&mut matched, grid.rows(), min_run, |i| grid.at(i, c), |i| (i, c));
    }
    matched
}

fn scan_line(
    matched: &mut MatchSet,
    len: usize,
    min_run: usize,
    cell_at: impl Fn(usize) -> Cell,
    coord_at: impl Fn(usize) -> Coord,
) {
    let mut start = 0;
    while start < len {
        let cell = cell_at(start);
        let mut end = start + 1;
        while end < len && cell_at(end) == cell {
            end += 1;
        }
        if !cell.is_empty() && end - start >= min_run {
            matched.extend((start..end).map(&coord_at));
        }
        start = end;
    }
}

/// Returns `true` if `(r, c)` is part of a horizontal or vertical run of at
/// least `min_run` equal values. Out-of-range and empty cells never are.
pub fn is_in_run(grid: &Grid, r: usize, c: usize, min_run: usize) -> bool {
    if !grid.contains(r, c) {
        return false;
    }
    let cell = grid.at(r, c);
    if cell.is_empty() {
        return false;
    }

    let left = (0..c).rev().take_while(|&cc| grid.at(r, cc) == cell).count();
    let right = (c + 1..grid.cols())
        .take_while(|&cc| grid.at(r, cc) == cell)
        .count();
    if left + right + 1 >= min_run {
        return true;
    }

    let up = (0..r).rev().take_while(|&rr| grid.at(rr, c) == cell).count();
    let down = (r + 1..grid.rows())
        .take_while(|&rr| grid.at(rr, c) == cell)
        .count();
    up + down + 1 >= min_run
}

/// Finds the 4-connected region of equal values containing `(r, c)`.
///
/// The region is returned whatever its size and value; it is empty only when
/// the seed is out of range or empty. This uses a Breadth-First Search.
pub fn flood_region(grid: &Grid, r: usize, c: usize) -> MatchSet {
    let mut region = MatchSet::new();
    if !grid.contains(r, c) {
        return region;
    }
    let target = grid.at(r, c);
    if target.is_empty() {
        return region;
    }

    let mut q = VecDeque::new();
    q.push_back((r, c));
    region.insert((r, c));

    while let Some((curr_r, curr_c)) = q.pop_front() {
        for (dr, dc) in NEIGHBOURS {
            let (Some(nr), Some(nc)) = (
                curr_r.checked_add_signed(dr),
                curr_c.checked_add_signed(dc),
            ) else {
                continue;
            };
            if grid.contains(nr, nc) && grid.at(nr, nc) == target && region.insert((nr, nc)) {
                q.push_back((nr, nc));
            }
        }
    }
    region
}

/// Computes what a smash at `(r, c)` would remove.
///
/// Returns the empty set when the seed is out of range, empty, holds a value
/// outside `smashable`, or belongs to a region smaller than `min_group`.
///
/// # Examples
/// ```
/// use tile_cascade::matcher::{connected_group, SmashableSet};
/// use tile_cascade::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["115", "015", "001"], 10).unwrap();
/// let smashable = SmashableSet::from([0, 1]);
/// assert_eq!(connected_group(&grid, 0, 0, &smashable, 2).len(), 3);
/// assert_eq!(connected_group(&grid, 1, 0, &smashable, 2).len(), 3);
/// assert!(connected_group(&grid, 0, 2, &smashable, 2).is_empty()); // 5 is not smashable
/// assert!(connected_group(&grid, 2, 2, &smashable, 2).is_empty()); // lone 1
/// ```
pub fn connected_group(
    grid: &Grid,
    r: usize,
    c: usize,
    smashable: &SmashableSet,
    min_group: usize,
) -> MatchSet {
    let Ok(Cell::Value(value)) = grid.get(r, c) else {
        return MatchSet::new();
    };
    if !smashable.contains(&value) {
        return MatchSet::new();
    }
    let region = flood_region(grid, r, c);
    if region.len() >= min_group {
        region
    } else {
        MatchSet::new()
    }
}

/// Finds every distinct smashable group on the grid.
///
/// Each group has at least `min_group` cells. Groups are returned in the
/// row-major order of their first cell, so the result is canonical for a
/// given grid.
pub fn find_all_groups(grid: &Grid, smashable: &SmashableSet, min_group: usize) -> Vec<MatchSet> {
    let mut all_groups = Vec::new();
    let mut seen = MatchSet::new();

    for (r, c) in grid.coords() {
        if seen.contains(&(r, c)) {
            continue;
        }
        match grid.at(r, c) {
            Cell::Value(v) if smashable.contains(&v) => {
                let region = flood_region(grid, r, c);
                seen.extend(region.iter().copied());
                if region.len() >= min_group {
                    all_groups.push(region);
                }
            }
            _ => {
                seen.insert((r, c));
            }
        }
    }
    all_groups
}

/// Lists every adjacent swap that would create a run through one of the two
/// swapped cells. Pairs are `(upper-left, lower-right)` in row-major order.
pub fn find_scoring_swaps(grid: &Grid, min_run: usize) -> Vec<(Coord, Coord)> {
    let mut scratch = grid.clone();
    let mut swaps = Vec::new();
    for (r, c) in grid.coords() {
        for (nr, nc) in [(r, c + 1), (r + 1, c)] {
            if !grid.contains(nr, nc) {
                continue;
            }
            let (a, b) = (grid.at(r, c), grid.at(nr, nc));
            if a.is_empty() || b.is_empty() || a == b {
                continue;
            }
            scratch.put(r, c, b);
            scratch.put(nr, nc, a);
            if is_in_run(&scratch, r, c, min_run) || is_in_run(&scratch, nr, nc, min_run) {
                swaps.push(((r, c), (nr, nc)));
            }
            scratch.put(r, c, a);
            scratch.put(nr, nc, b);
        }
    }
    swaps
}
