//! Grid storage and the raw mutation primitives.
//!
//! This module defines:
//! - `Cell`: an empty slot or a value from the type alphabet `0..K`.
//! - `Grid`: a fixed-size row-major board with bounds-checked access, swapping,
//!   gravity (`collapse_column` with refill, `compact_column` without), column
//!   drops and the clean initial population used by run-matching games.
use crate::error::EngineError;
use crate::matcher;
use crate::source::ValueSource;
use log::{error, trace};
use std::fmt;

/// A `(row, column)` position. Row 0 is the top of the grid.
pub type Coord = (usize, usize);

/// Largest supported alphabet. Values render as `0-9` then `a-z`.
pub const MAX_ALPHABET_SIZE: u8 = 36;

/// Upper bound on clean-up sweeps performed by [`Grid::initialize`].
pub const MAX_REROLL_PASSES: usize = 1024;

// Attempts spent on a single cell within one sweep before moving on.
const REROLL_ATTEMPTS_PER_CELL: usize = 64;

/// The content of one grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    /// No value; left behind by a removal until gravity or refill fills it.
    #[default]
    Empty,
    /// A value from the type alphabet.
    Value(u8),
}

impl Cell {
    /// Returns the value, or `None` for an empty cell.
    pub fn value(self) -> Option<u8> {
        match self {
            Cell::Empty => None,
            Cell::Value(v) => Some(v),
        }
    }

    /// Returns `true` if the cell holds no value.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Converts the cell to its character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_cascade::grid::Cell;
    /// assert_eq!(Cell::Value(7).to_char(), '7');
    /// assert_eq!(Cell::Value(12).to_char(), 'c');
    /// assert_eq!(Cell::Empty.to_char(), '.');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Value(v) => char::from_digit(u32::from(v), 36).unwrap_or('?'),
        }
    }

    /// Parses the representation produced by [`Cell::to_char`].
    pub fn from_char(ch: char) -> Option<Cell> {
        if ch == '.' {
            return Some(Cell::Empty);
        }
        ch.to_digit(36).map(|d| Cell::Value(d as u8))
    }

    /// ANSI background colour used for terminal output.
    fn to_ansi_color_code(self) -> &'static str {
        const PALETTE: [&str; 6] = ["41", "42", "43", "44", "45", "46"];
        match self {
            Cell::Empty => "40",
            Cell::Value(v) => PALETTE[usize::from(v) % PALETTE.len()],
        }
    }
}

/// A fixed-size grid of cells.
///
/// Dimensions and alphabet are set at construction and never change. All
/// public accessors validate coordinates and report
/// [`EngineError::InvalidCoordinate`] instead of panicking.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
    alphabet_size: u8,
    cells: Vec<Cell>,
}

/// Checks grid dimensions and alphabet size.
pub(crate) fn validate_shape(
    rows: usize,
    cols: usize,
    alphabet_size: u8,
) -> Result<(), EngineError> {
    if rows == 0 || cols == 0 {
        return Err(EngineError::invalid_config(format!(
            "grid must have at least one row and column, got {rows}x{cols}"
        )));
    }
    if !(2..=MAX_ALPHABET_SIZE).contains(&alphabet_size) {
        return Err(EngineError::invalid_config(format!(
            "alphabet size must be between 2 and {MAX_ALPHABET_SIZE}, got {alphabet_size}"
        )));
    }
    Ok(())
}

impl Grid {
    /// Creates a grid with every cell empty.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] for a zero dimension or an alphabet
    /// outside `2..=36`.
    pub fn new_empty(rows: usize, cols: usize, alphabet_size: u8) -> Result<Self, EngineError> {
        validate_shape(rows, cols, alphabet_size)?;
        Ok(Grid {
            rows,
            cols,
            alphabet_size,
            cells: vec![Cell::Empty; rows * cols],
        })
    }

    /// Creates a grid from row-major cells.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] when `cells.len() != rows * cols` and
    /// [`EngineError::InvalidValue`] when a value lies outside the alphabet.
    pub fn from_cells(
        rows: usize,
        cols: usize,
        alphabet_size: u8,
        cells: Vec<Cell>,
    ) -> Result<Self, EngineError> {
        validate_shape(rows, cols, alphabet_size)?;
        if cells.len() != rows * cols {
            return Err(EngineError::invalid_config(format!(
                "expected {} cells for a {rows}x{cols} grid, got {}",
                rows * cols,
                cells.len()
            )));
        }
        if let Some(value) = cells
            .iter()
            .filter_map(|cell| cell.value())
            .find(|&v| v >= alphabet_size)
        {
            return Err(EngineError::InvalidValue {
                value,
                alphabet_size,
            });
        }
        Ok(Grid {
            rows,
            cols,
            alphabet_size,
            cells,
        })
    }

    /// Builds a grid with no run of `min_run` or more equal values.
    ///
    /// Every cell is drawn from `source`, then cells taking part in a run are
    /// re-rolled until the whole grid is clean. A re-rolled cell only draws
    /// from values that cannot complete a run with its left and upper
    /// neighbours, so one sweep is enough whenever such a value exists. That
    /// covers every alphabet of three or more, and two values with runs of two
    /// (the result is a checkerboard).
    ///
    /// # Arguments
    /// * `rows`, `cols`: Grid dimensions.
    /// * `alphabet_size`: Number of values `K`; cells hold `0..K`.
    /// * `min_run`: Shortest run that must not appear.
    /// * `source`: Where every value comes from.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] for a bad shape, and
    /// [`EngineError::InternalInvariantViolation`] if the grid is still not clean
    /// after [`MAX_REROLL_PASSES`] sweeps.
    ///
    /// # Examples
    /// ```
    /// use tile_cascade::grid::Grid;
    /// use tile_cascade::matcher::find_runs;
    /// use tile_cascade::source::RandomSource;
    ///
    /// let mut source = RandomSource::seeded(7);
    /// let grid = Grid::initialize(8, 8, 6, 3, &mut source).unwrap();
    /// assert!(find_runs(&grid, 3).is_empty());
    /// assert_eq!(grid.count_filled(), 64);
    /// ```
    pub fn initialize<S: ValueSource + ?Sized>(
        rows: usize,
        cols: usize,
        alphabet_size: u8,
        min_run: usize,
        source: &mut S,
    ) -> Result<Self, EngineError> {
        let mut grid = Grid::new_empty(rows, cols, alphabet_size)?;
        grid.populate(source);
        grid.reroll_runs(min_run, source)?;
        Ok(grid)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Size `K` of the type alphabet; values are `0..K`.
    pub fn alphabet_size(&self) -> u8 {
        self.alphabet_size
    }

    /// Returns `true` if `(r, c)` lies inside the grid.
    pub fn contains(&self, r: usize, c: usize) -> bool {
        r < self.rows && c < self.cols
    }

    fn index(&self, r: usize, c: usize) -> Result<usize, EngineError> {
        if self.contains(r, c) {
            Ok(r * self.cols + c)
        } else {
            Err(EngineError::InvalidCoordinate {
                row: r,
                col: c,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub(crate) fn check_column(&self, c: usize) -> Result<(), EngineError> {
        self.index(0, c).map(|_| ())
    }

    /// Returns the cell at `(r, c)`.
    ///
    /// # Arguments
    /// * `r`: The row index (0-based, top row first).
    /// * `c`: The column index (0-based).
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`] when out of range.
    pub fn get(&self, r: usize, c: usize) -> Result<Cell, EngineError> {
        self.index(r, c).map(|i| self.cells[i])
    }

    /// Unchecked read for scans that iterate within bounds.
    pub(crate) fn at(&self, r: usize, c: usize) -> Cell {
        self.cells[r * self.cols + c]
    }

    pub(crate) fn put(&mut self, r: usize, c: usize, cell: Cell) {
        self.cells[r * self.cols + c] = cell;
    }

    /// Overwrites the cell at `(r, c)` with `value`.
    ///
    /// # Arguments
    /// * `r`: The row index (0-based).
    /// * `c`: The column index (0-based).
    /// * `value`: The new value; must be below the alphabet size.
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`] or [`EngineError::InvalidValue`]; the
    /// grid is unchanged in both cases.
    pub fn set(&mut self, r: usize, c: usize, value: u8) -> Result<(), EngineError> {
        let i = self.index(r, c)?;
        if value >= self.alphabet_size {
            return Err(EngineError::InvalidValue {
                value,
                alphabet_size: self.alphabet_size,
            });
        }
        self.cells[i] = Cell::Value(value);
        Ok(())
    }

    /// Empties the cell at `(r, c)`. Nothing above it falls; gravity only runs
    /// through [`Grid::collapse_column`] or [`Grid::compact_column`].
    ///
    /// # Arguments
    /// * `r`: The row index (0-based).
    /// * `c`: The column index (0-based).
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`] when out of range.
    pub fn clear(&mut self, r: usize, c: usize) -> Result<(), EngineError> {
        let i = self.index(r, c)?;
        self.cells[i] = Cell::Empty;
        Ok(())
    }

    /// Exchanges two cells. Adjacency is the caller's business.
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`] if either position is out of range; the
    /// grid is not modified.
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<(), EngineError> {
        let i = self.index(a.0, a.1)?;
        let j = self.index(b.0, b.1)?;
        self.cells.swap(i, j);
        Ok(())
    }

    /// Assigns a fresh value from `source` to `(r, c)`.
    ///
    /// # Arguments
    /// * `r`: The row index (0-based).
    /// * `c`: The column index (0-based).
    /// * `source`: Supplies the value.
    ///
    /// # Returns
    /// The value now stored in the cell.
    ///
    /// # Errors
    /// [`EngineError::InvalidCoordinate`] when out of range; nothing is drawn
    /// from `source` in that case.
    pub fn fill_random<S: ValueSource + ?Sized>(
        &mut self,
        r: usize,
        c: usize,
        source: &mut S,
    ) -> Result<u8, EngineError> {
        let i = self.index(r, c)?;
        let value = source.next_value(self.alphabet_size);
        self.cells[i] = Cell::Value(value);
        Ok(value)
    }

    /// Fills every cell, empty or not, from `source`.
    pub fn populate<S: ValueSource + ?Sized>(&mut self, source: &mut S) {
        let alphabet_size = self.alphabet_size;
        for cell in &mut self.cells {
            *cell = Cell::Value(source.next_value(alphabet_size));
        }
    }

    // True if `value` at `(r, c)` would end a run of `min_run` together with
    // the cells to its left or above it.
    fn completes_settled_run(&self, r: usize, c: usize, value: u8, min_run: usize) -> bool {
        let cell = Cell::Value(value);
        let need = min_run.saturating_sub(1);
        let left = (0..c).rev().take_while(|&cc| self.at(r, cc) == cell).count();
        let up = (0..r).rev().take_while(|&rr| self.at(rr, c) == cell).count();
        left >= need || up >= need
    }

    fn reroll_runs<S: ValueSource + ?Sized>(
        &mut self,
        min_run: usize,
        source: &mut S,
    ) -> Result<(), EngineError> {
        for pass in 0..MAX_REROLL_PASSES {
            if matcher::find_runs(self, min_run).is_empty() {
                trace!("grid clean after {pass} re-roll passes");
                return Ok(());
            }
            // Sweep in row-major order. A cell in a run takes a value that
            // cannot complete a run with the cells already swept; later cells
            // see it as settled.
            for r in 0..self.rows {
                for c in 0..self.cols {
                    if !matcher::is_in_run(self, r, c, min_run) {
                        continue;
                    }
                    let allowed: Vec<u8> = (0..self.alphabet_size)
                        .filter(|&v| !self.completes_settled_run(r, c, v, min_run))
                        .collect();
                    if !allowed.is_empty() {
                        let value = allowed[source.next_index(allowed.len())];
                        self.put(r, c, Cell::Value(value));
                        continue;
                    }
                    // Every value closes a run to the left or above (two values,
                    // runs of three or more). Draw freely and let the next pass
                    // revisit the neighbours.
                    let mut attempts = 0;
                    while attempts < REROLL_ATTEMPTS_PER_CELL
                        && matcher::is_in_run(self, r, c, min_run)
                    {
                        let value = source.next_value(self.alphabet_size);
                        self.put(r, c, Cell::Value(value));
                        attempts += 1;
                    }
                }
            }
        }
        if matcher::find_runs(self, min_run).is_empty() {
            return Ok(());
        }
        error!("initial population still has runs after {MAX_REROLL_PASSES} passes");
        Err(EngineError::InternalInvariantViolation {
            steps: MAX_REROLL_PASSES,
        })
    }

    /// Applies gravity to column `c` and refills the vacated top cells.
    ///
    /// Non-empty cells slide down preserving their relative order; the cells
    /// left empty at the top receive fresh values from `source`. A column with
    /// no empty cells is left untouched.
    ///
    /// # Returns
    /// The number of refilled cells.
    ///
    /// # Examples
    /// ```
    /// use tile_cascade::grid::{Cell, Grid};
    /// use tile_cascade::source::SequenceSource;
    ///
    /// let cells = vec![Cell::Value(1), Cell::Empty, Cell::Value(2), Cell::Empty, Cell::Empty];
    /// let mut grid = Grid::from_cells(5, 1, 6, cells).unwrap();
    /// let refilled = grid.collapse_column(0, &mut SequenceSource::new(vec![5])).unwrap();
    /// assert_eq!(refilled, 3);
    /// assert_eq!(grid.get(3, 0).unwrap(), Cell::Value(1));
    /// assert_eq!(grid.get(4, 0).unwrap(), Cell::Value(2));
    /// assert_eq!(grid.get(0, 0).unwrap(), Cell::Value(5));
    /// ```
    pub fn collapse_column<S: ValueSource + ?Sized>(
        &mut self,
        c: usize,
        source: &mut S,
    ) -> Result<usize, EngineError> {
        let vacated = self.compact_column(c)?;
        for r in 0..vacated {
            let value = source.next_value(self.alphabet_size);
            self.put(r, c, Cell::Value(value));
        }
        Ok(vacated)
    }

    /// Applies gravity to column `c` without refilling.
    ///
    /// # Returns
    /// The number of empty cells left at the top of the column.
    pub fn compact_column(&mut self, c: usize) -> Result<usize, EngineError> {
        self.check_column(c)?;
        let mut empty_slot = self.rows; // one past the next slot to fill, counting from the bottom
        for r in (0..self.rows).rev() {
            let cell = self.at(r, c);
            if !cell.is_empty() {
                empty_slot -= 1;
                if r != empty_slot {
                    self.put(empty_slot, c, cell);
                    self.put(r, c, Cell::Empty);
                }
            }
        }
        Ok(empty_slot)
    }

    /// Drops `value` into column `c`, landing on top of whatever is stacked there.
    ///
    /// # Returns
    /// The row where the value came to rest.
    ///
    /// # Errors
    /// [`EngineError::ColumnFull`] when the top cell of the column is occupied.
    pub fn drop_into_column(&mut self, c: usize, value: u8) -> Result<usize, EngineError> {
        self.check_column(c)?;
        if value >= self.alphabet_size {
            return Err(EngineError::InvalidValue {
                value,
                alphabet_size: self.alphabet_size,
            });
        }
        if !self.at(0, c).is_empty() {
            return Err(EngineError::ColumnFull { col: c });
        }
        let landing = (0..self.rows)
            .take_while(|&r| self.at(r, c).is_empty())
            .last()
            .unwrap_or(0);
        self.put(landing, c, Cell::Value(value));
        Ok(landing)
    }

    /// Number of non-empty cells.
    pub fn count_filled(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    /// Returns a copy of column `c`, top to bottom.
    pub fn column(&self, c: usize) -> Result<Vec<Cell>, EngineError> {
        self.check_column(c)?;
        Ok((0..self.rows).map(|r| self.at(r, c)).collect())
    }

    /// Formats the grid for a terminal, optionally marking one position.
    ///
    /// Row and column numbers are printed along the edges and each cell gets
    /// an ANSI background colour keyed to its value.
    pub fn to_string_with_highlight(&self, pos: Option<Coord>) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for c_idx in 0..self.cols {
            output.push_str(&format!("{:<2}", c_idx));
        }
        output.push('\n');

        for r_idx in 0..self.rows {
            output.push_str(&format!("{:<2}", r_idx));
            for c_idx in 0..self.cols {
                let cell = self.at(r_idx, c_idx);
                let marker = if pos == Some((r_idx, c_idx)) { '*' } else { ' ' };
                output.push_str(&format!(
                    "\x1b[1;{}m{}{}\x1b[m",
                    cell.to_ansi_color_code(),
                    cell.to_char(),
                    marker
                ));
            }
            if r_idx + 1 < self.rows {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{RandomSource, SequenceSource};
    use crate::utils::grid_from_str_array;

    #[test]
    fn test_new_empty_grid() {
        let grid = Grid::new_empty(4, 5, 6).unwrap();
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.count_filled(), 0);
        assert!(grid.coords().all(|(r, c)| grid.get(r, c).unwrap() == Cell::Empty));
    }

    #[test]
    fn test_new_empty_rejects_bad_shape() {
        assert!(Grid::new_empty(0, 5, 6).unwrap_err().is_invalid_config());
        assert!(Grid::new_empty(5, 0, 6).unwrap_err().is_invalid_config());
        assert!(Grid::new_empty(5, 5, 1).unwrap_err().is_invalid_config());
        assert!(Grid::new_empty(5, 5, MAX_ALPHABET_SIZE + 1)
            .unwrap_err()
            .is_invalid_config());
    }

    #[test]
    fn test_from_cells_validation() {
        let err = Grid::from_cells(2, 2, 6, vec![Cell::Empty; 3]).unwrap_err();
        assert!(err.is_invalid_config());

        let err = Grid::from_cells(1, 2, 6, vec![Cell::Value(0), Cell::Value(6)]).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidValue {
                value: 6,
                alphabet_size: 6
            }
        );
    }

    #[test]
    fn test_cell_char_round_trip() {
        for v in 0..MAX_ALPHABET_SIZE {
            let cell = Cell::Value(v);
            assert_eq!(Cell::from_char(cell.to_char()), Some(cell));
        }
        assert_eq!(Cell::from_char('.'), Some(Cell::Empty));
        assert_eq!(Cell::from_char('#'), None);
    }

    #[test]
    fn test_get_out_of_bounds_is_an_error() {
        let grid = Grid::new_empty(3, 3, 6).unwrap();
        assert_eq!(
            grid.get(3, 0),
            Err(EngineError::InvalidCoordinate {
                row: 3,
                col: 0,
                rows: 3,
                cols: 3
            })
        );
        assert!(grid.get(0, 3).unwrap_err().is_invalid_coordinate());
    }

    #[test]
    fn test_set_and_clear() {
        let mut grid = Grid::new_empty(3, 3, 6).unwrap();
        grid.set(1, 2, 5).unwrap();
        assert_eq!(grid.get(1, 2).unwrap(), Cell::Value(5));

        assert!(grid.set(1, 2, 6).unwrap_err().is_invalid_value());
        assert_eq!(grid.get(1, 2).unwrap(), Cell::Value(5));

        assert!(grid.set(3, 3, 1).unwrap_err().is_invalid_coordinate());

        grid.clear(1, 2).unwrap();
        assert_eq!(grid.get(1, 2).unwrap(), Cell::Empty);
    }

    #[test]
    fn test_swap_in_bounds_and_out_of_bounds() {
        let mut grid = grid_from_str_array(&["01", "23"], 6).unwrap();
        grid.swap((0, 0), (1, 1)).unwrap();
        assert_eq!(grid.get(0, 0).unwrap(), Cell::Value(3));
        assert_eq!(grid.get(1, 1).unwrap(), Cell::Value(0));

        let before = grid.clone();
        assert!(grid.swap((0, 0), (2, 0)).unwrap_err().is_invalid_coordinate());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_collapse_column_preserves_order_and_refills() {
        // Column top to bottom: A . B . .
        let mut grid = grid_from_str_array(&["1", ".", "4", ".", "."], 6).unwrap();
        let mut source = SequenceSource::new(vec![0, 2, 5]);
        let refilled = grid.collapse_column(0, &mut source).unwrap();

        assert_eq!(refilled, 3);
        assert_eq!(
            grid.column(0).unwrap(),
            vec![
                Cell::Value(0),
                Cell::Value(2),
                Cell::Value(5),
                Cell::Value(1),
                Cell::Value(4)
            ]
        );
        assert_eq!(source.consumed(), 3);
    }

    #[test]
    fn test_collapse_full_column_is_noop() {
        let mut grid = grid_from_str_array(&["12", "34", "50"], 6).unwrap();
        let before = grid.clone();
        let mut source = SequenceSource::new(vec![1]);
        assert_eq!(grid.collapse_column(0, &mut source).unwrap(), 0);
        assert_eq!(grid.collapse_column(1, &mut source).unwrap(), 0);
        assert_eq!(grid, before);
        assert_eq!(source.consumed(), 0);
    }

    #[test]
    fn test_collapse_column_out_of_bounds() {
        let mut grid = Grid::new_empty(2, 2, 6).unwrap();
        let mut source = SequenceSource::new(vec![1]);
        assert!(grid
            .collapse_column(2, &mut source)
            .unwrap_err()
            .is_invalid_coordinate());
    }

    #[test]
    fn test_compact_column_leaves_gaps_empty() {
        let mut grid = grid_from_str_array(&["3.", "..", "1.", "2."], 6).unwrap();
        assert_eq!(grid.compact_column(0).unwrap(), 1);
        assert_eq!(
            grid.column(0).unwrap(),
            vec![Cell::Empty, Cell::Value(3), Cell::Value(1), Cell::Value(2)]
        );
        assert_eq!(grid.compact_column(1).unwrap(), 4);
    }

    #[test]
    fn test_drop_into_column() {
        let mut grid = grid_from_str_array(&["..", "..", ".4"], 6).unwrap();
        assert_eq!(grid.drop_into_column(0, 1).unwrap(), 2);
        assert_eq!(grid.drop_into_column(0, 2).unwrap(), 1);
        assert_eq!(grid.drop_into_column(1, 3).unwrap(), 1);
        assert_eq!(grid.drop_into_column(0, 5).unwrap(), 0);
        assert_eq!(
            grid.drop_into_column(0, 5),
            Err(EngineError::ColumnFull { col: 0 })
        );
        assert!(grid.drop_into_column(1, 9).unwrap_err().is_invalid_value());
        assert!(grid.drop_into_column(2, 0).unwrap_err().is_invalid_coordinate());
    }

    #[test]
    fn test_initialize_has_no_runs() {
        for seed in 0..20 {
            let mut source = RandomSource::seeded(seed);
            let grid = Grid::initialize(8, 8, 6, 3, &mut source).unwrap();
            assert_eq!(grid.count_filled(), 64);
            assert!(
                matcher::find_runs(&grid, 3).is_empty(),
                "seed {seed} produced a run:\n{grid}"
            );
        }
    }

    #[test]
    fn test_initialize_with_two_values() {
        for seed in 0..10 {
            let mut source = RandomSource::seeded(seed);
            let grid = Grid::initialize(6, 6, 2, 3, &mut source).unwrap();
            assert!(matcher::find_runs(&grid, 3).is_empty());
        }
    }

    #[test]
    fn test_initialize_is_deterministic_per_seed() {
        let a = Grid::initialize(8, 8, 6, 3, &mut RandomSource::seeded(123)).unwrap();
        let b = Grid::initialize(8, 8, 6, 3, &mut RandomSource::seeded(123)).unwrap();
        let c = Grid::initialize(8, 8, 6, 3, &mut RandomSource::seeded(124)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_initialize_two_values_runs_of_two_is_checkerboard() {
        for seed in 0..50 {
            let mut source = RandomSource::seeded(seed);
            let grid = Grid::initialize(8, 8, 2, 2, &mut source).unwrap();
            assert!(matcher::find_runs(&grid, 2).is_empty(), "seed {seed}:\n{grid}");
            let corner = grid.get(0, 0).unwrap();
            for (r, c) in grid.coords() {
                assert_eq!(grid.get(r, c).unwrap() == corner, (r + c) % 2 == 0);
            }
        }
    }

    #[test]
    fn test_initialize_with_stuck_source_still_cleans() {
        // Unconstrained draws would repeat 0 forever; the constrained pick
        // steps around it.
        let mut source = SequenceSource::new(vec![0]);
        let grid = Grid::initialize(3, 3, 2, 3, &mut source).unwrap();
        assert!(matcher::find_runs(&grid, 3).is_empty());
        assert_eq!(grid.count_filled(), 9);
    }

    #[test]
    fn test_initialize_gives_up_on_impossible_grid() {
        // A run of one is every single cell.
        let mut source = SequenceSource::new(vec![0]);
        let err = Grid::initialize(1, 1, 2, 1, &mut source).unwrap_err();
        assert!(err.is_internal_invariant_violation());
    }

    #[test]
    fn test_display_grid_formatting() {
        let grid = grid_from_str_array(&["012", "3.5"], 6).unwrap();
        let display_str = format!("{}", grid);

        assert!(display_str.starts_with("  0 1 2 \n"));
        assert_eq!(display_str.lines().count(), 3);
        assert!(display_str.contains("\x1b[1;40m. \x1b[m"));

        let highlighted = grid.to_string_with_highlight(Some((1, 2)));
        assert!(highlighted.contains("5*"));
    }
}
