use crate::grid::{Cell, Grid};

/// Error returned when a textual grid cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseGridError {
    /// No rows, or only empty rows, were supplied.
    #[display("grid text contains no cells")]
    NoCells,
    /// A character outside `0-9`, `a-z` and `.` was found.
    #[display("unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar {
        /// Offending character.
        ch: char,
        /// Row of the character.
        row: usize,
        /// Column of the character.
        col: usize,
    },
    /// A value is valid text but lies outside the alphabet.
    #[display("value {value} in row {row} col {col} is outside the alphabet 0..{alphabet_size}")]
    ValueOutOfRange {
        /// Parsed value.
        value: u8,
        /// Row of the value.
        row: usize,
        /// Column of the value.
        col: usize,
        /// Alphabet the grid was parsed for.
        alphabet_size: u8,
    },
    /// The alphabet itself is unusable.
    #[display("unsupported alphabet size {alphabet_size}")]
    BadAlphabet {
        /// Requested alphabet size.
        alphabet_size: u8,
    },
}

/// Parses an array of string slices into a `Grid`.
///
/// Each string slice is one row, starting from row 0 at the top. The grid is
/// as tall as the number of rows and as wide as the longest row; shorter rows
/// are padded with `Cell::Empty` on the right.
///
/// Valid characters are `0-9` and `a-z` (values 10 to 35) for values and `.`
/// for an empty cell. Every value must be below `alphabet_size`.
///
/// # Examples
/// ```
/// use tile_cascade::grid::Cell;
/// use tile_cascade::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&["012", "3."], 6).unwrap();
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.cols(), 3);
/// assert_eq!(grid.get(0, 2).unwrap(), Cell::Value(2));
/// assert_eq!(grid.get(1, 1).unwrap(), Cell::Empty);
/// assert_eq!(grid.get(1, 2).unwrap(), Cell::Empty); // padding
///
/// assert!(grid_from_str_array(&["0x1"], 6).is_err());
/// assert!(grid_from_str_array(&["06"], 6).is_err());
/// ```
pub fn grid_from_str_array(s: &[&str], alphabet_size: u8) -> Result<Grid, ParseGridError> {
    let rows = s.len();
    let cols = s.iter().map(|row| row.chars().count()).max().unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(ParseGridError::NoCells);
    }

    let mut cells = vec![Cell::Empty; rows * cols];
    for (r, row_str) in s.iter().enumerate() {
        for (c, ch) in row_str.chars().enumerate() {
            let cell = Cell::from_char(ch).ok_or(ParseGridError::UnrecognizedChar {
                ch,
                row: r,
                col: c,
            })?;
            if let Cell::Value(value) = cell {
                if value >= alphabet_size {
                    return Err(ParseGridError::ValueOutOfRange {
                        value,
                        row: r,
                        col: c,
                        alphabet_size,
                    });
                }
            }
            cells[r * cols + c] = cell;
        }
    }
    Grid::from_cells(rows, cols, alphabet_size, cells)
        .map_err(|_| ParseGridError::BadAlphabet { alphabet_size })
}

/// Parses a multi-line grid, ignoring surrounding whitespace and blank lines.
pub fn grid_from_text(text: &str, alphabet_size: u8) -> Result<Grid, ParseGridError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    grid_from_str_array(&lines, alphabet_size)
}

/// Renders a grid as plain text rows, the inverse of [`grid_from_str_array`].
pub fn grid_to_rows(grid: &Grid) -> Vec<String> {
    (0..grid.rows())
        .map(|r| {
            (0..grid.cols())
                .map(|c| grid.at(r, c).to_char())
                .collect::<String>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_from_str_array_valid() {
        let board_str = ["0123450123", "..........", "5432105432"];
        let grid = grid_from_str_array(&board_str, 6).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.get(0, 0).unwrap(), Cell::Value(0));
        assert_eq!(grid.get(1, 0).unwrap(), Cell::Empty);
        assert_eq!(grid.get(2, 9).unwrap(), Cell::Value(2));
    }

    #[test]
    fn test_grid_from_str_array_invalid_char() {
        let result = grid_from_str_array(&["0123X"], 6);
        assert_eq!(
            result.unwrap_err(),
            ParseGridError::UnrecognizedChar {
                ch: 'X',
                row: 0,
                col: 4
            }
        );
    }

    #[test]
    fn test_grid_from_str_array_with_spaces() {
        let err = grid_from_str_array(&["0 1"], 6).unwrap_err();
        assert!(err.to_string().contains("unrecognized character ' '"));
    }

    #[test]
    fn test_grid_from_str_array_value_out_of_range() {
        let err = grid_from_str_array(&["01", "9."], 6).unwrap_err();
        assert_eq!(
            err,
            ParseGridError::ValueOutOfRange {
                value: 9,
                row: 1,
                col: 0,
                alphabet_size: 6
            }
        );
        assert!(grid_from_str_array(&["a"], 11).is_ok());
    }

    #[test]
    fn test_grid_from_str_array_empty_input() {
        let board_str: [&str; 0] = [];
        assert_eq!(
            grid_from_str_array(&board_str, 6).unwrap_err(),
            ParseGridError::NoCells
        );
        assert_eq!(
            grid_from_str_array(&["", ""], 6).unwrap_err(),
            ParseGridError::NoCells
        );
    }

    #[test]
    fn test_grid_from_str_array_bad_alphabet() {
        assert_eq!(
            grid_from_str_array(&["0"], 1).unwrap_err(),
            ParseGridError::BadAlphabet { alphabet_size: 1 }
        );
    }

    #[test]
    fn test_grid_from_text_skips_blank_lines() {
        let grid = grid_from_text("\n  012 \n\n 345\n", 6).unwrap();
        assert_eq!(grid_to_rows(&grid), vec!["012", "345"]);
    }

    #[test]
    fn test_grid_to_rows_pads_with_dots() {
        let grid = grid_from_str_array(&["01", "2"], 6).unwrap();
        assert_eq!(grid_to_rows(&grid), vec!["01", "2."]);
    }
}
