use crate::error::EngineError;
use crate::grid::{Grid, Layout, PieceKind, Position};

/// Parses an array of string slices into a `Grid`.
///
/// Each string slice is one board row, listed from the TOP of the board down,
/// so the last slice is row `y = 0`. Every row must have the same length,
/// which becomes the board width.
///
/// Valid characters are:
/// - a kind letter (`R`, `G`, `B`, `Y`, `P`, `O`): a usable cell holding that piece
/// - `.`: a usable, empty cell
/// - `#`: an unusable cell
///
/// # Returns
/// * `Ok(Grid)` if parsing is successful.
/// * `Err(EngineError)` if the input is empty, the rows are ragged, or an
///   unrecognized character is encountered.
///
/// # Examples
/// ```
/// use match3_engine::grid::{PieceKind, Position};
/// use match3_engine::utils::grid_from_str_array;
///
/// let grid = grid_from_str_array(&[
///     "RG.",
///     "#BY",
/// ]).unwrap();
/// assert_eq!(grid.kind_at(Position::new(0, 1)), Some(PieceKind::Red));
/// assert_eq!(grid.kind_at(Position::new(2, 1)), None);
/// assert!(!grid.is_usable(Position::new(0, 0)));
///
/// assert!(grid_from_str_array(&["RXB"]).is_err());
/// ```
pub fn grid_from_str_array(rows: &[&str]) -> Result<Grid, EngineError> {
    let layout = layout_from_str_array(rows)?;
    let mut grid = Grid::new(&layout);
    let height = layout.height();

    for (r, row_str) in rows.iter().enumerate() {
        let y = height - 1 - r;
        for (x, ch) in row_str.chars().enumerate() {
            match ch {
                '#' | '.' => {}
                _ => match PieceKind::from_char(ch) {
                    Some(kind) => {
                        grid.spawn(kind, Position::new(x, y));
                    }
                    None => return Err(EngineError::UnknownCharacter { ch, x, y }),
                },
            }
        }
    }
    Ok(grid)
}

/// Parses only the usable mask from text rows, top row first.
///
/// `#` marks an unusable cell; every other character is usable. Rows must be
/// non-empty and of equal length.
pub fn layout_from_str_array(rows: &[&str]) -> Result<Layout, EngineError> {
    let height = rows.len();
    let width = rows.first().map_or(0, |row| row.chars().count());
    if height == 0 || width == 0 {
        return Err(EngineError::EmptyBoard);
    }

    let mut blocked = Vec::new();
    for (r, row_str) in rows.iter().enumerate() {
        let found = row_str.chars().count();
        if found != width {
            return Err(EngineError::RaggedRow {
                row: r,
                expected: width,
                found,
            });
        }
        let y = height - 1 - r;
        for (x, ch) in row_str.chars().enumerate() {
            if ch == '#' {
                blocked.push(Position::new(x, y));
            }
        }
    }
    Layout::with_blocked(width, height, &blocked)
}
