//! Grid model for the tile-swap board.
//!
//! This module defines the board's fundamental components:
//! - `PieceKind`: the finite set of piece categories.
//! - `Position` and `Direction`: cell coordinates and unit steps between them.
//! - `Piece` and `PieceId`: pieces live in an arena owned by the grid and are
//!   referenced from cells by handle.
//! - `Layout`: the static usable/unusable mask a board is built from.
//! - `Grid`: the width×height array of cells, each unusable or usable with an
//!   optional occupant.
//!
//! Coordinates grow rightward (`x`) and upward (`y`); row `0` is the bottom row.
use crate::error::EngineError;
use std::fmt;

/// Represents the category of a piece on the board.
///
/// Matching only ever compares kinds; a board is configured to play with the
/// first `n` entries of [`PieceKind::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl PieceKind {
    /// Every kind, in the order used when a board plays with fewer kinds.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Red,
        PieceKind::Green,
        PieceKind::Blue,
        PieceKind::Yellow,
        PieceKind::Purple,
        PieceKind::Orange,
    ];

    /// Converts the kind to its character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_engine::grid::PieceKind;
    /// assert_eq!(PieceKind::Red.to_char(), 'R');
    /// assert_eq!(PieceKind::Orange.to_char(), 'O');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            PieceKind::Red => 'R',
            PieceKind::Green => 'G',
            PieceKind::Blue => 'B',
            PieceKind::Yellow => 'Y',
            PieceKind::Purple => 'P',
            PieceKind::Orange => 'O',
        }
    }

    /// Parses the character produced by [`PieceKind::to_char`].
    pub fn from_char(ch: char) -> Option<PieceKind> {
        PieceKind::ALL.iter().copied().find(|kind| kind.to_char() == ch)
    }

    /// Returns the ANSI background color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            PieceKind::Red => "41",
            PieceKind::Green => "42",
            PieceKind::Yellow => "43",
            PieceKind::Blue => "44",
            PieceKind::Purple => "45",
            PieceKind::Orange => "46",
        }
    }
}

/// A cell coordinate on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Manhattan adjacency: the two positions differ by exactly one step.
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A unit step along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

impl Direction {
    /// Returns `(dx, dy)` for this step.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Right => (1, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }
}

/// Handle to a piece stored in a [`Grid`]'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(usize);

impl PieceId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A piece on the board.
///
/// `position` always mirrors the cell that holds the piece. `matched` is a
/// transient flag owned by the full-board match pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub position: Position,
    pub matched: bool,
}

/// A single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub usable: bool,
    pub occupant: Option<PieceId>,
}

/// The static usable mask a board is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    width: usize,
    height: usize,
    usable: Vec<bool>,
}

impl Layout {
    /// Creates a layout where every cell is usable.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Layout {
            width,
            height,
            usable: vec![true; width * height],
        })
    }

    /// Creates a layout with the given positions marked unusable.
    ///
    /// Positions outside the layout are a contract violation and panic.
    pub fn with_blocked(
        width: usize,
        height: usize,
        blocked: &[Position],
    ) -> Result<Self, EngineError> {
        let mut layout = Layout::new(width, height)?;
        for &pos in blocked {
            layout.block(pos);
        }
        Ok(layout)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Marks a position as permanently unusable.
    pub fn block(&mut self, pos: Position) {
        let idx = self.index(pos);
        self.usable[idx] = false;
    }

    pub fn is_usable(&self, pos: Position) -> bool {
        self.usable[self.index(pos)]
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.x < self.width && pos.y < self.height,
            "position {} outside {}x{} layout",
            pos,
            self.width,
            self.height
        );
        pos.y * self.width + pos.x
    }
}

/// The board: a width×height array of cells plus the arena of pieces they reference.
///
/// The grid exclusively owns its pieces. A piece is destroyed when removed and
/// its cell slot is nulled; arena slots are reused by later spawns.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    pieces: Vec<Option<Piece>>,
    free_slots: Vec<usize>,
}

impl Grid {
    /// Creates an empty grid shaped by `layout`. No cell has an occupant yet.
    pub fn new(layout: &Layout) -> Self {
        let mut cells = Vec::with_capacity(layout.width * layout.height);
        for y in 0..layout.height {
            for x in 0..layout.width {
                cells.push(Cell {
                    usable: layout.is_usable(Position::new(x, y)),
                    occupant: None,
                });
            }
        }
        Grid {
            width: layout.width,
            height: layout.height,
            cells,
            pieces: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if the signed coordinate lies on the board.
    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Returns the position one `direction` step away, or `None` at the board edge.
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = pos.x as isize + dx;
        let y = pos.y as isize + dy;
        if self.contains(x, y) {
            Some(Position::new(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Returns the cell at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` lies outside the board.
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    pub fn is_usable(&self, pos: Position) -> bool {
        self.cell(pos).usable
    }

    pub fn occupant(&self, pos: Position) -> Option<PieceId> {
        self.cell(pos).occupant
    }

    /// Returns the piece occupying `pos`, if any.
    pub fn occupant_piece(&self, pos: Position) -> Option<&Piece> {
        self.occupant(pos).map(|id| self.piece(id))
    }

    pub fn kind_at(&self, pos: Position) -> Option<PieceKind> {
        self.occupant_piece(pos).map(|piece| piece.kind)
    }

    /// Looks up a piece by handle, returning `None` for destroyed pieces.
    pub fn get_piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0).and_then(Option::as_ref)
    }

    /// Returns the piece behind `id`.
    ///
    /// # Panics
    /// Panics if the piece has been destroyed.
    pub fn piece(&self, id: PieceId) -> &Piece {
        match self.get_piece(id) {
            Some(piece) => piece,
            None => panic!("piece {:?} is not alive", id),
        }
    }

    fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        match self.pieces.get_mut(id.0).and_then(Option::as_mut) {
            Some(piece) => piece,
            None => panic!("piece {:?} is not alive", id),
        }
    }

    /// Creates a piece of `kind` and places it in the empty usable cell at `pos`.
    ///
    /// # Panics
    /// Panics if the cell is unusable or already occupied.
    pub fn spawn(&mut self, kind: PieceKind, pos: Position) -> PieceId {
        let cell = *self.cell(pos);
        assert!(cell.usable, "cannot spawn into unusable cell {}", pos);
        assert!(cell.occupant.is_none(), "cell {} is already occupied", pos);

        let piece = Piece {
            kind,
            position: pos,
            matched: false,
        };
        let id = match self.free_slots.pop() {
            Some(slot) => {
                self.pieces[slot] = Some(piece);
                PieceId(slot)
            }
            None => {
                self.pieces.push(Some(piece));
                PieceId(self.pieces.len() - 1)
            }
        };
        let idx = self.index(pos);
        self.cells[idx].occupant = Some(id);
        id
    }

    /// Sets the occupant reference of the cell at `pos`.
    ///
    /// The occupant's stored position is updated to `pos`. Nothing else is
    /// validated: callers clear the piece's previous cell and respect usability.
    pub fn set_occupant(&mut self, pos: Position, occupant: Option<PieceId>) {
        let idx = self.index(pos);
        self.cells[idx].occupant = occupant;
        if let Some(id) = occupant {
            self.piece_mut(id).position = pos;
        }
    }

    /// Moves the occupant of `from` into the empty cell `to`, leaving `from` empty.
    pub fn move_occupant(&mut self, from: Position, to: Position) -> Option<PieceId> {
        let id = self.occupant(from)?;
        debug_assert!(self.occupant(to).is_none(), "cell {} is occupied", to);
        self.set_occupant(from, None);
        self.set_occupant(to, Some(id));
        Some(id)
    }

    /// Exchanges the occupants (and their stored positions) of two cells.
    pub fn swap(&mut self, a: Position, b: Position) {
        let first = self.occupant(a);
        let second = self.occupant(b);
        self.set_occupant(a, second);
        self.set_occupant(b, first);
    }

    /// Destroys a piece and nulls the cell that held it. The cell stays usable.
    pub fn destroy(&mut self, id: PieceId) {
        let pos = self.piece(id).position;
        let idx = self.index(pos);
        if self.cells[idx].occupant == Some(id) {
            self.cells[idx].occupant = None;
        }
        self.pieces[id.0] = None;
        self.free_slots.push(id.0);
    }

    /// Destroys every piece, leaving all usable cells empty.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.occupant = None;
        }
        self.pieces.clear();
        self.free_slots.clear();
    }

    /// Clears the `matched` flag on every live piece.
    pub fn reset_matched(&mut self) {
        for piece in self.pieces.iter_mut().flatten() {
            piece.matched = false;
        }
    }

    pub fn set_matched(&mut self, id: PieceId, matched: bool) {
        self.piece_mut(id).matched = matched;
    }

    /// Number of live pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.pieces.iter().flatten().count()
    }

    /// Iterates every position in column-major order (`x` outer, `y` inner).
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Position::new(x, y)))
    }

    /// Returns the kind held by every cell, row-major from the bottom row.
    ///
    /// Useful for comparing board states without caring about piece identity.
    pub fn snapshot(&self) -> Vec<Option<PieceKind>> {
        self.cells
            .iter()
            .map(|cell| cell.occupant.map(|id| self.piece(id).kind))
            .collect()
    }

    /// Renders the board as plain text rows, top row first.
    ///
    /// `#` marks an unusable cell, `.` an empty usable cell, and a kind letter
    /// an occupied cell. The output parses back with
    /// [`crate::utils::grid_from_str_array`].
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let cell = self.cell(Position::new(x, y));
                        if !cell.usable {
                            '#'
                        } else {
                            cell.occupant
                                .map_or('.', |id| self.piece(id).kind.to_char())
                        }
                    })
                    .collect::<String>()
            })
            .collect()
    }

    /// Generates a terminal rendering of the board with an optional highlighted position.
    ///
    /// Column numbers run along the top and row numbers down the left side,
    /// top row first. Pieces are drawn with ANSI background colors; the
    /// highlighted piece shows `..` instead of blank space.
    pub fn to_string_with_highlight(&self, pos: Option<Position>) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for x in 0..self.width {
            output.push_str(&format!("{:<2}", x));
        }
        output.push('\n');

        for y in (0..self.height).rev() {
            output.push_str(&format!("{:<2}", y));
            for x in 0..self.width {
                let here = Position::new(x, y);
                let cell = self.cell(here);
                if !cell.usable {
                    output.push_str("##");
                    continue;
                }
                let color_code = cell
                    .occupant
                    .map_or("40", |id| self.piece(id).kind.to_ansi_color_code());
                let content = if pos == Some(here) { ".." } else { "  " };
                output.push_str(&format!("\x1b[1;{};m{}\x1b[m", color_code, content));
            }
            if y > 0 {
                output.push('\n');
            }
        }

        output
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.x < self.width && pos.y < self.height,
            "position {} outside {}x{} board",
            pos,
            self.width,
            self.height
        );
        pos.y * self.width + pos.x
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rows().join("\n"))
    }
}
