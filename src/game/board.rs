//! The 3x3 grid, move application and win/tie detection.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const SIZE: usize = 3;

/// The symbol a player places on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The mark used by the other player.
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

/// Reasons a move is refused by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("position {0} is outside 1-9")]
    OutOfRange(u8),
    #[error("square {0} is already taken")]
    Occupied(Position),
}

/// A square index in `1..=9`, numbered left to right, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(u8);

impl Position {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Result<Self, IllegalMove> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(IllegalMove::OutOfRange(value))
        }
    }

    /// Position of the square at `(row, column)`, both in `0..3`.
    pub fn from_coords(row: usize, column: usize) -> Option<Self> {
        if row < SIZE && column < SIZE {
            Some(Self((row * SIZE + column) as u8 + 1))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn row(self) -> usize {
        (self.0 as usize - 1) / SIZE
    }

    pub fn column(self) -> usize {
        (self.0 as usize - 1) % SIZE
    }

    /// Every square in numbering order.
    pub fn all() -> impl Iterator<Item = Position> {
        (Self::MIN..=Self::MAX).map(Position)
    }
}

impl TryFrom<u8> for Position {
    type Error = IllegalMove;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Position::new(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of inspecting a board. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win(Mark),
    Tie,
    InProgress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    grid: [[Cell; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, position: Position) -> Cell {
        self.grid[position.row()][position.column()]
    }

    pub fn is_empty(&self, position: Position) -> bool {
        self.cell(position) == Cell::Empty
    }

    /// Squares still open, in numbering order.
    pub fn open_positions(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(|p| self.is_empty(*p))
    }

    /// Places `mark` on an empty square. The board is untouched on error.
    pub fn place(&mut self, position: Position, mark: Mark) -> Result<(), IllegalMove> {
        let cell = &mut self.grid[position.row()][position.column()];
        if *cell != Cell::Empty {
            return Err(IllegalMove::Occupied(position));
        }
        *cell = Cell::Marked(mark);
        Ok(())
    }

    /// Scans rows, then columns, then the two diagonals.
    pub fn check_winner(&self) -> Option<Mark> {
        let g = &self.grid;
        let rows = (0..SIZE).map(|r| [g[r][0], g[r][1], g[r][2]]);
        let columns = (0..SIZE).map(|c| [g[0][c], g[1][c], g[2][c]]);
        let diagonals = [[g[0][0], g[1][1], g[2][2]], [g[0][2], g[1][1], g[2][0]]];

        rows.chain(columns)
            .chain(diagonals)
            .find_map(|[a, b, c]| if a == b && b == c { a.mark() } else { None })
    }

    pub fn is_full(&self) -> bool {
        self.grid.iter().flatten().all(|cell| *cell != Cell::Empty)
    }

    pub fn is_terminal(&self) -> bool {
        self.check_winner().is_some() || self.is_full()
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.check_winner() {
            Some(mark) => GameOutcome::Win(mark),
            None if self.is_full() => GameOutcome::Tie,
            None => GameOutcome::InProgress,
        }
    }

    pub fn reset(&mut self) {
        self.grid = [[Cell::Empty; SIZE]; SIZE];
    }

    /// Cells row by row, for rendering.
    pub fn rows(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.grid
    }
}
