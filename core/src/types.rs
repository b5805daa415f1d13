use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Single coordinate axis, used for rows and columns.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Width and height of the board.
pub const BOARD_SIZE: Coord = 3;

/// Number of cells on the board.
pub const CELL_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

pub const fn in_bounds((row, col): Coord2) -> bool {
    row < BOARD_SIZE && col < BOARD_SIZE
}

pub fn validate_coords(coords: Coord2) -> Result<Coord2> {
    if in_bounds(coords) {
        Ok(coords)
    } else {
        Err(GameError::InvalidCoords)
    }
}

/// Every board position in row-major order.
pub fn iter_coords() -> impl Iterator<Item = Coord2> {
    (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub const fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::X
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl core::str::FromStr for Player {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "X" | "x" => Ok(Self::X),
            "O" | "o" => Ok(Self::O),
            _ => Err(GameError::InvalidPlayer),
        }
    }
}

/// A single placement request, always within `[0, 2] × [0, 2]` when built through [`Move::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub row: Coord,
    pub col: Coord,
}

impl Move {
    pub fn new(row: Coord, col: Coord) -> Result<Self> {
        let (row, col) = validate_coords((row, col))?;
        Ok(Self { row, col })
    }

    pub const fn coords(self) -> Coord2 {
        (self.row, self.col)
    }
}

impl TryFrom<Coord2> for Move {
    type Error = GameError;

    fn try_from((row, col): Coord2) -> Result<Self> {
        Self::new(row, col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
