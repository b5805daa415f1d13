use serde::{Deserialize, Serialize};

use crate::*;

/// Three cells forming a row, column or diagonal.
pub type Line = [Coord2; 3];

/// The 8 lines that win the game, in scan order: rows, columns, main diagonal, anti-diagonal.
pub const WINNING_LINES: [Line; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

pub fn is_winning_line(line: &Line) -> bool {
    WINNING_LINES.contains(line)
}

/// Returns the owner of `line` when all three cells belong to the same player.
pub fn line_owner(board: &Board, line: &Line) -> Option<Player> {
    let [a, b, c] = line.map(|coords| board[coords]);
    match (a, b, c) {
        (Some(p), Some(q), Some(r)) if p == q && q == r => Some(p),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won { winner: Player, cells: Line },
    Draw,
}

impl Outcome {
    /// Scans the board; the first completed line in [`WINNING_LINES`] order wins.
    pub fn of(board: &Board) -> Self {
        for line in &WINNING_LINES {
            if let Some(winner) = line_owner(board, line) {
                return Self::Won {
                    winner,
                    cells: *line,
                };
            }
        }

        if board.is_full() {
            Self::Draw
        } else {
            Self::InProgress
        }
    }

    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Won { winner, .. } => Some(winner),
            _ => None,
        }
    }

    pub const fn winning_cells(self) -> Option<Line> {
        match self {
            Self::Won { cells, .. } => Some(cells),
            _ => None,
        }
    }

    pub fn is_winning_cell(self, coords: Coord2) -> bool {
        self.winning_cells()
            .is_some_and(|cells| cells.contains(&coords))
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::InProgress
    }
}
