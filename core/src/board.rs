use core::fmt;
use core::ops::Index;
use serde::{Deserialize, Deserializer, Serialize};

use crate::*;

/// Content of a single board position.
pub type Cell = Option<Player>;

type Grid = [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize];

/// Fixed 3×3 grid. Serialized as nested rows, `null` for empty cells; `""` is read as empty too.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Board {
    cells: Grid,
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            cells: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    pub const fn from_rows(cells: Grid) -> Self {
        Self { cells }
    }

    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        let (row, col) = validate_coords(coords)?;
        Ok(self.cells[row as usize][col as usize])
    }

    pub fn is_occupied(&self, coords: Coord2) -> bool {
        self.get(coords).is_ok_and(|cell| cell.is_some())
    }

    /// Returns a copy of the board with `player` placed at `coords`.
    pub fn place(&self, coords: Coord2, player: Player) -> Result<Self> {
        let (row, col) = validate_coords(coords)?;
        if self.cells[row as usize][col as usize].is_some() {
            return Err(GameError::CellOccupied);
        }

        let mut next = *self;
        next.cells[row as usize][col as usize] = Some(player);
        Ok(next)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords().filter(move |&coords| self[coords].is_none())
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Some(player))
            .count()
    }

    /// Cells `player` could take to complete a line right away.
    pub fn winning_moves(&self, player: Player) -> impl Iterator<Item = Coord2> + '_ {
        self.empty_cells().filter(move |&coords| {
            self.place(coords, player)
                .is_ok_and(|next| Outcome::of(&next).winner() == Some(player))
        })
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let rows: [[wire::Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize] =
            Deserialize::deserialize(deserializer)?;
        Ok(Self::from_rows(rows.map(|row| row.map(|wire::Cell(cell)| cell))))
    }
}

mod wire {
    use core::fmt;
    use serde::de::{self, Deserialize, Deserializer, Unexpected, Visitor};

    use crate::Player;

    pub(super) struct Cell(pub(super) super::Cell);

    struct CellVisitor;

    impl<'de> Visitor<'de> for CellVisitor {
        type Value = super::Cell;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("\"X\", \"O\", \"\" or null")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            match value {
                "X" => Ok(Some(Player::X)),
                "O" => Ok(Some(Player::O)),
                "" => Ok(None),
                _ => Err(E::invalid_value(Unexpected::Str(value), &self)),
            }
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Cell {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_option(CellVisitor).map(Cell)
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[row as usize][col as usize]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                f.write_str(cell.map_or(".", Player::symbol))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn empty_board_has_nine_free_cells() {
        let board = Board::empty();
        assert!(board.is_empty());
        assert!(!board.is_full());
        assert_eq!(board.empty_cells().count(), CELL_COUNT);
    }

    #[test]
    fn place_rejects_occupied_and_out_of_range() {
        let board = Board::empty().place((1, 1), Player::X).unwrap();

        assert_eq!(board[(1, 1)], Some(Player::X));
        assert_eq!(board.place((1, 1), Player::O), Err(GameError::CellOccupied));
        assert_eq!(board.place((3, 1), Player::O), Err(GameError::InvalidCoords));
        assert_eq!(board.get((1, 5)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn place_leaves_original_untouched() {
        let board = Board::empty();
        let next = board.place((0, 2), Player::O).unwrap();

        assert!(board.is_empty());
        assert_eq!(next.count(Player::O), 1);
    }

    #[test]
    fn winning_moves_finds_open_line_ends() {
        use Player::*;
        let board = Board::from_rows([
            [Some(X), Some(X), None],
            [Some(O), None, None],
            [Some(O), None, None],
        ]);

        let x_wins: Vec<_> = board.winning_moves(X).collect();
        let o_wins: Vec<_> = board.winning_moves(O).collect();

        assert_eq!(x_wins, [(0, 2)]);
        assert!(o_wins.is_empty());
    }

    #[test]
    fn serializes_as_nested_rows() {
        let board = Board::empty().place((0, 0), Player::X).unwrap();
        let json = serde_json::to_value(board).unwrap();

        assert_eq!(
            json,
            serde_json::json!([["X", null, null], [null, null, null], [null, null, null]])
        );
        assert_eq!(serde_json::from_value::<Board>(json).unwrap(), board);
    }

    #[test]
    fn rejects_malformed_rows() {
        let short = serde_json::json!([["X", null], [null, null, null], [null, null, null]]);
        assert!(serde_json::from_value::<Board>(short).is_err());

        let bad_mark = serde_json::json!([["Z", null, null], [null, null, null], [null, null, null]]);
        assert!(serde_json::from_value::<Board>(bad_mark).is_err());
    }

    #[test]
    fn reads_blank_strings_as_empty_cells() {
        let board: Board =
            serde_json::from_str(r#"[["", "", "X"], ["", "O", ""], [null, "", ""]]"#).unwrap();

        assert_eq!(board[(0, 2)], Some(Player::X));
        assert_eq!(board[(1, 1)], Some(Player::O));
        assert_eq!(board.empty_cells().count(), CELL_COUNT - 2);
        assert_eq!(serde_json::to_value(board).unwrap()[0][0], serde_json::Value::Null);
    }
}
