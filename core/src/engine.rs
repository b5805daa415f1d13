use serde::{Deserialize, Serialize};

use crate::*;

/// Applies moves locally, alternating players until the board reaches a terminal outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    board: Board,
    current_player: Player,
    outcome: Outcome,
    move_count: u8,
}

impl PlayEngine {
    pub fn new(first_player: Player) -> Self {
        Self {
            board: Board::empty(),
            current_player: first_player,
            outcome: Outcome::InProgress,
            move_count: 0,
        }
    }

    /// Resumes from an arbitrary position, e.g. one handed out by the server.
    pub fn from_position(board: Board, current_player: Player) -> Self {
        let move_count = (CELL_COUNT - board.empty_cells().count()) as u8;
        Self {
            board,
            current_player,
            outcome: Outcome::of(&board),
            move_count,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    /// Checks whether the current player may take `coords` without changing anything.
    pub fn check_move(&self, coords: Coord2) -> Result<Move> {
        let mv = Move::try_from(coords)?;
        self.check_not_finished()?;
        if self.board.is_occupied(coords) {
            return Err(GameError::CellOccupied);
        }
        Ok(mv)
    }

    /// Places the current player's mark; the turn only passes on when the game goes on.
    pub fn play(&mut self, coords: Coord2) -> Result<Outcome> {
        self.check_move(coords)?;

        let player = self.current_player;
        self.board = self.board.place(coords, player)?;
        self.move_count += 1;
        self.outcome = Outcome::of(&self.board);

        match self.outcome {
            Outcome::InProgress => self.current_player = player.opponent(),
            Outcome::Won { winner, .. } => log::debug!("{} wins after {} moves", winner, self.move_count),
            Outcome::Draw => log::debug!("draw after {} moves", self.move_count),
        }

        Ok(self.outcome)
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.outcome.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

impl Default for PlayEngine {
    fn default() -> Self {
        Self::new(Player::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_starts_empty_with_requested_player() {
        let engine = PlayEngine::new(Player::O);

        assert!(engine.board().is_empty());
        assert_eq!(engine.board().empty_cells().count(), CELL_COUNT);
        assert_eq!(engine.current_player(), Player::O);
        assert_eq!(engine.outcome(), Outcome::InProgress);
    }

    #[test]
    fn play_alternates_players() {
        let mut engine = PlayEngine::new(Player::X);

        engine.play((0, 0)).unwrap();
        assert_eq!(engine.current_player(), Player::O);
        engine.play((1, 1)).unwrap();
        assert_eq!(engine.current_player(), Player::X);
        assert_eq!(engine.move_count(), 2);
    }

    #[test]
    fn occupied_cell_is_rejected_without_side_effects() {
        let mut engine = PlayEngine::new(Player::X);
        engine.play((1, 1)).unwrap();

        assert_eq!(engine.play((1, 1)), Err(GameError::CellOccupied));
        assert_eq!(engine.current_player(), Player::O);
        assert_eq!(engine.move_count(), 1);
    }

    #[test]
    fn winning_move_ends_game_and_keeps_winner_on_turn() {
        let mut engine = PlayEngine::new(Player::X);
        for coords in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            engine.play(coords).unwrap();
        }

        let outcome = engine.play((0, 2)).unwrap();

        assert_eq!(outcome.winner(), Some(Player::X));
        assert_eq!(outcome.winning_cells(), Some([(0, 0), (0, 1), (0, 2)]));
        assert_eq!(engine.current_player(), Player::X);
        assert_eq!(engine.play((2, 2)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn filling_board_without_line_is_a_draw() {
        let mut engine = PlayEngine::new(Player::X);
        // X O X / X O O / O X X
        for coords in [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ] {
            engine.play(coords).unwrap();
        }

        assert_eq!(engine.outcome(), Outcome::Draw);
        assert!(engine.is_finished());
    }

    #[test]
    fn resumed_position_counts_moves() {
        let board = Board::empty()
            .place((0, 0), Player::X)
            .and_then(|b| b.place((2, 2), Player::O))
            .unwrap();

        let engine = PlayEngine::from_position(board, Player::X);

        assert_eq!(engine.move_count(), 2);
        assert_eq!(engine.check_move((2, 2)), Err(GameError::CellOccupied));
        assert_eq!(engine.check_move((1, 1)), Ok(Move { row: 1, col: 1 }));
    }
}
