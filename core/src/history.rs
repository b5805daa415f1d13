use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

/// State of the game right after a recorded move.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    pub board: Board,
    pub winner: Option<Player>,
    pub game_ended: bool,
}

impl MoveResult {
    pub fn new(board: Board, outcome: Outcome) -> Self {
        Self {
            board,
            winner: outcome.winner(),
            game_ended: outcome.is_finished(),
        }
    }
}

/// Audit entry for one submitted move and what it led to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub board_before_move: Board,
    #[serde(rename = "move")]
    pub mv: Move,
    pub current_player: Player,
    pub result_after_move: MoveResult,
    pub timestamp: DateTime<Utc>,
}

impl MoveRecord {
    pub fn new(
        board_before_move: Board,
        mv: Move,
        current_player: Player,
        result_after_move: MoveResult,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            board_before_move,
            mv,
            current_player,
            result_after_move,
            timestamp,
        }
    }
}

/// Collects records for a single designated player until the game is flushed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveHistory {
    designated: Player,
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new(designated: Player) -> Self {
        Self {
            designated,
            records: Vec::new(),
        }
    }

    pub fn designated(&self) -> Player {
        self.designated
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keeps `record` only when it was made by the designated player; returns whether it was kept.
    pub fn record(&mut self, record: MoveRecord) -> bool {
        if record.current_player != self.designated {
            log::trace!("skip record for {} at {}", record.current_player, record.mv);
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn take(&mut self) -> Vec<MoveRecord> {
        core::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn record_for(player: Player, coords: Coord2) -> MoveRecord {
        let before = Board::empty();
        let after = before.place(coords, player).unwrap();
        MoveRecord::new(
            before,
            Move::try_from(coords).unwrap(),
            player,
            MoveResult::new(after, Outcome::of(&after)),
            t0(),
        )
    }

    #[test]
    fn only_designated_player_is_recorded() {
        let mut history = MoveHistory::new(Player::X);

        assert!(history.record(record_for(Player::X, (0, 0))));
        assert!(!history.record(record_for(Player::O, (1, 1))));

        assert_eq!(history.len(), 1);
        assert_eq!(history.records()[0].current_player, Player::X);
    }

    #[test]
    fn take_flushes_records() {
        let mut history = MoveHistory::new(Player::O);
        history.record(record_for(Player::O, (2, 2)));

        let flushed = history.take();

        assert_eq!(flushed.len(), 1);
        assert!(history.is_empty());
        assert_eq!(history.designated(), Player::O);
    }

    #[test]
    fn record_uses_camel_case_fields() {
        let json = serde_json::to_value(record_for(Player::X, (0, 1))).unwrap();

        assert_eq!(json["move"], serde_json::json!({ "row": 0, "col": 1 }));
        assert_eq!(json["currentPlayer"], "X");
        assert_eq!(json["boardBeforeMove"][0][1], serde_json::Value::Null);
        assert_eq!(json["resultAfterMove"]["board"][0][1], "X");
        assert_eq!(json["resultAfterMove"]["winner"], serde_json::Value::Null);
        assert_eq!(json["resultAfterMove"]["gameEnded"], false);
        assert!(json["timestamp"].is_string());
    }
}
