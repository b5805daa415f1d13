//! JSON payloads exchanged with the tic-tac-toe game server.

use serde::{Deserialize, Serialize};
use tictac_core::{
    Board, Coord, Coord2, MoveRecord, Outcome, Player, StrategyId, is_winning_line, line_owner,
};

/// Default server address used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    NewGame,
    Move,
    LogGame,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::NewGame => "/new-game",
            Self::Move => "/move",
            Self::LogGame => "/log-game",
        }
    }

    /// Joins the endpoint path onto `base`, tolerating a trailing slash.
    pub fn url(self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewGameRequest {
    #[serde(rename = "firstPlayer")]
    pub first_player: Player,
    pub strategy_id: StrategyId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResponse {
    pub board: Board,
    pub current_player: Player,
    #[serde(default)]
    pub winner: Option<Player>,
    #[serde(default)]
    pub winning_cells: Vec<Coord2>,
    #[serde(rename = "strategy_id", default)]
    pub strategy_id: Option<StrategyId>,
}

impl NewGameResponse {
    /// The opening position may already hold the server's first move; its state comes from the board.
    pub fn outcome(&self) -> Outcome {
        let scanned = Outcome::of(&self.board);
        if scanned.winner() != self.winner {
            log::warn!(
                "new-game winner {:?} disagrees with board scan {:?}",
                self.winner,
                scanned.winner()
            );
        }
        scanned
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub board: Board,
    pub row: Coord,
    pub col: Coord,
    pub current_player: Player,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub board: Board,
    pub current_player: Player,
    #[serde(default)]
    pub winner: Option<Player>,
    #[serde(default)]
    pub winning_cells: Vec<Coord2>,
    #[serde(default)]
    pub game_ended: bool,
}

impl MoveResponse {
    /// The result as the returned board shows it.
    ///
    /// A claimed line is kept only when `winner` owns all three cells, which matters when the
    /// board holds two lines. Any other claim the board does not back is logged and replaced by
    /// the scan.
    pub fn outcome(&self) -> Outcome {
        if let Some(winner) = self.winner
            && let Ok(cells) = <[Coord2; 3]>::try_from(self.winning_cells.as_slice())
            && is_winning_line(&cells)
            && line_owner(&self.board, &cells) == Some(winner)
        {
            return Outcome::Won { winner, cells };
        }

        let scanned = Outcome::of(&self.board);
        let agrees = match scanned {
            Outcome::Won { winner, .. } => self.winner == Some(winner),
            Outcome::Draw => self.winner.is_none() && self.game_ended,
            Outcome::InProgress => self.winner.is_none() && !self.game_ended,
        };
        if !agrees {
            log::warn!(
                "server reported winner {:?} on {:?} (ended: {}), board shows {:?}",
                self.winner,
                self.winning_cells,
                self.game_ended,
                scanned
            );
        }
        scanned
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGameRequest {
    pub move_history: Vec<MoveRecord>,
    pub insights: Vec<String>,
}
