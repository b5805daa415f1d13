use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tictac_core::{
    Board, Coord2, GameError, Insight, MoveHistory, MoveRecord, MoveResult, Outcome, PlayEngine,
    Player, StrategyId, Verdict, analyze,
};
use tictac_protocol::{LogGameRequest, MoveRequest, MoveResponse, NewGameResponse};

use crate::utils::StorageKey;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum SessionError {
    #[error("a move is still waiting for the server")]
    MoveInFlight,
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Who places the first mark, as picked in the start dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FirstMove {
    Human,
    Opponent,
    Random,
}

impl FirstMove {
    pub(crate) fn resolve(self, human: Player, coin: bool) -> Player {
        match self {
            Self::Human => human,
            Self::Opponent => human.opponent(),
            Self::Random if coin => human,
            Self::Random => human.opponent(),
        }
    }
}

/// Numbers games so replies that belong to a discarded one can be dropped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct GameEpoch {
    current: u32,
    awaiting_start: bool,
}

impl GameEpoch {
    pub(crate) fn current(self) -> u32 {
        self.current
    }

    /// Opens the next game. Remote games then wait for their new-game reply.
    pub(crate) fn begin(&mut self, remote: bool) -> u32 {
        self.current = self.current.wrapping_add(1);
        self.awaiting_start = remote;
        self.current
    }

    /// True for the first new-game reply of the current game; later or older ones are refused.
    pub(crate) fn accept_start(&mut self, epoch: u32) -> bool {
        let accepted = self.awaiting_start && epoch == self.current;
        if accepted {
            self.awaiting_start = false;
        }
        accepted
    }

    pub(crate) fn discard(&mut self) {
        self.current = self.current.wrapping_add(1);
        self.awaiting_start = false;
    }
}

/// Everything the game-over dialog and the game log need once a game has ended.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GameReport {
    pub verdict: Verdict,
    pub outcome: Outcome,
    pub strategy: Option<StrategyId>,
    pub insights: Vec<Insight>,
    pub log: LogGameRequest,
}

/// Client-side state of one game, from the start response until it is discarded.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GameSession {
    epoch: u32,
    board: Board,
    current_player: Player,
    outcome: Outcome,
    strategy: Option<StrategyId>,
    history: MoveHistory,
    pending: Option<Coord2>,
    reported: bool,
}

impl GameSession {
    /// Game hosted by the server; the reported strategy wins over the requested one.
    pub(crate) fn remote(
        epoch: u32,
        human: Player,
        requested: StrategyId,
        response: NewGameResponse,
    ) -> Self {
        let outcome = response.outcome();
        Self {
            epoch,
            board: response.board,
            current_player: response.current_player,
            outcome,
            strategy: Some(response.strategy_id.unwrap_or(requested)),
            history: MoveHistory::new(human),
            pending: None,
            reported: false,
        }
    }

    /// Both sides play on this device; moves are applied by the local engine.
    pub(crate) fn hot_seat(epoch: u32, human: Player, first_player: Player) -> Self {
        let engine = PlayEngine::new(first_player);
        Self {
            epoch,
            board: *engine.board(),
            current_player: engine.current_player(),
            outcome: engine.outcome(),
            strategy: None,
            history: MoveHistory::new(human),
            pending: None,
            reported: false,
        }
    }

    pub(crate) fn epoch(&self) -> u32 {
        self.epoch
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn current_player(&self) -> Player {
        self.current_player
    }

    pub(crate) fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub(crate) fn strategy(&self) -> Option<&StrategyId> {
        self.strategy.as_ref()
    }

    pub(crate) fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub(crate) fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a move reply tagged with `epoch` belongs to this game's outstanding request.
    pub(crate) fn accepts_reply(&self, epoch: u32) -> bool {
        self.epoch == epoch && self.pending.is_some()
    }

    /// Whether a click on `coords` would be acted upon right now.
    pub(crate) fn can_play_at(&self, coords: Coord2) -> bool {
        self.check_move(coords).is_ok()
    }

    fn check_move(&self, coords: Coord2) -> Result<(), SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::MoveInFlight);
        }
        PlayEngine::from_position(self.board, self.current_player).check_move(coords)?;
        Ok(())
    }

    /// Validates the click and marks it in flight; the returned request goes to the server.
    pub(crate) fn begin_remote_move(&mut self, coords: Coord2) -> Result<MoveRequest, SessionError> {
        self.check_move(coords)?;
        self.pending = Some(coords);
        Ok(MoveRequest {
            board: self.board,
            row: coords.0,
            col: coords.1,
            current_player: self.current_player,
        })
    }

    /// Applies the server's answer for the move started with [`Self::begin_remote_move`].
    pub(crate) fn complete_remote_move(
        &mut self,
        coords: Coord2,
        response: MoveResponse,
        now: DateTime<Utc>,
    ) -> Outcome {
        if self.pending != Some(coords) {
            log::warn!("move response for {:?} while {:?} was pending", coords, self.pending);
        }
        self.pending = None;

        let outcome = response.outcome();
        self.apply(coords, response.board, response.current_player, outcome, now);
        outcome
    }

    /// Drops the in-flight marker after a failed request so the player can click again.
    pub(crate) fn abort_remote_move(&mut self) {
        self.pending = None;
    }

    pub(crate) fn play_local(&mut self, coords: Coord2, now: DateTime<Utc>) -> Result<Outcome, SessionError> {
        self.check_move(coords)?;
        let mut engine = PlayEngine::from_position(self.board, self.current_player);
        let outcome = engine.play(coords)?;
        self.apply(coords, *engine.board(), engine.current_player(), outcome, now);
        Ok(outcome)
    }

    fn apply(
        &mut self,
        coords: Coord2,
        board: Board,
        next_player: Player,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) {
        match coords.try_into() {
            Ok(mv) => {
                let record = MoveRecord::new(
                    self.board,
                    mv,
                    self.current_player,
                    MoveResult::new(board, outcome),
                    now,
                );
                self.history.record(record);
            }
            Err(err) => log::error!("not recording move at {:?}: {}", coords, err),
        }

        self.board = board;
        self.current_player = next_player;
        self.outcome = outcome;
    }

    /// Produces the report for a finished game, once; the history is flushed into it.
    pub(crate) fn finish(&mut self) -> Option<GameReport> {
        if !self.outcome.is_finished() || self.reported {
            return None;
        }
        self.reported = true;

        let human = self.history.designated();
        let move_history = self.history.take();
        let insights = analyze(&move_history, human, self.outcome);
        let log = LogGameRequest {
            move_history,
            insights: insights.iter().map(ToString::to_string).collect(),
        };

        Some(GameReport {
            verdict: Verdict::for_player(self.outcome, human),
            outcome: self.outcome,
            strategy: self.strategy.clone(),
            insights,
            log,
        })
    }
}

/// Running tally of finished games, from the designated player's point of view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Scoreboard {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Scoreboard {
    pub(crate) fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Won => self.wins = self.wins.saturating_add(1),
            Verdict::Lost => self.losses = self.losses.saturating_add(1),
            Verdict::Draw => self.draws = self.draws.saturating_add(1),
            Verdict::Unfinished => {}
        }
    }
}

impl StorageKey for Scoreboard {
    const KEY: &'static str = "tictac:scoreboard";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictac_core::StrategyRotation;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn empty_start(current_player: Player) -> NewGameResponse {
        NewGameResponse {
            board: Board::empty(),
            current_player,
            winner: None,
            winning_cells: vec![],
            strategy_id: None,
        }
    }

    fn reply(board: Board, current_player: Player) -> MoveResponse {
        let outcome = Outcome::of(&board);
        MoveResponse {
            board,
            current_player,
            winner: outcome.winner(),
            winning_cells: outcome.winning_cells().map(Vec::from).unwrap_or_default(),
            game_ended: outcome.is_finished(),
        }
    }

    #[test]
    fn remote_session_starts_from_response() {
        let requested = StrategyRotation::default().current();
        let session = GameSession::remote(1, Player::X, requested.clone(), empty_start(Player::O));

        assert!(session.board().is_empty());
        assert_eq!(session.current_player(), Player::O);
        assert_eq!(session.strategy(), Some(&requested));
        assert_eq!(session.outcome(), Outcome::InProgress);
    }

    #[test]
    fn second_click_while_waiting_is_ignored() {
        let mut session = GameSession::remote(
            1,
            Player::X,
            StrategyRotation::default().current(),
            empty_start(Player::X),
        );

        let request = session.begin_remote_move((1, 1)).unwrap();
        assert_eq!((request.row, request.col), (1, 1));
        assert_eq!(request.current_player, Player::X);

        assert_eq!(session.begin_remote_move((0, 0)), Err(SessionError::MoveInFlight));
        assert!(!session.can_play_at((0, 0)));

        session.abort_remote_move();
        assert!(session.can_play_at((0, 0)));
    }

    #[test]
    fn start_reply_after_reset_is_dropped() {
        let mut epoch = GameEpoch::default();
        let discarded = epoch.begin(true);
        epoch.discard();
        assert!(!epoch.accept_start(discarded));

        let next = epoch.begin(true);
        assert_ne!(next, discarded);
        assert!(epoch.accept_start(next));
        assert!(!epoch.accept_start(next));
    }

    #[test]
    fn hot_seat_game_expects_no_start_reply() {
        let mut epoch = GameEpoch::default();
        let game = epoch.begin(false);
        assert!(!epoch.accept_start(game));
    }

    #[test]
    fn move_reply_for_older_game_is_dropped() {
        let mut epoch = GameEpoch::default();
        let old = epoch.begin(true);
        epoch.discard();
        let current = epoch.begin(true);
        assert!(epoch.accept_start(current));

        let mut session = GameSession::remote(
            current,
            Player::X,
            StrategyRotation::default().current(),
            empty_start(Player::X),
        );
        assert!(!session.accepts_reply(current));

        session.begin_remote_move((2, 2)).unwrap();
        assert!(session.accepts_reply(current));
        assert!(!session.accepts_reply(old));

        session.abort_remote_move();
        assert!(!session.accepts_reply(current));
    }

    #[test]
    fn reply_for_other_cell_still_clears_pending() {
        let mut session = GameSession::remote(
            1,
            Player::X,
            StrategyRotation::default().current(),
            empty_start(Player::X),
        );
        session.begin_remote_move((1, 1)).unwrap();
        let after = Board::empty().place((0, 0), Player::X).unwrap();

        session.complete_remote_move((0, 0), reply(after, Player::O), t0());

        assert!(!session.is_waiting());
        assert_eq!(session.board(), &after);
        assert_eq!(session.current_player(), Player::O);
        assert!(session.can_play_at((1, 1)));
    }

    #[test]
    fn occupied_cell_is_rejected_before_sending() {
        let mut session = GameSession::hot_seat(1, Player::X, Player::X);
        session.play_local((0, 0), t0()).unwrap();

        assert_eq!(
            session.begin_remote_move((0, 0)),
            Err(SessionError::Game(GameError::CellOccupied))
        );
        assert!(!session.is_waiting());
    }

    #[test]
    fn remote_reply_updates_board_and_records_human_move() {
        let mut session = GameSession::remote(
            1,
            Player::X,
            StrategyRotation::default().current(),
            empty_start(Player::X),
        );
        session.begin_remote_move((1, 1)).unwrap();
        let after = Board::empty()
            .place((1, 1), Player::X)
            .and_then(|b| b.place((0, 0), Player::O))
            .unwrap();

        let outcome = session.complete_remote_move((1, 1), reply(after, Player::X), t0());

        assert_eq!(outcome, Outcome::InProgress);
        assert_eq!(session.board(), &after);
        assert_eq!(session.current_player(), Player::X);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().records()[0].result_after_move.board, after);
        assert!(!session.is_waiting());
    }

    #[test]
    fn hot_seat_only_logs_designated_player() {
        let mut session = GameSession::hot_seat(1, Player::X, Player::X);
        for coords in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            session.play_local(coords, t0()).unwrap();
        }

        let outcome = session.play_local((0, 2), t0()).unwrap();

        assert_eq!(outcome.winner(), Some(Player::X));
        assert_eq!(session.history().len(), 3);
        assert!(
            session
                .history()
                .records()
                .iter()
                .all(|record| record.current_player == Player::X)
        );
        assert_eq!(
            session.play_local((2, 2), t0()),
            Err(SessionError::Game(GameError::AlreadyEnded))
        );
    }

    #[test]
    fn finish_reports_once_and_flushes_history() {
        let mut session = GameSession::hot_seat(1, Player::O, Player::X);
        assert!(session.finish().is_none());

        for coords in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            session.play_local(coords, t0()).unwrap();
        }

        let report = session.finish().unwrap();

        assert_eq!(report.verdict, Verdict::Lost);
        assert_eq!(report.log.move_history.len(), 2);
        assert_eq!(report.log.insights.len(), report.insights.len());
        assert_eq!(
            report.log.insights.last().map(String::as_str),
            Some("Lost after 2 moves.")
        );
        assert!(session.history().is_empty());
        assert!(session.finish().is_none());
    }

    #[test]
    fn first_move_choice_resolves_against_human_symbol() {
        assert_eq!(FirstMove::Human.resolve(Player::O, false), Player::O);
        assert_eq!(FirstMove::Opponent.resolve(Player::O, true), Player::X);
        assert_eq!(FirstMove::Random.resolve(Player::X, true), Player::X);
        assert_eq!(FirstMove::Random.resolve(Player::X, false), Player::O);
    }

    #[test]
    fn scoreboard_counts_verdicts() {
        let mut score = Scoreboard::default();
        score.record(Verdict::Won);
        score.record(Verdict::Draw);
        score.record(Verdict::Draw);
        score.record(Verdict::Unfinished);

        assert_eq!(
            score,
            Scoreboard {
                wins: 1,
                losses: 0,
                draws: 2
            }
        );
    }
}
