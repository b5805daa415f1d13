//! Heuristic feedback about a finished game, computed from the designated player's moves.

use alloc::vec::Vec;
use core::fmt;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Center,
    Corner,
    Edge,
}

impl Placement {
    pub const fn of((row, col): Coord2) -> Self {
        match (row, col) {
            (1, 1) => Self::Center,
            (0 | 2, 0 | 2) => Self::Corner,
            _ => Self::Edge,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Won,
    Lost,
    Draw,
    Unfinished,
}

impl Verdict {
    pub fn for_player(outcome: Outcome, player: Player) -> Self {
        match outcome {
            Outcome::InProgress => Self::Unfinished,
            Outcome::Draw => Self::Draw,
            Outcome::Won { winner, .. } if winner == player => Self::Won,
            Outcome::Won { .. } => Self::Lost,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Insight {
    Opening(Placement),
    MissedWin { played: Move, winning: Coord2 },
    MissedBlock { played: Move, threat: Coord2 },
    Fork { played: Move },
    Summary { verdict: Verdict, moves: usize },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening(Placement::Center) => f.write_str("Opened in the center, the strongest first move."),
            Self::Opening(Placement::Corner) => f.write_str("Opened in a corner, a solid first move."),
            Self::Opening(Placement::Edge) => {
                f.write_str("Opened on an edge; the center and corners are part of more lines.")
            }
            Self::MissedWin { played, winning } => write!(
                f,
                "Played {} but ({}, {}) would have won immediately.",
                played, winning.0, winning.1
            ),
            Self::MissedBlock { played, threat } => write!(
                f,
                "Played {} and left the opponent's winning cell ({}, {}) open.",
                played, threat.0, threat.1
            ),
            Self::Fork { played } => write!(f, "Created a fork with {}, threatening two lines at once.", played),
            Self::Summary { verdict, moves } => match verdict {
                Verdict::Won => write!(f, "Won in {} moves.", moves),
                Verdict::Lost => write!(f, "Lost after {} moves.", moves),
                Verdict::Draw => write!(f, "Drew after {} moves.", moves),
                Verdict::Unfinished => write!(f, "Game stopped after {} moves.", moves),
            },
        }
    }
}

/// Reviews each of `player`'s recorded moves, then appends a summary for `final_outcome`.
pub fn analyze(records: &[MoveRecord], player: Player, final_outcome: Outcome) -> Vec<Insight> {
    let mut insights = Vec::new();
    let mut own_moves = records.iter().filter(|record| record.current_player == player).peekable();

    if let Some(first) = own_moves.peek()
        && first.board_before_move.count(player) == 0
    {
        insights.push(Insight::Opening(Placement::of(first.mv.coords())));
    }

    let mut moves = 0;
    for record in own_moves {
        moves += 1;
        insights.extend(review_move(record, player));
    }

    insights.push(Insight::Summary {
        verdict: Verdict::for_player(final_outcome, player),
        moves,
    });
    insights
}

fn review_move(record: &MoveRecord, player: Player) -> Option<Insight> {
    let before = &record.board_before_move;
    let played = record.mv;
    let target = played.coords();

    let wins: Vec<_> = before.winning_moves(player).collect();
    if let Some(&winning) = wins.first() {
        return (!wins.contains(&target)).then_some(Insight::MissedWin { played, winning });
    }

    let threats: Vec<_> = before.winning_moves(player.opponent()).collect();
    if let Some(&threat) = threats.first()
        && !threats.contains(&target)
    {
        return Some(Insight::MissedBlock { played, threat });
    }

    let after = before.place(target, player).ok()?;
    if Outcome::of(&after).is_finished() {
        return None;
    }
    (after.winning_moves(player).count() >= 2).then_some(Insight::Fork { played })
}
