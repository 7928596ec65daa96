//! Head-to-head games between two policies.
//!
//! [`play_match`] plays one game to completion (or to the move cap, which is
//! a draw); [`MatchStats`] aggregates the results of many games.

use std::fmt;

use contrast_engine::{GameState, Outcome, Player};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::policy::Policy;

/// Games longer than this are drawn.
pub const DEFAULT_MAX_MOVES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// `None` for a draw by move cap.
    pub outcome: Option<Outcome>,
    pub moves: usize,
}

impl MatchResult {
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.outcome.map(Outcome::winner)
    }
}

/// Plays one game from the standard opening.
///
/// # Arguments
///
/// * `black`, `white` - Policies for each side
/// * `first` - Player who moves first
/// * `max_moves` - Move cap; reaching it is a draw
/// * `rng` - Random source for the policies
pub fn play_match<B, W, R>(black: &B, white: &W, first: Player, max_moves: usize, rng: &mut R) -> MatchResult
where
    B: Policy + ?Sized,
    W: Policy + ?Sized,
    R: Rng + ?Sized,
{
    let mut state = GameState::new();
    state.set_current_player(first);
    let mut moves = 0;
    while moves < max_moves {
        if let Some(outcome) = state.outcome() {
            return MatchResult {
                outcome: Some(outcome),
                moves,
            };
        }
        let mover = state.current_player();
        let picked = match mover {
            Player::Black => black.pick(&state, rng),
            Player::White => white.pick(&state, rng),
        };
        let Some(mv) = picked else {
            return MatchResult {
                outcome: Some(Outcome::NoMoves(mover)),
                moves,
            };
        };
        state.apply_move(&mv);
        moves += 1;
    }
    MatchResult {
        outcome: state.outcome(),
        moves,
    }
}

/// Win/draw counts over a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub games: usize,
    pub black_wins: usize,
    pub white_wins: usize,
    pub draws: usize,
    pub total_moves: usize,
}

impl MatchStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &MatchResult) {
        self.games += 1;
        self.total_moves += result.moves;
        match result.winner() {
            Some(Player::Black) => self.black_wins += 1,
            Some(Player::White) => self.white_wins += 1,
            None => self.draws += 1,
        }
    }

    #[must_use]
    pub fn wins(&self, player: Player) -> usize {
        match player {
            Player::Black => self.black_wins,
            Player::White => self.white_wins,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn ratio(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }

    #[must_use]
    pub fn win_rate(&self, player: Player) -> f64 {
        self.ratio(self.wins(player))
    }

    #[must_use]
    pub fn draw_rate(&self) -> f64 {
        self.ratio(self.draws)
    }

    #[must_use]
    pub fn average_moves(&self) -> f64 {
        self.ratio(self.total_moves)
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: black {:.1}%, white {:.1}%, draw {:.1}%, avg {:.1} moves",
            self.games,
            self.win_rate(Player::Black) * 100.0,
            self.win_rate(Player::White) * 100.0,
            self.draw_rate() * 100.0,
            self.average_moves(),
        )
    }
}
