use std::fmt;

use contrast_engine::Player;
use serde::{Deserialize, Serialize};

use crate::self_play::Trajectory;

/// Counters for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Games finished by the workers and received by the updater.
    pub games_played: usize,
    /// Games the updater learned from.
    pub games_processed: usize,
    pub td_updates: usize,
    pub learner_wins: usize,
    pub opponent_wins: usize,
    pub draws: usize,
    pub black_wins: usize,
    pub white_wins: usize,
    pub total_moves: usize,
    pub promotions: usize,
    pub role_swaps: usize,
    pub final_learner_side: Player,
    pub elapsed_secs: f64,
}

impl Default for TrainingSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingSummary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            games_played: 0,
            games_processed: 0,
            td_updates: 0,
            learner_wins: 0,
            opponent_wins: 0,
            draws: 0,
            black_wins: 0,
            white_wins: 0,
            total_moves: 0,
            promotions: 0,
            role_swaps: 0,
            final_learner_side: Player::Black,
            elapsed_secs: 0.0,
        }
    }

    /// Counts the result of a processed game.
    pub fn record(&mut self, trajectory: &Trajectory) {
        self.total_moves += trajectory.moves;
        match trajectory.winner {
            None => self.draws += 1,
            Some(winner) => {
                if winner == trajectory.learner {
                    self.learner_wins += 1;
                } else {
                    self.opponent_wins += 1;
                }
                match winner {
                    Player::Black => self.black_wins += 1,
                    Player::White => self.white_wins += 1,
                }
            }
        }
    }

    /// Learner wins over decided games.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn learner_win_rate(&self) -> f64 {
        let decided = self.learner_wins + self.opponent_wins;
        if decided == 0 {
            0.0
        } else {
            self.learner_wins as f64 / decided as f64
        }
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn average_moves(&self) -> f64 {
        if self.games_processed == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games_processed as f64
        }
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn games_per_sec(&self) -> f64 {
        self.games_processed as f64 / self.elapsed_secs.max(1.0)
    }
}

impl fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "games played:    {}", self.games_played)?;
        writeln!(f, "games processed: {}", self.games_processed)?;
        writeln!(f, "TD updates:      {}", self.td_updates)?;
        writeln!(
            f,
            "learner:         {} wins / {} losses / {} draws ({:.2}% of decided)",
            self.learner_wins,
            self.opponent_wins,
            self.draws,
            self.learner_win_rate() * 100.0
        )?;
        writeln!(f, "by color:        black {} / white {}", self.black_wins, self.white_wins)?;
        writeln!(f, "average moves:   {:.1}", self.average_moves())?;
        writeln!(
            f,
            "promotions:      {} (role swaps {}, learner ends as {})",
            self.promotions, self.role_swaps, self.final_learner_side
        )?;
        write!(f, "elapsed:         {:.1}s", self.elapsed_secs)
    }
}
