//! When to replace the opponent snapshot and when to swap colors.
//!
//! [`PromotionPolicy`] is fed one learner result per processed game and
//! answers with a [`Decision`]. It owns no networks; the trainer acts on the
//! decision.
//!
//! # Rules
//!
//! Games are numbered from 1 in processing order.
//!
//! 1. Every result enters a rolling window of the last `window` games.
//! 2. At game `warmup` (if non-zero) the opponent is promoted unconditionally,
//!    ending the warm-up.
//! 3. After the warm-up, once the window is full and the learner has won at
//!    least `threshold` of it, the opponent is promoted.
//! 4. After the warm-up, the learner changes color every `swap_interval`
//!    games.
//!
//! A promotion clears the window, so the next one needs a full window of
//! games against the new opponent.
//!
//! # Example
//!
//! ```
//! use contrast_training::PromotionPolicy;
//!
//! let mut policy = PromotionPolicy::new(0, 4, 0.75, 100);
//! let decisions: Vec<_> = [true, true, false, true]
//!     .into_iter()
//!     .enumerate()
//!     .map(|(i, won)| policy.observe(i + 1, won))
//!     .collect();
//! assert!(decisions[..3].iter().all(|d| !d.promote));
//! assert!(decisions[3].promote);
//! assert_eq!(policy.window_len(), 0);
//! ```

use std::collections::VecDeque;

/// What the trainer should do after a game.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Decision {
    pub promote: bool,
    pub swap_roles: bool,
    /// Rolling win rate that triggered the promotion, if any. `None` for the
    /// unconditional end-of-warm-up promotion.
    pub win_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PromotionPolicy {
    warmup: usize,
    window_size: usize,
    threshold: f64,
    swap_interval: usize,
    window: VecDeque<bool>,
    window_wins: usize,
    last_swap: usize,
}

impl PromotionPolicy {
    /// # Arguments
    ///
    /// * `warmup` - Games before swaps and threshold promotions start
    /// * `window_size` - Rolling window length
    /// * `threshold` - Win rate in `[0, 1]` required for promotion
    /// * `swap_interval` - Games between color swaps
    #[must_use]
    pub fn new(warmup: usize, window_size: usize, threshold: f64, swap_interval: usize) -> Self {
        Self {
            warmup,
            window_size: window_size.max(1),
            threshold,
            swap_interval: swap_interval.max(1),
            window: VecDeque::with_capacity(window_size),
            window_wins: 0,
            last_swap: warmup,
        }
    }

    /// Records the result of processed game `game` (1-based).
    pub fn observe(&mut self, game: usize, learner_won: bool) -> Decision {
        self.window.push_back(learner_won);
        self.window_wins += usize::from(learner_won);
        if self.window.len() > self.window_size && self.window.pop_front() == Some(true) {
            self.window_wins -= 1;
        }

        let mut decision = Decision::default();
        if game == self.warmup && self.warmup > 0 {
            decision.promote = true;
        } else if game > self.warmup {
            if game - self.last_swap >= self.swap_interval {
                self.last_swap = game;
                decision.swap_roles = true;
            }
            if self.window.len() >= self.window_size {
                let rate = self.win_rate();
                if rate >= self.threshold {
                    decision.promote = true;
                    decision.win_rate = Some(rate);
                }
            }
        }
        if decision.promote {
            self.window.clear();
            self.window_wins = 0;
        }
        decision
    }

    /// Learner win rate over the current window (draws count as non-wins).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window_wins as f64 / self.window.len() as f64
        }
    }

    #[must_use]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn in_warmup(&self, game: usize) -> bool {
        game <= self.warmup
    }
}
