//! Training configuration.
//!
//! [`TrainingConfig`] is plain data: every field has a default, the whole
//! struct round-trips through serde, and [`TrainingConfig::validate`] is the
//! single place that decides whether a combination of values is usable.
//!
//! # Example
//!
//! ```
//! use contrast_training::{OpponentKind, TrainingConfig};
//!
//! let config = TrainingConfig {
//!     num_games: 2_000,
//!     opponent: OpponentKind::RuleBased,
//!     ..TrainingConfig::default()
//! };
//! assert!(config.validate().is_ok());
//!
//! let broken = TrainingConfig { num_workers: 0, ..config };
//! assert!(broken.validate().is_err());
//! ```

use std::path::PathBuf;

use contrast_evaluator::PatternSet;
use serde::{Deserialize, Serialize};

use crate::schedule::LearningRateSchedule;

/// Who the learner plays against.
///
/// Parsed case-insensitively from the variant name.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum OpponentKind {
    /// A frozen copy of the learner, replaced on promotion. Only the
    /// learner's own states are trained.
    #[default]
    Snapshot,
    /// The learner on both sides. Every state is trained.
    Mirror,
    /// [`GreedyPolicy`](contrast_evaluator::GreedyPolicy).
    Greedy,
    /// [`RuleBasedPolicy`](contrast_evaluator::RuleBasedPolicy).
    RuleBased,
}

impl OpponentKind {
    /// Whether states of the opponent's side are trained too.
    #[must_use]
    pub fn learns_both_sides(self) -> bool {
        matches!(self, Self::Mirror)
    }

    /// Whether the opponent is a promoted copy of the learner.
    #[must_use]
    pub fn uses_snapshot(self) -> bool {
        matches!(self, Self::Snapshot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Games to play in total.
    pub num_games: usize,
    /// Stop once this many TD updates have been applied.
    pub max_td_updates: Option<usize>,
    /// Learner's ε in ε-greedy move selection.
    pub exploration_rate: f64,
    /// ε for a snapshot opponent.
    pub opponent_exploration_rate: f64,
    pub opponent: OpponentKind,
    /// Warm-up games before role swaps and promotions start.
    pub initial_training_games: usize,
    /// Games between Black/White role swaps.
    pub swap_interval: usize,
    /// Size of the rolling win-rate window.
    pub evaluation_window: usize,
    /// Rolling learner win rate at which the snapshot is replaced.
    pub promotion_threshold: f64,
    /// Processed games between checkpoints.
    pub save_interval: usize,
    /// Processed games between progress reports.
    pub report_interval: usize,
    pub num_workers: usize,
    pub save_path: PathBuf,
    /// Weights to resume from.
    pub load_path: Option<PathBuf>,
    /// Start from fresh weights when `load_path` cannot be loaded instead of
    /// failing.
    pub fresh_on_load_failure: bool,
    /// Game length cap; reaching it is a draw.
    pub max_moves: usize,
    /// Odd-numbered games start with White.
    pub alternate_first_player: bool,
    /// Base seed for the worker generators. Unset means OS entropy.
    pub seed: Option<u64>,
    pub patterns: PatternSet,
    pub lr: LearningRateSchedule,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_games: 100_000,
            max_td_updates: None,
            exploration_rate: 0.1,
            opponent_exploration_rate: 0.0,
            opponent: OpponentKind::Snapshot,
            initial_training_games: 1_000,
            swap_interval: 10_000,
            evaluation_window: 1_000,
            promotion_threshold: 0.55,
            save_interval: 10_000,
            report_interval: 100,
            num_workers: 7,
            save_path: PathBuf::from("ntuple_selfplay.bin"),
            load_path: None,
            fresh_on_load_failure: false,
            max_moves: 500,
            alternate_first_player: true,
            seed: None,
            patterns: PatternSet::default(),
            lr: LearningRateSchedule::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("at least one worker is required")]
    NoWorkers,
    #[display("{name} must be within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[display("{name} must be positive")]
    ZeroInterval { name: &'static str },
    #[display("learning rates must be non-negative with lr_min <= lr_max, got {lr_min} / {lr_max}")]
    InvalidRates { lr_min: f32, lr_max: f32 },
    #[display("decay steepness must be non-negative, got {k}")]
    NegativeDecay { k: f32 },
}

impl TrainingConfig {
    /// Checks that the values can drive a training run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        for (name, value) in [
            ("exploration_rate", self.exploration_rate),
            ("opponent_exploration_rate", self.opponent_exploration_rate),
            ("promotion_threshold", self.promotion_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }
        for (name, value) in [
            ("evaluation_window", self.evaluation_window),
            ("swap_interval", self.swap_interval),
            ("save_interval", self.save_interval),
            ("report_interval", self.report_interval),
            ("max_moves", self.max_moves),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { name });
            }
        }
        let LearningRateSchedule { lr_max, lr_min, k } = self.lr;
        if lr_min.is_nan() || lr_max.is_nan() || lr_min < 0.0 || lr_min > lr_max {
            return Err(ConfigError::InvalidRates { lr_min, lr_max });
        }
        if k.is_nan() || k < 0.0 {
            return Err(ConfigError::NegativeDecay { k });
        }
        Ok(())
    }

    /// Seed for worker `id`, if the run is seeded.
    #[must_use]
    pub fn worker_seed(&self, id: usize) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(id as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TrainingConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.num_workers, 7);
        assert!((config.promotion_threshold - 0.55).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects() {
        let base = TrainingConfig::default();
        let cases = [
            TrainingConfig {
                num_workers: 0,
                ..base.clone()
            },
            TrainingConfig {
                exploration_rate: 1.5,
                ..base.clone()
            },
            TrainingConfig {
                opponent_exploration_rate: -0.1,
                ..base.clone()
            },
            TrainingConfig {
                promotion_threshold: f64::NAN,
                ..base.clone()
            },
            TrainingConfig {
                evaluation_window: 0,
                ..base.clone()
            },
            TrainingConfig {
                swap_interval: 0,
                ..base.clone()
            },
            TrainingConfig {
                save_interval: 0,
                ..base.clone()
            },
            TrainingConfig {
                max_moves: 0,
                ..base.clone()
            },
            TrainingConfig {
                lr: LearningRateSchedule {
                    lr_max: 0.01,
                    lr_min: 0.1,
                    k: 1.0,
                },
                ..base.clone()
            },
            TrainingConfig {
                lr: LearningRateSchedule {
                    k: -1.0,
                    ..LearningRateSchedule::default()
                },
                ..base.clone()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_error_names_field() {
        let config = TrainingConfig {
            swap_interval: 0,
            ..TrainingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err, ConfigError::ZeroInterval { name: "swap_interval" });
        assert_eq!(err.to_string(), "swap_interval must be positive");
    }

    #[test]
    fn test_partial_json() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{"num_games": 10, "opponent": "rule_based", "lr": {"k": 4.0}}"#).unwrap();
        assert_eq!(config.num_games, 10);
        assert_eq!(config.opponent, OpponentKind::RuleBased);
        assert!((config.lr.k - 4.0).abs() < f32::EPSILON);
        assert!((config.lr.lr_max - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.num_workers, 7);
    }

    #[test]
    fn test_parse_opponent() {
        assert_eq!("snapshot".parse::<OpponentKind>().unwrap(), OpponentKind::Snapshot);
        assert_eq!("RuleBased".parse::<OpponentKind>().unwrap(), OpponentKind::RuleBased);
        assert!("nobody".parse::<OpponentKind>().is_err());
    }

    #[test]
    fn test_worker_seed() {
        let config = TrainingConfig {
            seed: Some(10),
            ..TrainingConfig::default()
        };
        assert_eq!(config.worker_seed(3), Some(13));
        assert_eq!(TrainingConfig::default().worker_seed(3), None);
    }
}
