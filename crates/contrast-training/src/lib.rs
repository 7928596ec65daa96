//! Concurrent self-play training of the Contrast N-tuple network.
//!
//! # How Training Works
//!
//! 1. **Bootstrap** - Load the learner (or start fresh) and publish a copy as
//!    the opponent snapshot
//! 2. **Self-play** - Worker threads play learner-vs-opponent games with
//!    ε-greedy exploration on the learner's side
//! 3. **Update** - A single updater thread replays each finished game from
//!    the end and applies TD(0) updates towards +1 / -1 / 0
//! 4. **Promotion** - When the learner beats the snapshot often enough, the
//!    snapshot is replaced by the current learner
//! 5. **Checkpoint** - Weights are written every `save_interval` games and at
//!    the end
//!
//! # Architecture
//!
//! ```text
//! TrainingConfig ──► Trainer
//!                      │ spawns
//!                      ├─► workers (self_play) ──► ResultQueue
//!                      └─► updater ◄────────────────────┘
//!                            │ uses
//!                            ├─► LearningRateSchedule
//!                            └─► PromotionPolicy
//! ```
//!
//! - [`config`] - [`TrainingConfig`] and its validation
//! - [`schedule`] - Inverse-square learning-rate decay
//! - [`self_play`] - Playing and recording one game
//! - [`queue`] - Worker-to-updater FIFO
//! - [`shared`] - Learner lock, opponent snapshot, learner color
//! - [`promotion`] - Rolling win rate, promotions, role swaps
//! - [`trainer`] - The orchestration
//!
//! # Example
//!
//! ```no_run
//! use contrast_training::{OpponentKind, Trainer, TrainingConfig};
//!
//! let config = TrainingConfig {
//!     num_games: 10_000,
//!     opponent: OpponentKind::Snapshot,
//!     save_path: "weights/ntuple.bin".into(),
//!     ..TrainingConfig::default()
//! };
//! let mut trainer = Trainer::new(config)?;
//! let summary = trainer.run()?;
//! println!("{summary}");
//! # Ok::<(), contrast_training::TrainError>(())
//! ```
//!
//! # Current Limitations
//!
//! - Workers read the learner through the same lock the updater writes
//!   through, so evaluation does not scale with the worker count
//! - The order in which games are learned depends on thread timing; runs
//!   with the same seed are not bit-for-bit reproducible with more than one
//!   worker

pub use self::{
    config::{ConfigError, OpponentKind, TrainingConfig},
    promotion::{Decision, PromotionPolicy},
    schedule::LearningRateSchedule,
    self_play::Trajectory,
    summary::TrainingSummary,
    trainer::{TrainError, Trainer, checkpoint_path},
};

pub mod config;
pub mod promotion;
pub mod queue;
pub mod schedule;
pub mod self_play;
pub mod shared;
pub mod summary;
pub mod trainer;
