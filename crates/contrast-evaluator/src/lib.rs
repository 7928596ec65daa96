//! Position evaluation and move selection for Contrast.
//!
//! # Architecture
//!
//! ```text
//! Policies (choose a move)
//!     ↓ use
//! Evaluate (score a position for the player to move)
//!     ↑ implemented by
//! NTupleNetwork (sum of pattern weights)
//!     ↓ built from
//! NTuple patterns (state → table index)
//! ```
//!
//! - [`ntuple`] - Pattern definitions and the state-to-index encoding
//! - [`pattern_set`] - Predefined pattern families
//! - [`network`] - The value network: evaluation, TD(0) update, weight files
//! - [`evaluate`] - The [`Evaluate`] trait shared by policies and search
//! - [`policy`] - Random, greedy, rule-based and network-driven players
//! - [`arena`] - Playing policies against each other
//!
//! # Example
//!
//! ```
//! use contrast_engine::GameState;
//! use contrast_evaluator::{NTupleNetwork, PatternSet};
//!
//! let mut network = NTupleNetwork::with_pattern_set(PatternSet::Compact);
//! let state = GameState::new();
//!
//! let before = network.evaluate(&state);
//! network.td_update(&state, 1.0, 0.1);
//! assert!(network.evaluate(&state) > before);
//! ```
//!
//! # Symmetry
//!
//! Boards are canonicalized under the left-right mirror before indexing, so
//! mirrored positions share weights. The evaluation is stored from Black's
//! point of view and negated when White is to move.

pub use self::{
    evaluate::Evaluate,
    network::{LoadError, NTupleNetwork, SaveError},
    pattern_set::PatternSet,
    policy::{AnyPolicy, GreedyPolicy, NTuplePolicy, Policy, PolicyKind, RandomPolicy, RuleBasedPolicy},
};

pub mod arena;
pub mod evaluate;
pub mod network;
pub mod ntuple;
pub mod pattern_set;
pub mod policy;
