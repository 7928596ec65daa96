//! Game state and rules.
//!
//! - [`GameState`] - Board, side to move and tile inventories
//! - [`TileInventory`] - Tiles a player may still place
//! - [`Outcome`] - How a finished game was decided
//! - [`legal_moves`] / [`legal_moves_for`] - Move generation
//! - [`is_win`] / [`is_loss`] - Terminal checks
//!
//! # Game Flow
//!
//! 1. Start from [`GameState::new`]
//! 2. Generate the mover's moves with [`legal_moves`]
//! 3. Play one with [`GameState::apply_move`]; the turn passes
//! 4. Repeat until [`GameState::outcome`] returns `Some`
//!
//! # Example
//!
//! ```
//! use contrast_engine::{GameState, legal_moves};
//!
//! let mut state = GameState::new();
//! let mut plies = 0;
//! while state.outcome().is_none() && plies < 100 {
//!     let moves = legal_moves(&state);
//!     state.apply_move(&moves[0]);
//!     plies += 1;
//! }
//! ```

pub use self::{game_state::*, rules::*};

mod game_state;
mod rules;
