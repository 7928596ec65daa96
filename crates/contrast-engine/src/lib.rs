//! Rules engine for Contrast, a two-player game on a 5×5 board.
//!
//! Each player starts with a row of five pieces and wins by bringing one of
//! them to the opposite row. Pieces move one step, or jump over a contiguous
//! run of their own pieces; opponents block. The tile under a piece decides
//! its directions (orthogonal, diagonal, or both), and a player may lay one
//! of their limited tiles as part of each move.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
