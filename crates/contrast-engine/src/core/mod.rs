pub use self::{board::*, move_table::*, moves::*, symmetry::*};

pub(crate) mod board;
pub(crate) mod move_table;
pub(crate) mod moves;
pub(crate) mod symmetry;

pub const BOARD_WIDTH: usize = 5;
pub const BOARD_HEIGHT: usize = 5;
pub const CELL_COUNT: usize = BOARD_WIDTH * BOARD_HEIGHT;
