//! Board symmetries.
//!
//! Movement is not invariant under rotation or vertical reflection (the two
//! players advance in opposite directions), so the group is just the identity
//! and the left-right mirror. Tile inventories are unaffected.

use super::{BOARD_WIDTH, board::Board};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum Symmetry {
    #[default]
    Identity,
    /// `(x, y) -> (W - 1 - x, y)`.
    MirrorHorizontal,
}

impl Symmetry {
    pub const ALL: [Self; 2] = [Self::Identity, Self::MirrorHorizontal];

    /// Applies this symmetry to `board`.
    #[must_use]
    pub fn transform(self, board: &Board) -> Board {
        match self {
            Self::Identity => *board,
            Self::MirrorHorizontal => {
                let mut out = Board::EMPTY;
                for y in 0..board.height() {
                    for x in 0..BOARD_WIDTH {
                        *out.at_mut(BOARD_WIDTH - 1 - x, y) = board.at(x, y);
                    }
                }
                out
            }
        }
    }

    /// The symmetry whose image of `board` is smallest when the cells are
    /// compared by [`Cell::code`](super::board::Cell::code) in row-major order.
    ///
    /// Ties (a board equal to its own mirror) resolve to [`Self::Identity`].
    #[must_use]
    pub fn canonical_for(board: &Board) -> Self {
        let mirrored = Self::MirrorHorizontal.transform(board);
        let codes = |b: &Board| b.cells().map(super::board::Cell::code);
        if codes(&mirrored) < codes(board) {
            Self::MirrorHorizontal
        } else {
            Self::Identity
        }
    }
}

/// Maps `board` to its canonical representative.
///
/// # Example
///
/// ```
/// use contrast_engine::{Board, Player, Symmetry, canonicalize};
///
/// let mut board = Board::EMPTY;
/// board.at_mut(0, 2).occupant = Some(Player::Black);
/// let mirrored = Symmetry::MirrorHorizontal.transform(&board);
///
/// assert_eq!(canonicalize(&board), canonicalize(&mirrored));
/// ```
#[must_use]
pub fn canonicalize(board: &Board) -> Board {
    Symmetry::canonical_for(board).transform(board)
}
