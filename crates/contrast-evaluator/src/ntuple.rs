//! N-tuple patterns and state encoding.
//!
//! A pattern is an ordered list of cell offsets. Its index for a given state
//! reads the cells as digits of a base-9 number (one digit per
//! [`Cell::code`]) and appends both players' tile inventories:
//!
//! ```text
//! index = board_digits * 64 + inventory_index
//! inventory_index = encode(black player) * 8 + encode(white player)
//! encode(inv) = black_tiles + gray_tiles * 4
//! ```
//!
//! Offsets that fall outside the board read as an empty cell (digit `0`).

use contrast_engine::{Board, CELL_COUNT, Cell, GameState, Player, TileInventory};

/// Number of distinct tile-inventory combinations for both players.
pub const INVENTORY_STATES: usize = 64;

/// Largest weight table a single pattern may need.
pub const MAX_PATTERN_STATES: usize = 1 << 27;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PatternError {
    #[display("pattern has no cells")]
    Empty,
    #[display("pattern has {cells} cells, the board only has {}", CELL_COUNT)]
    TooManyCells { cells: usize },
    #[display("pattern lists cell ({dx},{dy}) twice")]
    DuplicateCell { dx: i8, dy: i8 },
    #[display("pattern with {cells} cells needs more than {} weights", MAX_PATTERN_STATES)]
    TooLarge { cells: usize },
}

/// One pattern: an ordered list of `(dx, dy)` offsets from an anchor cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NTuple {
    offsets: Vec<(i8, i8)>,
    num_states: usize,
}

impl NTuple {
    /// Builds a pattern from offsets, validating that its weight table is
    /// addressable.
    ///
    /// # Example
    ///
    /// ```
    /// use contrast_evaluator::ntuple::NTuple;
    ///
    /// let square = NTuple::new(vec![(0, 0), (1, 0), (0, 1), (1, 1)]).unwrap();
    /// assert_eq!(square.num_states(), 9usize.pow(4) * 64);
    /// ```
    pub fn new(offsets: Vec<(i8, i8)>) -> Result<Self, PatternError> {
        if offsets.is_empty() {
            return Err(PatternError::Empty);
        }
        if offsets.len() > CELL_COUNT {
            return Err(PatternError::TooManyCells { cells: offsets.len() });
        }
        for (i, off) in offsets.iter().enumerate() {
            if offsets[..i].contains(off) {
                return Err(PatternError::DuplicateCell { dx: off.0, dy: off.1 });
            }
        }
        let num_states = u32::try_from(offsets.len())
            .ok()
            .and_then(|n| Cell::STATES.checked_pow(n))
            .and_then(|n| n.checked_mul(INVENTORY_STATES))
            .filter(|n| *n <= MAX_PATTERN_STATES)
            .ok_or(PatternError::TooLarge { cells: offsets.len() })?;
        Ok(Self { offsets, num_states })
    }

    #[must_use]
    pub fn offsets(&self) -> &[(i8, i8)] {
        &self.offsets
    }

    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.offsets.len()
    }

    /// Size of this pattern's weight table: `9^cells * 64`.
    #[must_use]
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Digits of the cells under the pattern anchored at `(ax, ay)`.
    #[must_use]
    pub fn board_index(&self, board: &Board, ax: isize, ay: isize) -> usize {
        self.offsets.iter().fold(0, |idx, &(dx, dy)| {
            let cell = board
                .get(ax + isize::from(dx), ay + isize::from(dy))
                .unwrap_or(Cell::EMPTY);
            idx * Cell::STATES + cell.code()
        })
    }

    /// Full table index for `board` with pre-encoded inventories.
    #[must_use]
    pub fn index(&self, board: &Board, inventory_index: usize) -> usize {
        self.index_at(board, 0, 0, inventory_index)
    }

    /// Like [`Self::index`] with the pattern anchored at `(ax, ay)`.
    #[must_use]
    pub fn index_at(&self, board: &Board, ax: isize, ay: isize, inventory_index: usize) -> usize {
        debug_assert!(inventory_index < INVENTORY_STATES);
        self.board_index(board, ax, ay) * INVENTORY_STATES + inventory_index
    }
}

/// `black + gray * 4`, in `0..8`.
#[must_use]
pub fn encode_inventory(inventory: &TileInventory) -> usize {
    usize::from(inventory.black()) + usize::from(inventory.gray()) * 4
}

/// Both players' inventories combined into `0..64`.
#[must_use]
pub fn inventory_index(state: &GameState) -> usize {
    encode_inventory(state.inventory(Player::Black)) * 8 + encode_inventory(state.inventory(Player::White))
}

#[cfg(test)]
mod tests {
    use contrast_engine::TileType;

    use super::*;

    #[test]
    fn test_pattern_validation() {
        assert_eq!(NTuple::new(vec![]), Err(PatternError::Empty));
        assert_eq!(
            NTuple::new(vec![(0, 0), (1, 0), (0, 0)]),
            Err(PatternError::DuplicateCell { dx: 0, dy: 0 })
        );
        let nine: Vec<_> = (0..3).flat_map(|y| (0..3).map(move |x| (x, y))).collect();
        assert_eq!(NTuple::new(nine), Err(PatternError::TooLarge { cells: 9 }));
        let too_many: Vec<_> = (0..26).map(|i| (i, 0)).collect();
        assert_eq!(NTuple::new(too_many), Err(PatternError::TooManyCells { cells: 26 }));
    }

    #[test]
    fn test_inventory_encoding() {
        let state = GameState::new();
        assert_eq!(encode_inventory(&TileInventory::FULL), 7);
        assert_eq!(encode_inventory(&TileInventory::EMPTY), 0);
        assert_eq!(inventory_index(&state), 63);

        let mut state = GameState::new();
        *state.inventory_mut(Player::Black) = TileInventory::new(2, 0).unwrap();
        *state.inventory_mut(Player::White) = TileInventory::new(0, 1).unwrap();
        assert_eq!(inventory_index(&state), 2 * 8 + 4);
    }

    #[test]
    fn test_index_digits() {
        let mut board = Board::EMPTY;
        board.at_mut(0, 0).occupant = Some(Player::Black);
        board.at_mut(1, 0).tile = TileType::Gray;
        let tuple = NTuple::new(vec![(0, 0), (1, 0)]).unwrap();
        // digits: black/no tile = 3, empty/gray = 2
        assert_eq!(tuple.board_index(&board, 0, 0), 3 * 9 + 2);
        assert_eq!(tuple.index(&board, 5), (3 * 9 + 2) * 64 + 5);
    }

    #[test]
    fn test_out_of_board_reads_empty() {
        let mut board = Board::EMPTY;
        board.at_mut(4, 4).occupant = Some(Player::White);
        let tuple = NTuple::new(vec![(0, 0), (1, 0), (0, 1)]).unwrap();
        assert_eq!(tuple.board_index(&board, 4, 4), 6 * 81);
        assert_eq!(tuple.board_index(&board, -1, -1), 0);
    }

    #[test]
    fn test_index_in_range() {
        let tuple = NTuple::new(vec![(0, 0), (1, 1), (2, 2)]).unwrap();
        let mut board = Board::EMPTY;
        for i in 0..3 {
            *board.at_mut(i, i) = Cell {
                occupant: Some(Player::White),
                tile: TileType::Gray,
            };
        }
        assert_eq!(tuple.index(&board, 63), tuple.num_states() - 1);
    }
}
