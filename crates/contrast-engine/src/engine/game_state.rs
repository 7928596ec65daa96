use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    board::{Board, Player, TileType},
    moves::Move,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("tile inventory {black} black / {gray} gray exceeds the 3 / 1 limit")]
pub struct InventoryOverflowError {
    black: u8,
    gray: u8,
}

/// Tiles a player still holds. Counts only ever go down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileInventory {
    black: u8,
    gray: u8,
}

impl Default for TileInventory {
    fn default() -> Self {
        Self::FULL
    }
}

impl TileInventory {
    pub const MAX_BLACK: u8 = 3;
    pub const MAX_GRAY: u8 = 1;

    pub const FULL: Self = Self {
        black: Self::MAX_BLACK,
        gray: Self::MAX_GRAY,
    };
    pub const EMPTY: Self = Self { black: 0, gray: 0 };

    pub fn new(black: u8, gray: u8) -> Result<Self, InventoryOverflowError> {
        if black > Self::MAX_BLACK || gray > Self::MAX_GRAY {
            return Err(InventoryOverflowError { black, gray });
        }
        Ok(Self { black, gray })
    }

    #[must_use]
    pub const fn black(&self) -> u8 {
        self.black
    }

    #[must_use]
    pub const fn gray(&self) -> u8 {
        self.gray
    }

    /// Remaining tiles of the given kind. [`TileType::None`] is never held.
    #[must_use]
    pub const fn count(&self, tile: TileType) -> u8 {
        match tile {
            TileType::None => 0,
            TileType::Black => self.black,
            TileType::Gray => self.gray,
        }
    }

    #[must_use]
    pub const fn has(&self, tile: TileType) -> bool {
        self.count(tile) > 0
    }

    /// Removes one tile of the given kind. Returns `false` (and leaves the
    /// inventory unchanged) if none is left.
    pub fn take(&mut self, tile: TileType) -> bool {
        let slot = match tile {
            TileType::None => return false,
            TileType::Black => &mut self.black,
            TileType::Gray => &mut self.gray,
        };
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}

/// How a finished game was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Outcome {
    /// The player has a piece on their goal row.
    GoalReached(Player),
    /// The player to move has no legal move and loses.
    NoMoves(Player),
}

impl Outcome {
    #[must_use]
    pub const fn winner(self) -> Player {
        match self {
            Self::GoalReached(player) => player,
            Self::NoMoves(player) => player.opponent(),
        }
    }

    #[must_use]
    pub const fn loser(self) -> Player {
        self.winner().opponent()
    }
}

/// Board, side to move and both tile inventories.
///
/// # Example
///
/// ```
/// use contrast_engine::{GameState, Player, legal_moves};
///
/// let mut state = GameState::new();
/// assert_eq!(state.current_player(), Player::Black);
///
/// let moves = legal_moves(&state);
/// state.apply_move(&moves[0]);
/// assert_eq!(state.current_player(), Player::White);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Player,
    inventories: [TileInventory; 2],
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard opening position with Black to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::initial(),
            current_player: Player::Black,
            inventories: [TileInventory::FULL; 2],
        }
    }

    /// Empty board with full inventories, for setting up arbitrary positions.
    #[must_use]
    pub fn empty(to_move: Player) -> Self {
        Self {
            board: Board::EMPTY,
            current_player: to_move,
            inventories: [TileInventory::FULL; 2],
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn set_current_player(&mut self, player: Player) {
        self.current_player = player;
    }

    #[must_use]
    pub fn inventory(&self, player: Player) -> &TileInventory {
        &self.inventories[player.index()]
    }

    pub fn inventory_mut(&mut self, player: Player) -> &mut TileInventory {
        &mut self.inventories[player.index()]
    }

    /// Plays `mv` for the player to move and passes the turn.
    ///
    /// The move is not checked for legality; callers take it from
    /// [`legal_moves`](crate::legal_moves). A tile is only placed if the mover
    /// still holds one of that kind.
    pub fn apply_move(&mut self, mv: &Move) {
        let mover = self.current_player;
        let piece = self.board.cell(mv.from).occupant;
        self.board.cell_mut(mv.from).occupant = None;
        self.board.cell_mut(mv.to).occupant = piece;

        if let Some(placement) = mv.placement {
            if self.inventories[mover.index()].take(placement.tile) {
                self.board.cell_mut(placement.pos).tile = placement.tile;
            }
        }

        self.current_player = mover.opponent();
    }

    /// Returns a copy of the state after `mv`.
    #[must_use]
    pub fn after(&self, mv: &Move) -> Self {
        let mut next = *self;
        next.apply_move(mv);
        next
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        for player in Player::ALL {
            let inv = self.inventory(player);
            writeln!(f, "{player}: black={} gray={}", inv.black, inv.gray)?;
        }
        writeln!(f, "to move: {}", self.current_player)
    }
}
