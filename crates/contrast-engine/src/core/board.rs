use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_WIDTH, CELL_COUNT};

/// One of the two sides.
///
/// Black moves first and starts on row 0; White starts on the last row.
/// Each side wins by reaching the other side's home row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const ALL: [Self; 2] = [Self::Black, Self::White];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Index into per-player arrays (`Black = 0`, `White = 1`).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Black => 0,
            Self::White => 1,
        }
    }

    /// Row where this player's pieces start.
    #[must_use]
    pub const fn home_row(self) -> usize {
        match self {
            Self::Black => 0,
            Self::White => BOARD_HEIGHT - 1,
        }
    }

    /// Row this player must reach to win (the opponent's home row).
    #[must_use]
    pub const fn goal_row(self) -> usize {
        self.opponent().home_row()
    }

    /// Number of rows between `y` and this player's goal row.
    #[must_use]
    pub const fn distance_to_goal(self, y: usize) -> usize {
        self.goal_row().abs_diff(y)
    }
}

/// Terrain placed on a cell.
///
/// The tile under a piece decides which directions the piece may move in:
/// no tile gives the four orthogonal directions, a black tile the four
/// diagonals, and a gray tile all eight.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum TileType {
    #[default]
    None,
    Black,
    Gray,
}

impl TileType {
    pub const ALL: [Self; 3] = [Self::None, Self::Black, Self::Gray];
    pub const LEN: usize = Self::ALL.len();

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::None => 0,
            Self::Black => 1,
            Self::Gray => 2,
        }
    }
}

/// A board square: an optional piece standing on an optional tile.
///
/// Occupant and tile are independent. A tile is never removed once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub occupant: Option<Player>,
    pub tile: TileType,
}

impl Cell {
    pub const EMPTY: Self = Self {
        occupant: None,
        tile: TileType::None,
    };

    /// Number of distinct cell states.
    pub const STATES: usize = 9;

    /// Returns `true` if the cell has neither a piece nor a tile.
    #[must_use]
    pub fn is_vacant(self) -> bool {
        self.occupant.is_none() && self.tile.is_none()
    }

    /// Dense code in `0..9`: `occupant * 3 + tile`, where the occupant is
    /// `0` (empty), `1` (Black) or `2` (White).
    #[must_use]
    pub const fn code(self) -> usize {
        let occupant = match self.occupant {
            None => 0,
            Some(Player::Black) => 1,
            Some(Player::White) => 2,
        };
        occupant * TileType::LEN + self.tile.index()
    }
}

/// Board coordinates. `x` grows to the right, `y` grows towards White's home row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("({x},{y})")]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Builds a position from a row-major cell index.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index < CELL_COUNT);
        Self {
            x: (index % BOARD_WIDTH) as u8,
            y: (index / BOARD_WIDTH) as u8,
        }
    }

    /// Row-major cell index (`y * width + x`).
    #[must_use]
    pub const fn index(self) -> usize {
        self.y as usize * BOARD_WIDTH + self.x as usize
    }

    #[must_use]
    pub const fn is_on_board(self) -> bool {
        (self.x as usize) < BOARD_WIDTH && (self.y as usize) < BOARD_HEIGHT
    }
}

/// The 5×5 playing field.
///
/// Cells are stored row-major. Boards are small `Copy` values, so snapshots
/// taken for training trajectories are plain copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        cells: [Cell::EMPTY; CELL_COUNT],
    };

    /// Standard setup: a full row of pieces on each player's home row, no tiles.
    #[must_use]
    pub fn initial() -> Self {
        let mut board = Self::EMPTY;
        for player in Player::ALL {
            let y = player.home_row();
            for x in 0..BOARD_WIDTH {
                board.cells[y * BOARD_WIDTH + x].occupant = Some(player);
            }
        }
        board
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        BOARD_WIDTH
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    /// Returns the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board.
    #[must_use]
    pub fn at(&self, x: usize, y: usize) -> Cell {
        assert!(x < BOARD_WIDTH && y < BOARD_HEIGHT, "({x},{y}) is off the board");
        self.cells[y * BOARD_WIDTH + x]
    }

    /// Mutable access to the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board.
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        assert!(x < BOARD_WIDTH && y < BOARD_HEIGHT, "({x},{y}) is off the board");
        &mut self.cells[y * BOARD_WIDTH + x]
    }

    /// Like [`Self::at`], but returns `None` for coordinates outside the board.
    #[must_use]
    pub fn get(&self, x: isize, y: isize) -> Option<Cell> {
        let x = usize::try_from(x).ok().filter(|x| *x < BOARD_WIDTH)?;
        let y = usize::try_from(y).ok().filter(|y| *y < BOARD_HEIGHT)?;
        Some(self.cells[y * BOARD_WIDTH + x])
    }

    #[must_use]
    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        &mut self.cells[pos.index()]
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Positions of every piece owned by `player`, in row-major order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| cell.occupant == Some(player))
            .map(|(i, _)| Position::from_index(i))
    }

    /// Positions with neither a piece nor a tile, in row-major order.
    pub fn vacant_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_vacant())
            .map(|(i, _)| Position::from_index(i))
    }

    /// Removes every piece and tile.
    pub fn clear(&mut self) {
        self.cells = [Cell::EMPTY; CELL_COUNT];
    }
}

/// Renders one row per line. Pieces are `B`/`W`, empty squares `.`; a tile
/// is shown as a suffix (`*` black, `+` gray).
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                let cell = self.at(x, y);
                let piece = match cell.occupant {
                    Some(Player::Black) => 'B',
                    Some(Player::White) => 'W',
                    None => '.',
                };
                let tile = match cell.tile {
                    TileType::None => ' ',
                    TileType::Black => '*',
                    TileType::Gray => '+',
                };
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{piece}{tile}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();
        for x in 0..BOARD_WIDTH {
            assert_eq!(board.at(x, 0).occupant, Some(Player::Black));
            assert_eq!(board.at(x, BOARD_HEIGHT - 1).occupant, Some(Player::White));
            assert_eq!(board.at(x, 0).tile, TileType::None);
        }
        for y in 1..BOARD_HEIGHT - 1 {
            for x in 0..BOARD_WIDTH {
                assert!(board.at(x, y).is_vacant(), "({x},{y}) should be vacant");
            }
        }
    }

    #[test]
    fn test_goal_rows() {
        assert_eq!(Player::Black.goal_row(), BOARD_HEIGHT - 1);
        assert_eq!(Player::White.goal_row(), 0);
        assert_eq!(Player::Black.distance_to_goal(1), BOARD_HEIGHT - 2);
        assert_eq!(Player::White.distance_to_goal(1), 1);
    }

    #[test]
    fn test_position_index_round_trip() {
        for i in 0..CELL_COUNT {
            let pos = Position::from_index(i);
            assert!(pos.is_on_board());
            assert_eq!(pos.index(), i);
        }
        assert_eq!(Position::new(2, 3).index(), 3 * BOARD_WIDTH + 2);
    }

    #[test]
    fn test_get_outside_board() {
        let board = Board::initial();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, BOARD_HEIGHT.cast_signed()), None);
        assert_eq!(
            board.get(0, 0).and_then(|c| c.occupant),
            Some(Player::Black)
        );
    }

    #[test]
    fn test_occupant_and_tile_are_independent() {
        let mut board = Board::EMPTY;
        let cell = board.at_mut(1, 1);
        cell.tile = TileType::Gray;
        cell.occupant = Some(Player::White);
        let cell = board.at(1, 1);
        assert_eq!(cell.tile, TileType::Gray);
        assert_eq!(cell.occupant, Some(Player::White));
        assert!(!cell.is_vacant());
    }

    #[test]
    fn test_cell_code() {
        assert_eq!(Cell::EMPTY.code(), 0);
        let black_on_black = Cell {
            occupant: Some(Player::Black),
            tile: TileType::Black,
        };
        assert_eq!(black_on_black.code(), 4);
        let white_on_gray = Cell {
            occupant: Some(Player::White),
            tile: TileType::Gray,
        };
        assert_eq!(white_on_gray.code(), Cell::STATES - 1);
    }

    #[test]
    fn test_display() {
        let mut board = Board::initial();
        board.at_mut(2, 2).tile = TileType::Black;
        board.at_mut(0, 2).tile = TileType::Gray;
        let text = board.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), BOARD_HEIGHT);
        assert_eq!(lines[0], "B  B  B  B  B ");
        assert_eq!(lines[2], ".+ .  .* .  . ");
        assert_eq!(lines[4], "W  W  W  W  W ");
    }
}
