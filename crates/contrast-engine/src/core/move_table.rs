//! Precomputed movement rays.
//!
//! For every tile type and origin cell, the table lists the directions a piece
//! standing there may move in, and for each direction the relative offsets of
//! the cells along that ray, nearest first, stopping at the board edge.
//!
//! The table depends only on the board geometry. [`MoveTable::build`] derives
//! it for any `width × height`; the table for the standard board is built once
//! on first use and shared through [`MoveTable::standard`].

use std::sync::LazyLock;

use arrayvec::ArrayVec;

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    board::{Position, TileType},
};

/// Longest ray any supported geometry can produce.
pub const MAX_RAY_LEN: usize = 15;

/// Largest supported board side.
pub const MAX_BOARD_SIDE: usize = MAX_RAY_LEN + 1;

/// One of the eight compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ORTHOGONAL: [Self; 4] = [Self::South, Self::North, Self::East, Self::West];
    pub const DIAGONAL: [Self; 4] = [
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthEast,
        Self::NorthWest,
    ];
    pub const ALL: [Self; 8] = [
        Self::South,
        Self::North,
        Self::East,
        Self::West,
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthEast,
        Self::NorthWest,
    ];

    /// Unit step `(dx, dy)`. `y` grows towards the south.
    #[must_use]
    pub const fn step(self) -> (i8, i8) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::NorthEast => (1, -1),
            Self::NorthWest => (-1, -1),
            Self::SouthEast => (1, 1),
            Self::SouthWest => (-1, 1),
        }
    }

    /// Directions available to a piece standing on `tile`.
    #[must_use]
    pub const fn for_tile(tile: TileType) -> &'static [Self] {
        match tile {
            TileType::None => &Self::ORTHOGONAL,
            TileType::Black => &Self::DIAGONAL,
            TileType::Gray => &Self::ALL,
        }
    }
}

/// Offset of a cell relative to a ray's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i8,
    pub dy: i8,
}

impl Offset {
    /// Applies the offset to `pos`.
    ///
    /// Rays never leave the board they were built for, so this only returns
    /// `None` when an offset is used on a different geometry.
    #[must_use]
    pub fn apply(self, pos: Position) -> Option<Position> {
        let x = pos.x.checked_add_signed(self.dx)?;
        let y = pos.y.checked_add_signed(self.dy)?;
        let pos = Position::new(x, y);
        pos.is_on_board().then_some(pos)
    }
}

/// Cells along one direction, nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ray {
    direction: Direction,
    offsets: ArrayVec<Offset, MAX_RAY_LEN>,
}

impl Ray {
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Rays for one `(tile type, origin)` pair. Rays that would be empty
/// (origin on the edge in that direction) are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveTableEntry {
    rays: ArrayVec<Ray, 8>,
}

impl MoveTableEntry {
    #[must_use]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTable {
    width: usize,
    height: usize,
    entries: Vec<MoveTableEntry>,
}

static STANDARD: LazyLock<MoveTable> = LazyLock::new(|| MoveTable::build(BOARD_WIDTH, BOARD_HEIGHT));

impl MoveTable {
    /// Table for the standard 5×5 board, built on first use.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Builds the table for a `width × height` board.
    ///
    /// # Panics
    ///
    /// Panics if either side is zero or larger than [`MAX_BOARD_SIDE`].
    ///
    /// # Example
    ///
    /// ```
    /// use contrast_engine::{MoveTable, TileType};
    ///
    /// let table = MoveTable::build(3, 3);
    /// // The centre of a 3×3 board reaches one cell in each of the 8 directions.
    /// let entry = table.entry(TileType::Gray, 1, 1);
    /// assert_eq!(entry.rays().len(), 8);
    /// assert!(entry.rays().iter().all(|ray| ray.len() == 1));
    /// ```
    #[must_use]
    pub fn build(width: usize, height: usize) -> Self {
        assert!(
            (1..=MAX_BOARD_SIDE).contains(&width) && (1..=MAX_BOARD_SIDE).contains(&height),
            "unsupported board geometry {width}x{height}"
        );

        let mut entries = Vec::with_capacity(TileType::LEN * width * height);
        for tile in TileType::ALL {
            for y in 0..height {
                for x in 0..width {
                    entries.push(Self::build_entry(width, height, tile, x, y));
                }
            }
        }
        Self {
            width,
            height,
            entries,
        }
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn build_entry(width: usize, height: usize, tile: TileType, x: usize, y: usize) -> MoveTableEntry {
        let mut rays = ArrayVec::new();
        for &direction in Direction::for_tile(tile) {
            let (sx, sy) = direction.step();
            let mut offsets = ArrayVec::new();
            for dist in 1..=MAX_RAY_LEN as i8 {
                let (dx, dy) = (sx * dist, sy * dist);
                let nx = x as isize + isize::from(dx);
                let ny = y as isize + isize::from(dy);
                if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                    break;
                }
                offsets.push(Offset { dx, dy });
            }
            if !offsets.is_empty() {
                rays.push(Ray { direction, offsets });
            }
        }
        MoveTableEntry { rays }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rays for a piece at `(x, y)` standing on `tile`.
    #[must_use]
    pub fn entry(&self, tile: TileType, x: usize, y: usize) -> &MoveTableEntry {
        assert!(x < self.width && y < self.height);
        &self.entries[(tile.index() * self.height + y) * self.width + x]
    }
}
