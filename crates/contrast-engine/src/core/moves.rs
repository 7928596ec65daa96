use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Position, TileType};

/// A tile laid down as part of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    pub pos: Position,
    /// Always [`TileType::Black`] or [`TileType::Gray`].
    pub tile: TileType,
}

/// A piece relocation plus an optional tile placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub placement: Option<TilePlacement>,
}

impl Move {
    /// A relocation without tile placement.
    #[must_use]
    pub const fn step(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            placement: None,
        }
    }

    #[must_use]
    pub const fn with_placement(self, pos: Position, tile: TileType) -> Self {
        Self {
            placement: Some(TilePlacement { pos, tile }),
            ..self
        }
    }

    #[must_use]
    pub const fn places_tile(&self) -> bool {
        self.placement.is_some()
    }
}

/// `(sx,sy)->(dx,dy)`, followed by ` black@(tx,ty)` / ` gray@(tx,ty)` when a
/// tile is placed.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)?;
        if let Some(TilePlacement { pos, tile }) = self.placement {
            let name = match tile {
                TileType::Black => "black",
                TileType::Gray => "gray",
                TileType::None => "none",
            };
            write!(f, " {name}@{pos}")?;
        }
        Ok(())
    }
}

pub type MoveList = Vec<Move>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mv = Move::step(Position::new(2, 2), Position::new(2, 4));
        assert_eq!(mv.to_string(), "(2,2)->(2,4)");
        let mv = mv.with_placement(Position::new(0, 1), TileType::Gray);
        assert!(mv.places_tile());
        assert_eq!(mv.to_string(), "(2,2)->(2,4) gray@(0,1)");
    }

    #[test]
    fn test_serde() {
        let mv = Move::step(Position::new(1, 0), Position::new(1, 1))
            .with_placement(Position::new(3, 3), TileType::Black);
        let json = serde_json::to_string(&mv).unwrap();
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);
    }
}
