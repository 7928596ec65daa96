use contrast_engine::{BOARD_HEIGHT, BOARD_WIDTH};
use serde::{Deserialize, Serialize};

use crate::ntuple::NTuple;

/// Predefined pattern families.
///
/// Parsed case-insensitively from the variant name (`"compact"`, `"lines"`).
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum PatternSet {
    /// Every 2×2 window on the board (16 patterns, 419,904 weights each).
    #[default]
    Compact,
    /// Each full row and each full column (10 patterns, 3,779,136 weights each).
    Lines,
}

impl PatternSet {
    /// Offsets of every pattern in the family, anchored at the board origin.
    #[must_use]
    pub fn offsets(self) -> Vec<Vec<(i8, i8)>> {
        match self {
            Self::Compact => (0..BOARD_HEIGHT - 1)
                .flat_map(|y| (0..BOARD_WIDTH - 1).map(move |x| (coord(x), coord(y))))
                .map(|(x, y)| vec![(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)])
                .collect(),
            Self::Lines => {
                let rows = (0..BOARD_HEIGHT)
                    .map(|y| (0..BOARD_WIDTH).map(|x| (coord(x), coord(y))).collect::<Vec<_>>());
                let cols = (0..BOARD_WIDTH)
                    .map(|x| (0..BOARD_HEIGHT).map(|y| (coord(x), coord(y))).collect::<Vec<_>>());
                rows.chain(cols).collect()
            }
        }
    }

    #[must_use]
    pub fn tuples(self) -> Vec<NTuple> {
        self.offsets()
            .into_iter()
            .map(|offsets| NTuple::new(offsets).unwrap_or_else(|e| unreachable!("{self} pattern is invalid: {e}")))
            .collect()
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn coord(v: usize) -> i8 {
    v as i8
}
