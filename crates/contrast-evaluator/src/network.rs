//! The N-tuple value network.
//!
//! [`NTupleNetwork`] approximates the value of a position as the sum, over
//! all patterns, of the weight selected by the pattern's index. Values are
//! stored from Black's point of view and flipped for White, so
//! [`NTupleNetwork::evaluate`] always answers "how good is this for the player
//! to move".
//!
//! # Weight File
//!
//! Little-endian, no header:
//!
//! ```text
//! u64 pattern_count
//! repeat pattern_count times:
//!     u64 weight_count
//!     f32 × weight_count
//! ```
//!
//! Loading checks the file against the network's own patterns and leaves the
//! network untouched on any failure.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use contrast_engine::{GameState, Player, canonicalize};

use crate::{
    evaluate::Evaluate,
    ntuple::{NTuple, inventory_index},
    pattern_set::PatternSet,
};

/// Total value of a fresh network. Each weight starts at this divided by the
/// pattern count, so an untrained network slightly favors Black.
pub const INITIAL_VALUE: f32 = 0.5;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("weight file {} does not exist", path.display())]
    NotFound { path: PathBuf },
    #[display("failed to read weights")]
    Io(io::Error),
    #[display("weight data ends unexpectedly")]
    Truncated,
    #[display("weight file has {found} patterns, network has {expected}")]
    PatternCountMismatch { expected: usize, found: u64 },
    #[display("pattern #{pattern} has {found} weights in the file, network expects {expected}")]
    WeightCountMismatch { pattern: usize, expected: usize, found: u64 },
}

impl LoadError {
    fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated
        } else {
            Self::Io(err)
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to write weights to {}", path.display())]
pub struct SaveError {
    path: PathBuf,
    source: io::Error,
}

impl SaveError {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NTupleNetwork {
    tuples: Vec<NTuple>,
    weights: Vec<Vec<f32>>,
}

impl Default for NTupleNetwork {
    fn default() -> Self {
        Self::with_pattern_set(PatternSet::default())
    }
}

impl NTupleNetwork {
    /// Creates a network with one weight table per pattern, every weight set
    /// to `INITIAL_VALUE / tuples.len()`.
    ///
    /// # Example
    ///
    /// ```
    /// use contrast_engine::GameState;
    /// use contrast_evaluator::{NTupleNetwork, ntuple::NTuple};
    ///
    /// let tuples = vec![
    ///     NTuple::new(vec![(0, 0), (1, 0)]).unwrap(),
    ///     NTuple::new(vec![(0, 4), (1, 4)]).unwrap(),
    /// ];
    /// let network = NTupleNetwork::new(tuples);
    /// assert_eq!(network.num_tuples(), 2);
    /// assert!((network.evaluate(&GameState::new()) - 0.5).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn new(tuples: Vec<NTuple>) -> Self {
        #[expect(clippy::cast_precision_loss)]
        let initial = if tuples.is_empty() {
            0.0
        } else {
            INITIAL_VALUE / tuples.len() as f32
        };
        let weights = tuples.iter().map(|t| vec![initial; t.num_states()]).collect();
        Self { tuples, weights }
    }

    #[must_use]
    pub fn with_pattern_set(set: PatternSet) -> Self {
        Self::new(set.tuples())
    }

    #[must_use]
    pub fn tuples(&self) -> &[NTuple] {
        &self.tuples
    }

    #[must_use]
    pub fn weights(&self) -> &[Vec<f32>] {
        &self.weights
    }

    #[must_use]
    pub fn num_tuples(&self) -> usize {
        self.tuples.len()
    }

    /// Total number of weights across all patterns.
    #[must_use]
    pub fn num_weights(&self) -> usize {
        self.weights.iter().map(Vec::len).sum()
    }

    /// Weight-table index of every pattern for `state`, after canonicalizing
    /// the board.
    fn indices<'a>(&'a self, state: &GameState) -> impl Iterator<Item = usize> + 'a {
        let board = canonicalize(state.board());
        let inventory = inventory_index(state);
        self.tuples.iter().map(move |t| t.index(&board, inventory))
    }

    /// Sum of active weights, from Black's point of view.
    #[must_use]
    pub fn raw_value(&self, state: &GameState) -> f32 {
        self.indices(state)
            .zip(&self.weights)
            .map(|(idx, weights)| weights[idx])
            .sum()
    }

    /// Value of `state` for the player to move.
    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> f32 {
        self.raw_value(state) * perspective(state.current_player())
    }

    /// Moves the value of `state` (for the player to move) towards `target`.
    ///
    /// Each active weight changes by `learning_rate / num_tuples * error`.
    /// Returns the error before the update.
    pub fn td_update(&mut self, state: &GameState, target: f32, learning_rate: f32) -> f32 {
        let sign = perspective(state.current_player());
        let indices: Vec<usize> = self.indices(state).collect();
        let value: f32 = indices
            .iter()
            .zip(&self.weights)
            .map(|(idx, weights)| weights[*idx])
            .sum();
        let error = target - value * sign;
        if self.tuples.is_empty() {
            return error;
        }

        #[expect(clippy::cast_precision_loss)]
        let delta = learning_rate / self.tuples.len() as f32 * error * sign;
        for (idx, weights) in indices.into_iter().zip(&mut self.weights) {
            weights[idx] += delta;
        }
        error
    }

    /// Writes the weights to `path`, creating parent directories as needed.
    pub fn save<P>(&self, path: P) -> Result<(), SaveError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let wrap = |source| SaveError {
            path: path.to_owned(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(wrap)?;
        }
        let mut writer = BufWriter::new(File::create(path).map_err(wrap)?);
        self.write_to(&mut writer).map_err(wrap)?;
        writer.flush().map_err(wrap)?;
        log::debug!("saved {} weights to {}", self.num_weights(), path.display());
        Ok(())
    }

    /// Replaces the weights with those stored at `path`.
    pub fn load<P>(&mut self, path: P) -> Result<(), LoadError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound { path: path.to_owned() }
            } else {
                LoadError::Io(err)
            }
        })?;
        self.read_from(BufReader::new(file))?;
        log::debug!("loaded {} weights from {}", self.num_weights(), path.display());
        Ok(())
    }

    pub fn write_to<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        writer.write_all(&(self.weights.len() as u64).to_le_bytes())?;
        for weights in &self.weights {
            writer.write_all(&(weights.len() as u64).to_le_bytes())?;
            for w in weights {
                writer.write_all(&w.to_le_bytes())?;
            }
        }
        Ok(())
    }

    /// Reads weights in the file layout from `reader`.
    ///
    /// The whole stream is decoded and checked against this network's
    /// patterns before any weight is replaced.
    pub fn read_from<R>(&mut self, mut reader: R) -> Result<(), LoadError>
    where
        R: Read,
    {
        let count = read_u64(&mut reader)?;
        if usize::try_from(count).ok() != Some(self.tuples.len()) {
            return Err(LoadError::PatternCountMismatch {
                expected: self.tuples.len(),
                found: count,
            });
        }

        let mut loaded = Vec::with_capacity(self.tuples.len());
        for (pattern, tuple) in self.tuples.iter().enumerate() {
            let len = read_u64(&mut reader)?;
            let expected = tuple.num_states();
            if usize::try_from(len).ok() != Some(expected) {
                return Err(LoadError::WeightCountMismatch {
                    pattern,
                    expected,
                    found: len,
                });
            }
            let mut bytes = vec![0; expected * 4];
            reader.read_exact(&mut bytes).map_err(LoadError::from_read)?;
            let weights = bytes
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect::<Vec<_>>();
            loaded.push(weights);
        }

        self.weights = loaded;
        Ok(())
    }
}

impl Evaluate for NTupleNetwork {
    fn evaluate(&self, state: &GameState) -> f32 {
        NTupleNetwork::evaluate(self, state)
    }
}

fn read_u64<R>(reader: &mut R) -> Result<u64, LoadError>
where
    R: Read,
{
    let mut buf = [0; 8];
    reader.read_exact(&mut buf).map_err(LoadError::from_read)?;
    Ok(u64::from_le_bytes(buf))
}

/// `+1` for Black, `-1` for White.
fn perspective(player: Player) -> f32 {
    match player {
        Player::Black => 1.0,
        Player::White => -1.0,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use contrast_engine::{Position, legal_moves};

    use super::*;

    fn small_network() -> NTupleNetwork {
        NTupleNetwork::new(vec![
            NTuple::new(vec![(0, 0), (1, 0), (0, 1)]).unwrap(),
            NTuple::new(vec![(2, 2), (2, 3)]).unwrap(),
            NTuple::new(vec![(4, 4)]).unwrap(),
        ])
    }

    fn sample_states() -> Vec<GameState> {
        let mut states = vec![GameState::new()];
        let mut state = GameState::new();
        for i in 0..6 {
            let moves = legal_moves(&state);
            state.apply_move(&moves[(i * 37) % moves.len()]);
            states.push(state);
        }
        states
    }

    #[test]
    fn test_initial_weights() {
        let network = small_network();
        assert_eq!(network.num_tuples(), 3);
        assert_eq!(network.num_weights(), (81 * 9 + 81 + 9) * 64);
        for weights in network.weights() {
            assert!(weights.iter().all(|w| (*w - 0.5 / 3.0).abs() < f32::EPSILON));
        }
        let value = network.evaluate(&GameState::new());
        assert!((value - INITIAL_VALUE).abs() < 1e-6);
    }

    #[test]
    fn test_sign_flips_with_player() {
        let mut network = small_network();
        let mut state = GameState::new();
        network.td_update(&state, 1.0, 0.3);
        state.apply_move(&legal_moves(&state)[3]);
        for player in Player::ALL {
            state.set_current_player(player);
            let black = {
                let mut s = state;
                s.set_current_player(Player::Black);
                network.evaluate(&s)
            };
            let white = {
                let mut s = state;
                s.set_current_player(Player::White);
                network.evaluate(&s)
            };
            assert_eq!(black.to_bits(), (-white).to_bits());
            assert_eq!(network.raw_value(&state), black);
        }
    }

    #[test]
    fn test_td_update_moves_towards_target() {
        let mut network = small_network();
        let state = GameState::new();
        let before = network.evaluate(&state);
        let error = network.td_update(&state, 1.0, 0.1);
        assert!((error - (1.0 - before)).abs() < 1e-6);
        let after = network.evaluate(&state);
        assert!(after > before);

        let mut prev_gap = (1.0 - after).abs();
        for _ in 0..50 {
            network.td_update(&state, 1.0, 0.1);
            let gap = (1.0 - network.evaluate(&state)).abs();
            assert!(gap <= prev_gap);
            prev_gap = gap;
        }
        assert!(prev_gap < 0.05);
    }

    #[test]
    fn test_td_update_for_white_uses_white_perspective() {
        let mut network = small_network();
        let mut state = GameState::new();
        state.set_current_player(Player::White);
        let before = network.evaluate(&state);
        network.td_update(&state, 1.0, 0.2);
        assert!(network.evaluate(&state) > before);
        state.set_current_player(Player::Black);
        assert!(network.evaluate(&state) < -before);
    }

    #[test]
    fn test_mirrored_positions_share_value() {
        let mut network = small_network();
        let mut state = GameState::empty(Player::Black);
        state.board_mut().cell_mut(Position::new(0, 0)).occupant = Some(Player::Black);
        state.board_mut().cell_mut(Position::new(3, 3)).occupant = Some(Player::White);
        network.td_update(&state, -1.0, 0.5);

        let mut mirrored = GameState::empty(Player::Black);
        mirrored.board_mut().cell_mut(Position::new(4, 0)).occupant = Some(Player::Black);
        mirrored.board_mut().cell_mut(Position::new(1, 3)).occupant = Some(Player::White);
        assert_eq!(network.evaluate(&state), network.evaluate(&mirrored));
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let mut network = small_network();
        let states = sample_states();
        for (i, state) in states.iter().enumerate() {
            network.td_update(state, if i % 2 == 0 { 1.0 } else { -1.0 }, 0.3);
        }

        let mut buf = Vec::new();
        network.write_to(&mut buf).unwrap();
        let mut loaded = small_network();
        loaded.read_from(Cursor::new(&buf)).unwrap();
        assert_eq!(loaded, network);
        for state in &states {
            assert_eq!(loaded.evaluate(state), network.evaluate(state));
        }
    }

    #[test]
    fn test_file_layout() {
        let network = NTupleNetwork::new(vec![NTuple::new(vec![(0, 0)]).unwrap()]);
        let mut buf = Vec::new();
        network.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), 8 + 8 + 9 * 64 * 4);
        assert_eq!(&buf[..8], &1u64.to_le_bytes());
        assert_eq!(&buf[8..16], &(9u64 * 64).to_le_bytes());
        assert_eq!(&buf[16..20], &0.5f32.to_le_bytes());
    }

    #[test]
    fn test_pattern_count_mismatch() {
        let mut buf = Vec::new();
        small_network().write_to(&mut buf).unwrap();
        let mut other = NTupleNetwork::new(vec![NTuple::new(vec![(0, 0)]).unwrap()]);
        let original = other.clone();
        let err = other.read_from(Cursor::new(&buf)).unwrap_err();
        assert!(
            matches!(err, LoadError::PatternCountMismatch { expected: 1, found: 3 }),
            "{err:?}"
        );
        assert_eq!(other, original);
    }

    #[test]
    fn test_weight_count_mismatch() {
        let mut buf = Vec::new();
        small_network().write_to(&mut buf).unwrap();
        let mut other = NTupleNetwork::new(vec![
            NTuple::new(vec![(0, 0), (1, 0), (0, 1)]).unwrap(),
            NTuple::new(vec![(2, 2)]).unwrap(),
            NTuple::new(vec![(4, 4)]).unwrap(),
        ]);
        let err = other.read_from(Cursor::new(&buf)).unwrap_err();
        assert!(
            matches!(err, LoadError::WeightCountMismatch { pattern: 1, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn test_truncated() {
        let mut network = small_network();
        let mut buf = Vec::new();
        network.write_to(&mut buf).unwrap();
        buf.truncate(buf.len() - 1);
        let original = network.clone();
        let err = network.read_from(Cursor::new(&buf)).unwrap_err();
        assert!(matches!(err, LoadError::Truncated), "{err:?}");
        assert_eq!(network, original);

        let err = network.read_from(Cursor::new(&buf[..5])).unwrap_err();
        assert!(matches!(err, LoadError::Truncated), "{err:?}");
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("weights.bin");
        let mut network = small_network();
        network.td_update(&GameState::new(), -1.0, 0.5);
        network.save(&path).unwrap();

        let mut loaded = small_network();
        loaded.load(&path).unwrap();
        assert_eq!(loaded, network);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut network = small_network();
        let err = network.load(dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }), "{err:?}");
    }
}
