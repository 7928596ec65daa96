//! State shared between the updater and the self-play workers.
//!
//! - [`SharedNetwork`] is the learner. Every read and write goes through one
//!   mutex, so the updater's TD updates and the workers' evaluations are
//!   serialized.
//! - [`OpponentSnapshot`] is an immutable network published by swapping an
//!   `Arc`. Readers clone the `Arc` and never wait on the learner's lock.
//! - [`LearnerSide`] is the color the learner currently plays.

use std::{
    path::Path,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, RwLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use contrast_engine::{GameState, Player};
use contrast_evaluator::{Evaluate, NTupleNetwork, SaveError};

#[derive(Debug, Default)]
pub struct SharedNetwork {
    inner: Mutex<NTupleNetwork>,
}

impl SharedNetwork {
    #[must_use]
    pub fn new(network: NTupleNetwork) -> Self {
        Self {
            inner: Mutex::new(network),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NTupleNetwork> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> f32 {
        self.lock().evaluate(state)
    }

    /// See [`NTupleNetwork::td_update`].
    pub fn td_update(&self, state: &GameState, target: f32, learning_rate: f32) -> f32 {
        self.lock().td_update(state, target, learning_rate)
    }

    /// A copy of the current weights.
    #[must_use]
    pub fn copy(&self) -> NTupleNetwork {
        self.lock().clone()
    }

    /// Saves a copy, so the lock is released before any I/O.
    pub fn save<P>(&self, path: P) -> Result<(), SaveError>
    where
        P: AsRef<Path>,
    {
        self.copy().save(path)
    }

    #[must_use]
    pub fn into_inner(self) -> NTupleNetwork {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Evaluate for SharedNetwork {
    fn evaluate(&self, state: &GameState) -> f32 {
        SharedNetwork::evaluate(self, state)
    }
}

/// The frozen opponent and how many times it has been replaced.
#[derive(Debug)]
pub struct OpponentSnapshot {
    current: RwLock<Arc<NTupleNetwork>>,
    generation: AtomicUsize,
}

impl OpponentSnapshot {
    #[must_use]
    pub fn new(network: NTupleNetwork) -> Self {
        Self {
            current: RwLock::new(Arc::new(network)),
            generation: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn load(&self) -> Arc<NTupleNetwork> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replaces the snapshot and returns the new generation number.
    pub fn publish(&self, network: NTupleNetwork) -> usize {
        let network = Arc::new(network);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = network;
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of publications since construction.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct LearnerSide {
    is_black: AtomicBool,
}

impl LearnerSide {
    #[must_use]
    pub fn new(player: Player) -> Self {
        Self {
            is_black: AtomicBool::new(player.is_black()),
        }
    }

    #[must_use]
    pub fn load(&self) -> Player {
        if self.is_black.load(Ordering::Acquire) {
            Player::Black
        } else {
            Player::White
        }
    }

    /// Flips the learner's color and returns the new one.
    pub fn swap(&self) -> Player {
        if self.is_black.fetch_xor(true, Ordering::AcqRel) {
            Player::White
        } else {
            Player::Black
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use contrast_evaluator::ntuple::NTuple;

    use super::*;

    fn small_network() -> NTupleNetwork {
        NTupleNetwork::new(vec![NTuple::new(vec![(0, 0)]).unwrap(), NTuple::new(vec![(4, 4)]).unwrap()])
    }

    #[test]
    fn test_snapshot_is_independent_of_learner() {
        let learner = SharedNetwork::new(small_network());
        let snapshot = OpponentSnapshot::new(learner.copy());
        let state = GameState::new();
        let before = snapshot.load().evaluate(&state);

        learner.td_update(&state, 1.0, 0.5);
        assert!(learner.evaluate(&state) > before);
        assert!((snapshot.load().evaluate(&state) - before).abs() < f32::EPSILON);

        assert_eq!(snapshot.publish(learner.copy()), 1);
        assert_eq!(snapshot.generation(), 1);
        assert!((snapshot.load().evaluate(&state) - learner.evaluate(&state)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_held_snapshot_survives_publish() {
        let snapshot = OpponentSnapshot::new(small_network());
        let held = snapshot.load();
        let mut replacement = small_network();
        replacement.td_update(&GameState::new(), -1.0, 1.0);
        snapshot.publish(replacement.clone());
        assert_eq!(*held, small_network());
        assert_eq!(*snapshot.load(), replacement);
    }

    #[test]
    fn test_concurrent_readers() {
        let learner = SharedNetwork::new(small_network());
        let state = GameState::new();
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let _ = learner.evaluate(&state);
                    }
                });
            }
            for _ in 0..100 {
                learner.td_update(&state, 1.0, 0.01);
            }
        });
        assert!(learner.evaluate(&state) > 0.5);
    }

    #[test]
    fn test_learner_side() {
        let side = LearnerSide::new(Player::Black);
        assert_eq!(side.load(), Player::Black);
        assert_eq!(side.swap(), Player::White);
        assert_eq!(side.load(), Player::White);
        assert_eq!(side.swap(), Player::Black);
    }
}
