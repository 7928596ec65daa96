use std::sync::Arc;

use contrast_engine::GameState;

/// Scores a position for the player to move (higher is better for them).
///
/// This is the only interface move-selection code and search need from a
/// value function.
pub trait Evaluate {
    fn evaluate(&self, state: &GameState) -> f32;
}

impl<E> Evaluate for &E
where
    E: Evaluate + ?Sized,
{
    fn evaluate(&self, state: &GameState) -> f32 {
        (**self).evaluate(state)
    }
}

impl<E> Evaluate for Box<E>
where
    E: Evaluate + ?Sized,
{
    fn evaluate(&self, state: &GameState) -> f32 {
        (**self).evaluate(state)
    }
}

impl<E> Evaluate for Arc<E>
where
    E: Evaluate + ?Sized,
{
    fn evaluate(&self, state: &GameState) -> f32 {
        (**self).evaluate(state)
    }
}
