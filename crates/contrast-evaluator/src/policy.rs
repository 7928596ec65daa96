//! Move-selection policies.
//!
//! Every player is a [`Policy`]: given a state, pick one of the mover's legal
//! moves, or `None` when there is none (the mover has lost). The fixed set of
//! players is enumerated by [`PolicyKind`] and dispatched through
//! [`AnyPolicy`].
//!
//! - [`RandomPolicy`] - uniform over all legal moves
//! - [`GreedyPolicy`] - win now, otherwise the largest step towards the goal
//! - [`RuleBasedPolicy`] - win now, block an immediate threat, advance the rearmost piece
//! - [`NTuplePolicy`] - ε-greedy over a value function

use contrast_engine::{GameState, Move, Player, base_moves, is_win, legal_moves};
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::evaluate::Evaluate;

pub trait Policy {
    /// Chooses a move for the player to move.
    fn pick<R>(&self, state: &GameState, rng: &mut R) -> Option<Move>
    where
        R: Rng + ?Sized;
}

/// Names of the available policies, parsed case-insensitively
/// (`"random"`, `"greedy"`, `"rulebased"`, `"ntuple"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    Greedy,
    RuleBased,
    NTuple,
}

/// Picks uniformly among the candidates with the highest score.
fn choose_best<R, F>(moves: &[Move], rng: &mut R, mut score: F) -> Option<Move>
where
    R: Rng + ?Sized,
    F: FnMut(&Move) -> f32,
{
    let mut best = Vec::new();
    let mut best_score = f32::NEG_INFINITY;
    for mv in moves {
        let s = score(mv);
        if s > best_score {
            best_score = s;
            best.clear();
            best.push(*mv);
        } else if s == best_score {
            best.push(*mv);
        }
    }
    if best.is_empty() {
        // every score was NaN or -inf
        return moves.choose(rng).copied();
    }
    best.choose(rng).copied()
}

/// Rows gained towards the goal.
#[expect(clippy::cast_precision_loss)]
fn progress(player: Player, mv: &Move) -> f32 {
    let before = player.distance_to_goal(usize::from(mv.from.y));
    let after = player.distance_to_goal(usize::from(mv.to.y));
    before as f32 - after as f32
}

fn winning_move(state: &GameState, moves: &[Move]) -> Option<Move> {
    let goal = state.current_player().goal_row();
    moves.iter().find(|m| usize::from(m.to.y) == goal).copied()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn pick<R>(&self, state: &GameState, rng: &mut R) -> Option<Move>
    where
        R: Rng + ?Sized,
    {
        legal_moves(state).choose(rng).copied()
    }
}

/// Never places tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn pick<R>(&self, state: &GameState, rng: &mut R) -> Option<Move>
    where
        R: Rng + ?Sized,
    {
        let me = state.current_player();
        let moves = base_moves(state, me);
        if let Some(mv) = winning_move(state, &moves) {
            return Some(mv);
        }
        choose_best(&moves, rng, |mv| progress(me, mv))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPolicy;

impl RuleBasedPolicy {
    /// `true` if `player` could reach their goal row with one move.
    fn threatens(state: &GameState, player: Player) -> bool {
        let goal = player.goal_row();
        base_moves(state, player)
            .iter()
            .any(|m| usize::from(m.to.y) == goal)
    }

    /// Forward moves rank above all others, and among them moves of the piece
    /// furthest from the goal come first.
    #[expect(clippy::cast_precision_loss)]
    fn advance_score(me: Player, mv: &Move) -> f32 {
        let gain = progress(me, mv);
        if gain > 0.0 {
            100.0 + me.distance_to_goal(usize::from(mv.from.y)) as f32 * 10.0 + gain
        } else {
            gain
        }
    }
}

impl Policy for RuleBasedPolicy {
    fn pick<R>(&self, state: &GameState, rng: &mut R) -> Option<Move>
    where
        R: Rng + ?Sized,
    {
        let me = state.current_player();
        let opp = me.opponent();
        let base = base_moves(state, me);
        if base.is_empty() {
            return None;
        }
        if let Some(mv) = winning_move(state, &base) {
            return Some(mv);
        }

        if Self::threatens(state, opp) {
            let blocks: Vec<Move> = legal_moves(state)
                .into_iter()
                .filter(|mv| {
                    let next = state.after(mv);
                    !is_win(&next, opp) && !Self::threatens(&next, opp)
                })
                .collect();
            // Prefer blocking with a plain move; tiles are kept for later.
            let plain: Vec<Move> = blocks.iter().filter(|m| !m.places_tile()).copied().collect();
            if let Some(mv) = plain.choose(rng).or_else(|| blocks.choose(rng)) {
                return Some(*mv);
            }
        }

        choose_best(&base, rng, |mv| Self::advance_score(me, mv))
    }
}

/// ε-greedy selection over a value function.
///
/// With probability `epsilon` a uniformly random legal move is played;
/// otherwise the move whose successor is worst for the opponent (highest
/// negated successor value), with ties broken uniformly.
#[derive(Debug, Clone)]
pub struct NTuplePolicy<E> {
    evaluator: E,
    epsilon: f64,
}

impl<E> NTuplePolicy<E>
where
    E: Evaluate,
{
    #[must_use]
    pub fn new(evaluator: E, epsilon: f64) -> Self {
        Self { evaluator, epsilon }
    }

    #[must_use]
    pub fn greedy(evaluator: E) -> Self {
        Self::new(evaluator, 0.0)
    }

    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl<E> Policy for NTuplePolicy<E>
where
    E: Evaluate,
{
    fn pick<R>(&self, state: &GameState, rng: &mut R) -> Option<Move>
    where
        R: Rng + ?Sized,
    {
        let moves = legal_moves(state);
        if moves.is_empty() {
            return None;
        }
        if self.epsilon > 0.0 && rng.random_bool(self.epsilon.min(1.0)) {
            return moves.choose(rng).copied();
        }
        choose_best(&moves, rng, |mv| -self.evaluator.evaluate(&state.after(mv)))
    }
}

/// One of the built-in policies, chosen at runtime.
#[derive(Debug, Clone, derive_more::From)]
pub enum AnyPolicy<E> {
    Random(RandomPolicy),
    Greedy(GreedyPolicy),
    RuleBased(RuleBasedPolicy),
    NTuple(NTuplePolicy<E>),
}

impl<E> AnyPolicy<E> {
    /// The policy named by `kind` if it needs no evaluator.
    #[must_use]
    pub fn heuristic(kind: PolicyKind) -> Option<Self> {
        match kind {
            PolicyKind::Random => Some(Self::Random(RandomPolicy)),
            PolicyKind::Greedy => Some(Self::Greedy(GreedyPolicy)),
            PolicyKind::RuleBased => Some(Self::RuleBased(RuleBasedPolicy)),
            PolicyKind::NTuple => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Random(_) => PolicyKind::Random,
            Self::Greedy(_) => PolicyKind::Greedy,
            Self::RuleBased(_) => PolicyKind::RuleBased,
            Self::NTuple(_) => PolicyKind::NTuple,
        }
    }
}

impl<E> Policy for AnyPolicy<E>
where
    E: Evaluate,
{
    fn pick<R>(&self, state: &GameState, rng: &mut R) -> Option<Move>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Random(p) => p.pick(state, rng),
            Self::Greedy(p) => p.pick(state, rng),
            Self::RuleBased(p) => p.pick(state, rng),
            Self::NTuple(p) => p.pick(state, rng),
        }
    }
}
