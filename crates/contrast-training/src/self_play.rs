//! Playing one recorded training game.
//!
//! A [`Trajectory`] keeps every state in which a player was to move, the
//! winner, and which side(s) the updater should learn from.

use contrast_engine::{GameState, Player};
use contrast_evaluator::Policy;
use rand::Rng;

/// A finished game as seen by the updater.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Positions in play order; the terminal position is included when the
    /// game ended by a win or loss.
    pub states: Vec<GameState>,
    /// `None` for a draw by move cap.
    pub winner: Option<Player>,
    pub moves: usize,
    /// Side the learner played.
    pub learner: Player,
    /// Train on both sides' states rather than the learner's only.
    pub learn_both_sides: bool,
}

impl Trajectory {
    /// TD target for a state whose mover is `mover`.
    #[must_use]
    pub fn target_for(&self, mover: Player) -> f32 {
        match self.winner {
            Some(winner) if winner == mover => 1.0,
            Some(_) => -1.0,
            None => 0.0,
        }
    }

    /// States to learn from with their targets, terminal state first.
    pub fn learning_targets(&self) -> impl Iterator<Item = (&GameState, f32)> + '_ {
        self.states
            .iter()
            .rev()
            .filter(|state| self.learn_both_sides || state.current_player() == self.learner)
            .map(|state| (state, self.target_for(state.current_player())))
    }

    #[must_use]
    pub fn learner_won(&self) -> bool {
        self.winner == Some(self.learner)
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

/// Player who moves first in the `game`-th (1-based) game.
#[must_use]
pub fn first_player(game: usize, alternate: bool) -> Player {
    if alternate && game % 2 == 1 {
        Player::White
    } else {
        Player::Black
    }
}

/// Plays one game from the standard opening, recording every position.
///
/// A policy that returns no move loses, as if it had no legal move.
pub fn play_game<L, O, R>(
    learner: &L,
    opponent: &O,
    learner_side: Player,
    first: Player,
    max_moves: usize,
    rng: &mut R,
) -> Trajectory
where
    L: Policy + ?Sized,
    O: Policy + ?Sized,
    R: Rng + ?Sized,
{
    let mut state = GameState::new();
    state.set_current_player(first);
    let mut states = Vec::new();
    let mut winner = None;
    let mut moves = 0;
    while moves < max_moves {
        states.push(state);
        if let Some(outcome) = state.outcome() {
            winner = Some(outcome.winner());
            break;
        }
        let mover = state.current_player();
        let picked = if mover == learner_side {
            learner.pick(&state, rng)
        } else {
            opponent.pick(&state, rng)
        };
        let Some(mv) = picked else {
            winner = Some(mover.opponent());
            break;
        };
        state.apply_move(&mv);
        moves += 1;
    }
    Trajectory {
        states,
        winner,
        moves,
        learner: learner_side,
        learn_both_sides: false,
    }
}

#[cfg(test)]
mod tests {
    use contrast_evaluator::{GreedyPolicy, RandomPolicy};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_first_player() {
        assert_eq!(first_player(1, true), Player::White);
        assert_eq!(first_player(2, true), Player::Black);
        assert_eq!(first_player(1, false), Player::Black);
    }

    #[test]
    fn test_game_is_recorded() {
        let mut rng = Pcg32::seed_from_u64(11);
        let t = play_game(&GreedyPolicy, &RandomPolicy, Player::Black, Player::White, 500, &mut rng);
        assert_eq!(t.states[0].current_player(), Player::White);
        assert_eq!(t.learner, Player::Black);
        if t.winner.is_some() {
            // terminal state recorded on top of every moved-from state
            assert_eq!(t.states.len(), t.moves + 1);
            assert!(t.states.last().unwrap().is_terminal());
        } else {
            assert_eq!(t.moves, 500);
            assert_eq!(t.states.len(), 500);
        }
        for pair in t.states.windows(2) {
            assert_eq!(pair[1].current_player(), pair[0].current_player().opponent());
        }
    }

    #[test]
    fn test_move_cap_draw() {
        let mut rng = Pcg32::seed_from_u64(12);
        let t = play_game(&RandomPolicy, &RandomPolicy, Player::Black, Player::Black, 2, &mut rng);
        assert!(t.is_draw());
        assert_eq!(t.moves, 2);
        assert_eq!(t.states.len(), 2);
        assert!(t.learning_targets().all(|(_, target)| target.abs() < f32::EPSILON));
    }

    #[test]
    fn test_learning_targets() {
        let a = GameState::new();
        let mut b = a;
        b.set_current_player(Player::White);
        let mut c = a;
        c.board_mut().clear();
        let mut t = Trajectory {
            states: vec![a, b, c],
            winner: Some(Player::White),
            moves: 2,
            learner: Player::Black,
            learn_both_sides: false,
        };
        let targets = t.learning_targets().map(|(s, v)| (*s, v)).collect::<Vec<_>>();
        assert_eq!(targets, vec![(c, -1.0), (a, -1.0)]);
        assert!(!t.learner_won());

        t.learn_both_sides = true;
        let targets = t.learning_targets().map(|(s, v)| (*s, v)).collect::<Vec<_>>();
        assert_eq!(targets, vec![(c, -1.0), (b, 1.0), (a, -1.0)]);
    }
}
