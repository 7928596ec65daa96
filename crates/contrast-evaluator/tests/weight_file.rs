use contrast_engine::{GameState, Player, legal_moves};
use contrast_evaluator::{
    Evaluate, LoadError, NTupleNetwork, NTuplePolicy, Policy,
    ntuple::NTuple,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn network() -> NTupleNetwork {
    NTupleNetwork::new(vec![
        NTuple::new(vec![(0, 0), (1, 0), (2, 0)]).unwrap(),
        NTuple::new(vec![(0, 4), (1, 4), (2, 4)]).unwrap(),
        NTuple::new(vec![(1, 1), (2, 2), (3, 3)]).unwrap(),
    ])
}

/// Positions reached by letting a network play itself.
fn sample_states(network: &NTupleNetwork, count: usize) -> Vec<GameState> {
    let mut rng = Pcg32::seed_from_u64(11);
    let policy = NTuplePolicy::new(network, 0.5);
    let mut states = Vec::new();
    let mut state = GameState::new();
    while states.len() < count {
        if state.outcome().is_some() {
            state = GameState::new();
        }
        states.push(state);
        let mv = policy.pick(&state, &mut rng).unwrap();
        state.apply_move(&mv);
    }
    states
}

#[test]
fn save_then_load_reproduces_evaluations() {
    let mut trained = network();
    let states = sample_states(&network(), 40);
    for (i, state) in states.iter().enumerate() {
        let target = if i % 3 == 0 { -1.0 } else { 1.0 };
        trained.td_update(state, target, 0.2);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.bin");
    trained.save(&path).unwrap();

    let mut loaded = network();
    loaded.load(&path).unwrap();
    for state in &states {
        assert_eq!(loaded.evaluate(state), trained.evaluate(state));
    }
}

#[test]
fn load_errors_are_distinguishable() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.bin");
    assert!(matches!(network().load(&missing), Err(LoadError::NotFound { .. })));

    let wrong_shape = dir.path().join("one_pattern.bin");
    NTupleNetwork::new(vec![NTuple::new(vec![(0, 0)]).unwrap()])
        .save(&wrong_shape)
        .unwrap();
    assert!(matches!(
        network().load(&wrong_shape),
        Err(LoadError::PatternCountMismatch { expected: 3, found: 1 })
    ));

    let truncated = dir.path().join("truncated.bin");
    network().save(&truncated).unwrap();
    let bytes = std::fs::read(&truncated).unwrap();
    std::fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(network().load(&truncated), Err(LoadError::Truncated)));
}

#[test]
fn evaluation_is_negated_for_white() {
    let mut net = network();
    let states = sample_states(&network(), 30);
    for state in &states {
        net.td_update(state, 1.0, 0.1);
    }
    for state in &states {
        let mut black = *state;
        black.set_current_player(Player::Black);
        let mut white = *state;
        white.set_current_player(Player::White);
        assert_eq!(net.evaluate(&black), -net.evaluate(&white));
    }
}

#[test]
fn repeated_updates_converge_monotonically() {
    let mut net = network();
    let mut state = GameState::new();
    let moves = legal_moves(&state);
    state.apply_move(&moves[7]);

    let mut prev = net.evaluate(&state);
    net.td_update(&state, 1.0, 0.05);
    let first = net.evaluate(&state);
    assert!(first > prev);
    prev = first;
    for _ in 0..200 {
        net.td_update(&state, 1.0, 0.05);
        let value = net.evaluate(&state);
        assert!(value >= prev && value <= 1.0 + 1e-5);
        prev = value;
    }
    assert!((1.0 - prev).abs() < 1e-2);
}

#[test]
fn trait_object_evaluates_like_network() {
    let net = network();
    let evaluator: &dyn Evaluate = &net;
    let state = GameState::new();
    assert_eq!(evaluator.evaluate(&state), net.evaluate(&state));
}
