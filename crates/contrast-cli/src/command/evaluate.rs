use std::{path::PathBuf, sync::Arc};

use contrast_engine::Player;
use contrast_evaluator::{
    AnyPolicy, NTupleNetwork, NTuplePolicy, PatternSet, PolicyKind,
    arena::{self, MatchStats},
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Trained weight file
    weights: PathBuf,
    /// Pattern family the weights were trained with
    #[arg(long, default_value = "compact")]
    patterns: PatternSet,
    /// Opponent: random, greedy, rule-based or ntuple
    #[arg(long, default_value = "random", value_parser = util::parse_kind::<PolicyKind>)]
    opponent: PolicyKind,
    /// Weights for an ntuple opponent (defaults to the evaluated weights)
    #[arg(long)]
    opponent_weights: Option<PathBuf>,
    /// Number of games
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// Exploration rate of the evaluated network
    #[arg(long, default_value_t = 0.0)]
    epsilon: f64,
    /// Alternate colors every game (otherwise the network plays Black)
    #[arg(long)]
    swap_colors: bool,
    #[arg(long, default_value_t = arena::DEFAULT_MAX_MOVES)]
    max_moves: usize,
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        weights,
        patterns,
        opponent,
        opponent_weights,
        games,
        epsilon,
        swap_colors,
        max_moves,
        seed,
    } = arg;

    let network = Arc::new(util::load_network(weights, *patterns)?);
    let candidate = AnyPolicy::from(NTuplePolicy::new(Arc::clone(&network), *epsilon));
    let opponent_policy = match AnyPolicy::<Arc<NTupleNetwork>>::heuristic(*opponent) {
        Some(policy) => policy,
        None => {
            let opponent_network = match opponent_weights {
                Some(path) => Arc::new(util::load_network(path, *patterns)?),
                None => Arc::clone(&network),
            };
            AnyPolicy::from(NTuplePolicy::greedy(opponent_network))
        }
    };

    let mut rng = match seed {
        Some(seed) => Pcg32::seed_from_u64(*seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let mut as_black = MatchStats::new();
    let mut as_white = MatchStats::new();

    eprintln!("Evaluating {} against {opponent} over {games} games...", weights.display());
    for game in 0..*games {
        if *swap_colors && game % 2 == 1 {
            let result = arena::play_match(&opponent_policy, &candidate, Player::Black, *max_moves, &mut rng);
            as_white.record(&result);
        } else {
            let result = arena::play_match(&candidate, &opponent_policy, Player::Black, *max_moves, &mut rng);
            as_black.record(&result);
        }
    }

    let total = as_black.games + as_white.games;
    let wins = as_black.black_wins + as_white.white_wins;
    let losses = as_black.white_wins + as_white.black_wins;
    let draws = as_black.draws + as_white.draws;
    #[expect(clippy::cast_precision_loss)]
    let percent = |n: usize| if total == 0 { 0.0 } else { 100.0 * n as f64 / total as f64 };

    println!("Network vs {opponent}");
    println!("  Wins:   {wins:6} ({:5.1}%)", percent(wins));
    println!("  Losses: {losses:6} ({:5.1}%)", percent(losses));
    println!("  Draws:  {draws:6} ({:5.1}%)", percent(draws));
    if as_black.games > 0 {
        println!("  As Black: {as_black}");
    }
    if as_white.games > 0 {
        println!("  As White: {as_white}");
    }
    Ok(())
}
