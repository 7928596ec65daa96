use std::path::PathBuf;

use contrast_engine::{GameState, Player, base_moves, legal_moves_for};
use contrast_evaluator::PatternSet;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ShowArg {
    /// Also print the value of every opening move under these weights
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Pattern family the weights were trained with
    #[arg(long, default_value = "compact")]
    patterns: PatternSet,
}

pub(crate) fn run(arg: &ShowArg) -> anyhow::Result<()> {
    let ShowArg { weights, patterns } = arg;
    let state = GameState::new();

    println!("{}", state.board());
    for player in Player::ALL {
        println!(
            "{player}: {} relocations, {} legal moves, tiles {} black / {} gray",
            base_moves(&state, player).len(),
            legal_moves_for(&state, player).len(),
            state.inventory(player).black(),
            state.inventory(player).gray(),
        );
    }

    if let Some(path) = weights {
        let network = util::load_network(path, *patterns)?;
        println!();
        println!("Value for {}: {:.4}", state.current_player(), network.evaluate(&state));
        let mut scored = base_moves(&state, state.current_player())
            .into_iter()
            .map(|mv| (mv, -network.evaluate(&state.after(&mv))))
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (mv, value) in scored {
            println!("  {mv}: {value:.4}");
        }
    }
    Ok(())
}
