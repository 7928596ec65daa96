use std::path::PathBuf;

use chrono::Utc;
use contrast_evaluator::PatternSet;
use contrast_training::{OpponentKind, Trainer, TrainingConfig};

use crate::{model::training_report::TrainingReport, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// JSON training configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of training games [default: 100000]
    #[arg(long)]
    games: Option<usize>,
    /// Stop after this many TD updates
    #[arg(long)]
    max_td_updates: Option<usize>,
    /// Learner's exploration rate [default: 0.1]
    #[arg(long)]
    epsilon: Option<f64>,
    /// Snapshot opponent's exploration rate [default: 0.0]
    #[arg(long)]
    opponent_epsilon: Option<f64>,
    /// Opponent: snapshot, mirror, greedy or rule-based [default: snapshot]
    #[arg(long, value_parser = util::parse_kind::<OpponentKind>)]
    opponent: Option<OpponentKind>,
    /// Number of worker threads [default: 7]
    #[arg(long)]
    threads: Option<usize>,
    /// Warm-up games before promotions and role swaps [default: 1000]
    #[arg(long)]
    initial: Option<usize>,
    /// Black/White swap interval [default: 10000]
    #[arg(long)]
    swap_interval: Option<usize>,
    /// Rolling win-rate window [default: 1000]
    #[arg(long)]
    eval_window: Option<usize>,
    /// Win rate required for promotion [default: 0.55]
    #[arg(long)]
    promotion_threshold: Option<f64>,
    /// Save a checkpoint every N games [default: 10000]
    #[arg(long)]
    save_interval: Option<usize>,
    /// Log progress every N games [default: 100]
    #[arg(long)]
    report_interval: Option<usize>,
    /// Game length cap, reached games are draws [default: 500]
    #[arg(long)]
    max_moves: Option<usize>,
    /// Pattern family: compact or lines [default: compact]
    #[arg(long)]
    patterns: Option<PatternSet>,
    #[arg(long)]
    lr_max: Option<f32>,
    #[arg(long)]
    lr_min: Option<f32>,
    /// Learning-rate decay steepness [default: 19]
    #[arg(long)]
    lr_k: Option<f32>,
    /// Base seed for worker RNGs
    #[arg(long)]
    seed: Option<u64>,
    /// Always let Black move first
    #[arg(long)]
    no_alternate_first: bool,
    /// Output weight file [default: ntuple_selfplay.bin]
    #[arg(long)]
    output: Option<PathBuf>,
    /// Weights to resume from
    #[arg(long)]
    load: Option<PathBuf>,
    /// Start fresh if --load cannot be read
    #[arg(long)]
    fresh_on_load_failure: bool,
    /// Write a JSON report to FILE (stdout without a value)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    report: Option<Option<PathBuf>>,
}

impl TrainArg {
    fn to_config(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<TrainingConfig, _>("training config", path)?,
            None => TrainingConfig::default(),
        };
        set(&mut config.num_games, self.games.as_ref());
        set(&mut config.exploration_rate, self.epsilon.as_ref());
        set(&mut config.opponent_exploration_rate, self.opponent_epsilon.as_ref());
        set(&mut config.opponent, self.opponent.as_ref());
        set(&mut config.num_workers, self.threads.as_ref());
        set(&mut config.initial_training_games, self.initial.as_ref());
        set(&mut config.swap_interval, self.swap_interval.as_ref());
        set(&mut config.evaluation_window, self.eval_window.as_ref());
        set(&mut config.promotion_threshold, self.promotion_threshold.as_ref());
        set(&mut config.save_interval, self.save_interval.as_ref());
        set(&mut config.report_interval, self.report_interval.as_ref());
        set(&mut config.max_moves, self.max_moves.as_ref());
        set(&mut config.patterns, self.patterns.as_ref());
        set(&mut config.lr.lr_max, self.lr_max.as_ref());
        set(&mut config.lr.lr_min, self.lr_min.as_ref());
        set(&mut config.lr.k, self.lr_k.as_ref());
        set(&mut config.save_path, self.output.as_ref());
        if self.max_td_updates.is_some() {
            config.max_td_updates = self.max_td_updates;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.load.is_some() {
            config.load_path.clone_from(&self.load);
        }
        if self.no_alternate_first {
            config.alternate_first_player = false;
        }
        if self.fresh_on_load_failure {
            config.fresh_on_load_failure = true;
        }
        Ok(config)
    }
}

fn set<T>(field: &mut T, value: Option<&T>)
where
    T: Clone,
{
    if let Some(value) = value {
        field.clone_from(value);
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = arg.to_config()?;
    let mut trainer = Trainer::new(config.clone())?;
    let summary = trainer.run()?;

    eprintln!();
    eprintln!("Training completed");
    eprintln!("  Weights: {}", config.save_path.display());
    eprintln!("  Patterns: {} ({} weights)", config.patterns, trainer.network().num_weights());
    eprintln!("  Games/s: {:.1}", summary.games_per_sec());
    eprintln!("{summary}");

    if let Some(report_path) = &arg.report {
        let report = TrainingReport {
            trained_at: Utc::now(),
            weights: config.save_path.clone(),
            config,
            summary,
        };
        util::save_json(&report, report_path.as_deref())?;
        if let Some(path) = report_path {
            eprintln!("Report saved to {}", path.display());
        }
    }
    Ok(())
}
