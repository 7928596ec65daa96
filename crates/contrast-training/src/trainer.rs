//! The self-play training loop.
//!
//! # Threads
//!
//! ```text
//! worker × N ──► ResultQueue ──► updater ──► SharedNetwork (learner)
//!     ▲                            │
//!     └── OpponentSnapshot ◄───────┘ promotion
//! ```
//!
//! Workers claim game numbers from an atomic counter, play one game each and
//! push the [`Trajectory`] to the queue. The updater is the only writer of the
//! learner. It applies TD(0) updates terminal-state first, feeds the
//! [`PromotionPolicy`], publishes snapshots, swaps colors and writes
//! checkpoints. When every worker has stopped the queue is closed, the
//! updater drains it and the learner is saved.
//!
//! Trajectories reach the updater in completion order, which differs from
//! run to run.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    thread,
    time::Instant,
};

use contrast_engine::Player;
use contrast_evaluator::{GreedyPolicy, LoadError, NTupleNetwork, NTuplePolicy, RuleBasedPolicy, SaveError};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::{
    config::{ConfigError, OpponentKind, TrainingConfig},
    promotion::PromotionPolicy,
    queue::ResultQueue,
    self_play::{Trajectory, first_player, play_game},
    shared::{LearnerSide, OpponentSnapshot, SharedNetwork},
    summary::TrainingSummary,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    #[display("invalid training configuration")]
    Config(ConfigError),
    #[display("failed to load weights from {}", path.display())]
    Load { path: PathBuf, source: LoadError },
    #[display("failed to save the trained weights")]
    Save(SaveError),
}

/// Checkpoint file for processed game `game`: `<save_path>.<game>`.
#[must_use]
pub fn checkpoint_path(save_path: &Path, game: usize) -> PathBuf {
    let mut name = OsString::from(save_path.as_os_str());
    name.push(format!(".{game}"));
    PathBuf::from(name)
}

/// Owns the learner between runs.
#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    network: NTupleNetwork,
}

impl Trainer {
    /// Validates `config` and prepares the learner: fresh weights for
    /// `config.patterns`, or the weights at `config.load_path`.
    ///
    /// A load failure is an error unless `config.fresh_on_load_failure` is
    /// set, in which case it is logged and training starts fresh.
    pub fn new(config: TrainingConfig) -> Result<Self, TrainError> {
        config.validate().map_err(TrainError::Config)?;
        let mut network = NTupleNetwork::with_pattern_set(config.patterns);
        if let Some(path) = &config.load_path {
            match network.load(path) {
                Ok(()) => log::info!("Loaded weights from {}", path.display()),
                Err(err) if config.fresh_on_load_failure => {
                    log::warn!("Failed to load {}: {err}; starting from fresh weights", path.display());
                }
                Err(source) => {
                    return Err(TrainError::Load {
                        path: path.clone(),
                        source,
                    });
                }
            }
        }
        Ok(Self { config, network })
    }

    /// Trains an existing network. `config.patterns` and `config.load_path`
    /// are ignored.
    pub fn with_network(config: TrainingConfig, network: NTupleNetwork) -> Result<Self, TrainError> {
        config.validate().map_err(TrainError::Config)?;
        Ok(Self { config, network })
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn network(&self) -> &NTupleNetwork {
        &self.network
    }

    #[must_use]
    pub fn into_network(self) -> NTupleNetwork {
        self.network
    }

    /// Runs the configured training and saves the learner to
    /// `config.save_path`.
    ///
    /// Checkpoint failures are logged and training goes on; only the final
    /// save is reported as an error. The trained weights stay in the trainer
    /// either way.
    pub fn run(&mut self) -> Result<TrainingSummary, TrainError> {
        let config = &self.config;
        log_config(config);
        let start = Instant::now();

        let network = std::mem::replace(&mut self.network, NTupleNetwork::new(Vec::new()));
        let session = Session {
            config,
            snapshot: OpponentSnapshot::new(network.clone()),
            learner: SharedNetwork::new(network),
            side: LearnerSide::new(Player::Black),
            queue: ResultQueue::new(),
            next_game: AtomicUsize::new(0),
            stop: AtomicBool::new(config.max_td_updates == Some(0)),
            start,
        };

        let mut summary = thread::scope(|s| {
            let workers = (0..config.num_workers)
                .map(|id| {
                    let session = &session;
                    s.spawn(move || session.work(id))
                })
                .collect::<Vec<_>>();
            s.spawn(|| {
                for (id, worker) in workers.into_iter().enumerate() {
                    if worker.join().is_err() {
                        log::error!("[Worker {id}] panicked");
                    }
                }
                log::info!("All workers finished, draining remaining results");
                session.queue.close();
            });
            session.update()
        });

        summary.final_learner_side = session.side.load();
        summary.promotions = session.snapshot.generation();
        self.network = session.learner.into_inner();
        summary.elapsed_secs = start.elapsed().as_secs_f64();

        self.network.save(&config.save_path).map_err(TrainError::Save)?;
        log::info!("Saved weights to {}", config.save_path.display());
        log::info!("Training complete\n{summary}");
        Ok(summary)
    }
}

fn log_config(config: &TrainingConfig) {
    log::info!("Self-play N-tuple training");
    log::info!("  games: {}", config.num_games);
    if let Some(max) = config.max_td_updates {
        log::info!("  TD update budget: {max}");
    }
    log::info!("  patterns: {}", config.patterns);
    log::info!("  opponent: {}", config.opponent);
    log::info!("  workers: {}", config.num_workers);
    log::info!(
        "  learning rate: {} -> {} (k = {})",
        config.lr.lr_max,
        config.lr.lr_min,
        config.lr.k
    );
    log::info!(
        "  exploration: learner {}, opponent {}",
        config.exploration_rate,
        config.opponent_exploration_rate
    );
    log::info!("  warm-up games: {}", config.initial_training_games);
    log::info!("  role swap interval: {}", config.swap_interval);
    log::info!(
        "  promotion: {:.1}% over {} games",
        config.promotion_threshold * 100.0,
        config.evaluation_window
    );
    log::info!(
        "  checkpoints: every {} games to {}.<game>",
        config.save_interval,
        config.save_path.display()
    );
}

/// Everything the threads of one run share.
struct Session<'a> {
    config: &'a TrainingConfig,
    learner: SharedNetwork,
    snapshot: OpponentSnapshot,
    side: LearnerSide,
    queue: ResultQueue<Trajectory>,
    next_game: AtomicUsize,
    stop: AtomicBool,
    start: Instant,
}

impl Session<'_> {
    fn work(&self, id: usize) {
        let config = self.config;
        let mut rng = match config.worker_seed(id) {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };
        let learner = NTuplePolicy::new(&self.learner, config.exploration_rate);
        log::debug!("[Worker {id}] started");

        let mut played = 0;
        while !self.stop.load(Ordering::Acquire) {
            let index = self.next_game.fetch_add(1, Ordering::AcqRel);
            if index >= config.num_games {
                break;
            }
            let first = first_player(index + 1, config.alternate_first_player);
            let side = self.side.load();
            let max_moves = config.max_moves;
            let trajectory = match config.opponent {
                OpponentKind::Snapshot => {
                    let opponent = NTuplePolicy::new(self.snapshot.load(), config.opponent_exploration_rate);
                    play_game(&learner, &opponent, side, first, max_moves, &mut rng)
                }
                OpponentKind::Mirror => Trajectory {
                    learn_both_sides: true,
                    ..play_game(&learner, &learner, side, first, max_moves, &mut rng)
                },
                OpponentKind::Greedy => play_game(&learner, &GreedyPolicy, side, first, max_moves, &mut rng),
                OpponentKind::RuleBased => play_game(&learner, &RuleBasedPolicy, side, first, max_moves, &mut rng),
            };
            if !self.queue.push(trajectory) {
                break;
            }
            played += 1;
        }
        log::debug!("[Worker {id}] finished after {played} games");
    }

    fn budget_reached(&self, td_updates: usize) -> bool {
        self.config.max_td_updates.is_some_and(|max| td_updates >= max)
    }

    fn learning_rate(&self, summary: &TrainingSummary) -> f32 {
        let config = self.config;
        match config.max_td_updates {
            Some(max) => config.lr.rate_at(summary.td_updates + 1, max),
            None => config.lr.rate_at(summary.games_processed + 1, config.num_games),
        }
    }

    fn update(&self) -> TrainingSummary {
        let config = self.config;
        let mut promotion = PromotionPolicy::new(
            config.initial_training_games,
            config.evaluation_window,
            config.promotion_threshold,
            config.swap_interval,
        );
        let mut summary = TrainingSummary::new();
        log::debug!("[Updater] started");

        while let Some(trajectory) = self.queue.pop() {
            summary.games_played += 1;
            if self.budget_reached(summary.td_updates) {
                self.stop.store(true, Ordering::Release);
                continue;
            }

            let lr = self.learning_rate(&summary);
            for (state, target) in trajectory.learning_targets() {
                if self.budget_reached(summary.td_updates) {
                    break;
                }
                self.learner.td_update(state, target, lr);
                summary.td_updates += 1;
            }
            summary.games_processed += 1;
            summary.record(&trajectory);
            let game = summary.games_processed;

            let decision = promotion.observe(game, trajectory.learner_won());
            if decision.swap_roles {
                let side = self.side.swap();
                summary.role_swaps += 1;
                log::info!("[Game {game}] swapped roles, learner now plays {side}");
            }
            if decision.promote && config.opponent.uses_snapshot() {
                let generation = self.snapshot.publish(self.learner.copy());
                match decision.win_rate {
                    Some(rate) => log::info!(
                        "[Game {game}] opponent promoted to generation {generation} (recent win rate {:.1}%, threshold {:.1}%)",
                        rate * 100.0,
                        config.promotion_threshold * 100.0
                    ),
                    None => log::info!("[Game {game}] warm-up finished, opponent promoted to generation {generation}"),
                }
            }

            if game % config.report_interval == 0 {
                self.report(&summary, &promotion, lr);
            }
            if game % config.save_interval == 0 {
                self.checkpoint(game);
            }
            if self.budget_reached(summary.td_updates) {
                log::info!("[Game {game}] TD update budget reached, stopping workers");
                self.stop.store(true, Ordering::Release);
            }
        }
        log::debug!("[Updater] finished after {} games", summary.games_processed);
        summary
    }

    fn report(&self, summary: &TrainingSummary, promotion: &PromotionPolicy, lr: f32) {
        let elapsed = self.start.elapsed().as_secs_f64();
        #[expect(clippy::cast_precision_loss)]
        let games_per_sec = summary.games_processed as f64 / elapsed.max(1e-3);
        log::info!(
            "[Game {:>6}/{}] overall {:5.1}% | recent({}) {:5.1}% | L {} O {} D {} | lr {:.4} | {:.1} moves | {:.1} g/s | queue {} | learner {}",
            summary.games_processed,
            self.config.num_games,
            summary.learner_win_rate() * 100.0,
            promotion.window_len(),
            promotion.win_rate() * 100.0,
            summary.learner_wins,
            summary.opponent_wins,
            summary.draws,
            lr,
            summary.average_moves(),
            games_per_sec,
            self.queue.len(),
            self.side.load(),
        );
    }

    fn checkpoint(&self, game: usize) {
        let path = checkpoint_path(&self.config.save_path, game);
        match self.learner.save(&path) {
            Ok(()) => log::info!("Saved checkpoint {}", path.display()),
            Err(err) => log::warn!("Failed to save checkpoint {}: {err}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use contrast_evaluator::ntuple::NTuple;

    use super::*;

    fn small_network() -> NTupleNetwork {
        NTupleNetwork::new(vec![
            NTuple::new(vec![(0, 0), (1, 0)]).unwrap(),
            NTuple::new(vec![(2, 2)]).unwrap(),
            NTuple::new(vec![(0, 4), (1, 4)]).unwrap(),
        ])
    }

    fn config(dir: &Path) -> TrainingConfig {
        TrainingConfig {
            num_games: 40,
            num_workers: 3,
            initial_training_games: 10,
            evaluation_window: 5,
            swap_interval: 15,
            save_interval: 20,
            report_interval: 10,
            max_moves: 60,
            seed: Some(1),
            save_path: dir.join("weights.bin"),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_checkpoint_path() {
        assert_eq!(
            checkpoint_path(Path::new("out/ntuple.bin"), 10_000),
            PathBuf::from("out/ntuple.bin.10000")
        );
    }

    #[test]
    fn test_invalid_config() {
        let config = TrainingConfig {
            num_workers: 0,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            Trainer::with_network(config, small_network()),
            Err(TrainError::Config(ConfigError::NoWorkers))
        ));
    }

    #[test]
    fn test_run_processes_every_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut trainer = Trainer::with_network(config(dir.path()), small_network()).unwrap();
        let summary = trainer.run().unwrap();

        assert_eq!(summary.games_played, 40);
        assert_eq!(summary.games_processed, 40);
        assert_eq!(summary.learner_wins + summary.opponent_wins + summary.draws, 40);
        assert!(summary.td_updates > 0);
        // warm-up promotion at game 10
        assert!(summary.promotions >= 1);
        assert_eq!(summary.role_swaps, 2);
        assert_eq!(summary.final_learner_side, Player::Black);
        assert_ne!(*trainer.network(), small_network());

        assert!(dir.path().join("weights.bin").exists());
        assert!(dir.path().join("weights.bin.20").exists());
        assert!(dir.path().join("weights.bin.40").exists());

        let mut saved = small_network();
        saved.load(dir.path().join("weights.bin")).unwrap();
        assert_eq!(saved, *trainer.network());
    }

    #[test]
    fn test_td_budget_stops_early() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainingConfig {
            num_games: 1_000,
            max_td_updates: Some(50),
            opponent: OpponentKind::Greedy,
            ..config(dir.path())
        };
        let mut trainer = Trainer::with_network(config, small_network()).unwrap();
        let summary = trainer.run().unwrap();
        assert_eq!(summary.td_updates, 50);
        assert!(summary.games_processed < 1_000);
        assert!(summary.games_played >= summary.games_processed);
    }

    #[test]
    fn test_heuristic_opponent_does_not_promote() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainingConfig {
            opponent: OpponentKind::RuleBased,
            ..config(dir.path())
        };
        let mut trainer = Trainer::with_network(config, small_network()).unwrap();
        let summary = trainer.run().unwrap();
        assert_eq!(summary.promotions, 0);
        assert_eq!(summary.games_processed, 40);
    }

    #[test]
    fn test_unwritable_checkpoint_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainingConfig {
            num_games: 4,
            save_interval: 2,
            ..config(dir.path())
        };
        // directories where the checkpoint files should go
        for game in [2, 4] {
            std::fs::create_dir(checkpoint_path(&config.save_path, game)).unwrap();
        }
        let save_path = config.save_path.clone();
        let mut trainer = Trainer::with_network(config, small_network()).unwrap();
        let summary = trainer.run().unwrap();
        assert_eq!(summary.games_processed, 4);
        assert_eq!(summary.games_played, 4);
        assert!(save_path.is_file());
    }

    #[test]
    fn test_unwritable_final_save_keeps_network() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the parent directory should be
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"").unwrap();
        let config = TrainingConfig {
            num_games: 4,
            save_interval: 2,
            save_path: blocker.join("weights.bin"),
            ..config(dir.path())
        };
        let mut trainer = Trainer::with_network(config, small_network()).unwrap();
        assert!(matches!(trainer.run(), Err(TrainError::Save(_))));
        assert_eq!(trainer.network().num_tuples(), 3);
    }
}
