use std::path::PathBuf;

use clap::{Parser, Subcommand};

use self::{evaluate::EvaluateArg, show::ShowArg, train::TrainArg};
use crate::logging;

mod evaluate;
mod show;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Also write logs to files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train an N-tuple network by concurrent self-play
    Train(#[clap(flatten)] TrainArg),
    /// Play trained weights against another policy
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Print the opening position and its moves
    Show(#[clap(flatten)] ShowArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let _logger = logging::init(args.log_dir.as_deref())?;
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Show(arg) => show::run(&arg)?,
    }
    Ok(())
}
