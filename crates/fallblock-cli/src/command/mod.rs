use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::prelude::*;

use self::{bag_stats::BagStatsArg, play::PlayArg};

mod bag_stats;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play an action script headlessly and print the final state
    Play(#[clap(flatten)] PlayArg),
    /// Sample bags and report how often each kind lands at each position
    BagStats(#[clap(flatten)] BagStatsArg),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::BagStats(arg) => bag_stats::run(&arg)?,
    }
    Ok(())
}
