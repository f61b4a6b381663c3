use std::{fs, io::Write as _, path::PathBuf};

use anyhow::{Context as _, bail};
use fallblock_engine::{Action, ActionOutcome, GameSession, PieceSeed};
use tracing::{debug, info, warn};

use crate::{command::OutputFormat, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex digits); random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Action script: `<` `>` move, `v` soft drop, `x` `z` `a` rotate
    /// CW/CCW/180, `c` hold, space hard drop. Other characters are ignored
    #[arg(long, default_value = "", conflicts_with = "actions_file")]
    actions: String,
    /// Read the action script from a file
    #[arg(long)]
    actions_file: Option<PathBuf>,
    /// Fail on the first rejected action instead of skipping it
    #[arg(long)]
    strict: bool,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        actions,
        actions_file,
        strict,
        format,
        output,
    } = arg;

    let script = match actions_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read action script: {}", path.display()))?,
        None => actions.clone(),
    };

    let mut session = match seed {
        Some(seed) => GameSession::with_seed(*seed),
        None => GameSession::new(),
    };
    info!(seed = %session.seed(), "session started");

    for (step, action) in Action::parse_script(&script).enumerate() {
        if session.is_topped_out() {
            warn!(step, "game topped out, ignoring the rest of the script");
            break;
        }
        match session.apply(action) {
            Ok(ActionOutcome::Locked(lock)) => {
                debug!(step, %action, cleared_lines = lock.cleared_lines(), "locked");
            }
            Ok(outcome) => debug!(step, %action, ?outcome, "applied"),
            Err(err) if *strict => bail!("action #{step} ({action}) rejected: {err}"),
            Err(err) => debug!(step, %action, %err, "rejected"),
        }
    }

    let snapshot = session.snapshot();
    match format {
        OutputFormat::Json => Output::save_json(&snapshot, output.clone())?,
        OutputFormat::Text => {
            let mut out = Output::from_output_path(output.clone())?;
            writeln!(out, "{snapshot}")
                .with_context(|| format!("Failed to write to {}", out.display_path()))?;
            out.flush()
                .with_context(|| format!("Failed to flush output to {}", out.display_path()))?;
        }
    }
    Ok(())
}
