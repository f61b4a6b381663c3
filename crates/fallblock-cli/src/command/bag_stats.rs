use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use fallblock_engine::{PieceKind, PieceSeed, Randomizer};
use rand::Rng as _;
use serde::Serialize;

use crate::{command::OutputFormat, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BagStatsArg {
    /// Seed for the piece sequence (32 hex digits); random if omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Number of bags to sample
    #[arg(long, default_value_t = 10_000)]
    bags: usize,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct BagStats {
    seed: PieceSeed,
    bags: usize,
    /// Bags that were not a permutation of the seven kinds. Always zero.
    malformed_bags: usize,
    kinds: Vec<KindStats>,
}

#[derive(Debug, Clone, Serialize)]
struct KindStats {
    kind: PieceKind,
    /// How many bags dealt this kind at each position.
    by_position: [usize; PieceKind::LEN],
}

impl BagStats {
    fn sample(seed: PieceSeed, bags: usize) -> Self {
        let mut randomizer = Randomizer::with_seed(seed);
        let mut counts = [[0; PieceKind::LEN]; PieceKind::LEN];
        let mut malformed_bags = 0;
        for _ in 0..bags {
            let mut seen = [false; PieceKind::LEN];
            for position in 0..PieceKind::LEN {
                let kind = randomizer.next_kind();
                seen[kind.index()] = true;
                counts[kind.index()][position] += 1;
            }
            if seen.contains(&false) {
                malformed_bags += 1;
            }
        }
        let kinds = PieceKind::ALL
            .into_iter()
            .zip(counts)
            .map(|(kind, by_position)| KindStats { kind, by_position })
            .collect();
        Self {
            seed,
            bags,
            malformed_bags,
            kinds,
        }
    }

    /// Largest relative deviation of any cell from the uniform expectation.
    #[expect(clippy::cast_precision_loss)]
    fn max_deviation(&self) -> f64 {
        let expected = self.bags as f64 / PieceKind::LEN as f64;
        self.kinds
            .iter()
            .flat_map(|kind| kind.by_position)
            .map(|count| (count as f64 - expected).abs() / expected)
            .fold(0.0, f64::max)
    }

    fn write_text(&self, out: &mut Output) -> std::io::Result<()> {
        writeln!(out, "seed: {}  bags: {}", self.seed, self.bags)?;
        write!(out, "kind")?;
        for position in 0..PieceKind::LEN {
            write!(out, " {:>7}", format!("pos{position}"))?;
        }
        writeln!(out)?;
        for kind in &self.kinds {
            write!(out, "{:<4}", kind.kind.as_char())?;
            for count in kind.by_position {
                write!(out, " {count:>7}")?;
            }
            writeln!(out)?;
        }
        writeln!(out, "malformed bags: {}", self.malformed_bags)?;
        writeln!(
            out,
            "max deviation from uniform: {:.2}%",
            self.max_deviation() * 100.0
        )?;
        out.flush()
    }
}

pub(crate) fn run(arg: &BagStatsArg) -> anyhow::Result<()> {
    let BagStatsArg {
        seed,
        bags,
        format,
        output,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let stats = BagStats::sample(seed, *bags);
    match format {
        OutputFormat::Json => Output::save_json(&stats, output.clone())?,
        OutputFormat::Text => {
            let mut out = Output::from_output_path(output.clone())?;
            stats
                .write_text(&mut out)
                .with_context(|| format!("Failed to write to {}", out.display_path()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_counts_every_position_once_per_bag() {
        let stats = BagStats::sample(PieceSeed::from_bytes([9; 16]), 700);
        assert_eq!(stats.malformed_bags, 0);
        for position in 0..PieceKind::LEN {
            let total: usize = stats.kinds.iter().map(|k| k.by_position[position]).sum();
            assert_eq!(total, 700);
        }
        for kind in &stats.kinds {
            assert_eq!(kind.by_position.iter().sum::<usize>(), 700);
        }
        assert!(stats.max_deviation() < 0.5);
    }
}
