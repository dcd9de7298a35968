use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use barrage_app::config::{Overrides, RunConfig};
use barrage_app::game_loop::spawn_game_loop;
use barrage_app::telemetry::init_tracing;
use barrage_core::enums::{Difficulty, Outcome};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Beginner,
    Professional,
    Veteran,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Beginner => Difficulty::Beginner,
            DifficultyArg::Professional => Difficulty::Professional,
            DifficultyArg::Veteran => Difficulty::Veteran,
        }
    }
}

/// Watch the AI play a full BARRAGE match against itself.
#[derive(Debug, Parser)]
#[command(name = "barrage", version, about)]
struct Cli {
    /// TOML file with `[sim]` and `[run]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed; the same seed replays the same match.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,
    /// Stop after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Print one JSON snapshot per tick on stdout.
    #[arg(long)]
    json: bool,
    /// Run at wall-clock speed instead of as fast as possible.
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = RunConfig::load(cli.config.as_deref())?.apply(&Overrides {
        seed: cli.seed,
        difficulty: cli.difficulty.map(Difficulty::from),
        max_ticks: cli.max_ticks,
        json: cli.json,
        realtime: cli.realtime,
    });
    info!(
        seed = config.sim.seed,
        difficulty = config.sim.difficulty.display_name(),
        max_ticks = config.run.max_ticks,
        "starting match"
    );

    let json = config.run.json;
    let handle = spawn_game_loop(config).context("failed to spawn game loop thread")?;

    if json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for snapshot in handle.snapshots.iter() {
            let line = serde_json::to_string(&snapshot).context("failed to serialize snapshot")?;
            writeln!(out, "{line}").context("failed to write snapshot")?;
        }
    }

    let summary = handle
        .thread
        .join()
        .map_err(|_| anyhow!("game loop thread panicked"))?;

    let verdict = match summary.outcome {
        Some(Outcome::Victory) => "victory",
        Some(Outcome::Defeat) => "defeat",
        None => "unfinished",
    };
    eprintln!(
        "{verdict} after {} ticks ({:.1}s simulated, {} shots){}",
        summary.ticks,
        summary.elapsed_secs,
        summary.shots_fired,
        summary
            .message
            .map(|m| format!(": {m}"))
            .unwrap_or_default()
    );
    Ok(())
}
