//! Runner configuration: an optional TOML file overlaid by CLI flags.
//!
//! ```toml
//! [sim]
//! seed = 7
//! difficulty = "veteran"
//! enemy_count = 3
//!
//! [run]
//! max_ticks = 36000
//! realtime = false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use barrage_core::constants::TICK_RATE;
use barrage_core::enums::Difficulty;
use barrage_sim::SimConfig;

/// Ten minutes of simulated play.
pub const DEFAULT_MAX_TICKS: u64 = 10 * 60 * TICK_RATE as u64;

/// How the runner drives the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Stop after this many ticks even if the match is still going.
    pub max_ticks: u64,
    /// Pace ticks to wall-clock time instead of running flat out.
    pub realtime: bool,
    /// Print every snapshot as a JSON line on stdout.
    pub json: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_ticks: DEFAULT_MAX_TICKS,
            realtime: false,
            json: false,
        }
    }
}

/// Everything the runner needs to play one match.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub sim: SimConfig,
    pub run: RunSettings,
}

/// Values given on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub difficulty: Option<Difficulty>,
    pub max_ticks: Option<u64>,
    pub json: bool,
    pub realtime: bool,
}

impl RunConfig {
    /// Parse a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse run config toml contents")
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Apply command-line overrides. The runner always plays both sides.
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(seed) = overrides.seed {
            self.sim.seed = seed;
        }
        if let Some(difficulty) = overrides.difficulty {
            self.sim.difficulty = difficulty;
        }
        if let Some(max_ticks) = overrides.max_ticks {
            self.run.max_ticks = max_ticks;
        }
        self.run.json |= overrides.json;
        self.run.realtime |= overrides.realtime;
        self.sim.autopilot = true;
        self
    }
}
