//! Messages exchanged between the main thread and the game loop thread.

use barrage_core::commands::PlayerCommand;
use barrage_core::enums::{Difficulty, Outcome};

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub difficulty: Difficulty,
    pub outcome: Option<Outcome>,
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub shots_fired: u32,
    /// Last game-over message shown to the player, if any.
    pub message: Option<String>,
}
