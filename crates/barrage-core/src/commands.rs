//! Player commands sent from the front end to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Round control ---
    /// Pick a difficulty and start a round.
    SelectDifficulty { difficulty: Difficulty },
    /// Leave the finished round and go back to difficulty selection.
    ReturnToMenu,

    // --- Tank control ---
    /// Press or release a held control.
    SetIntent { intent: Intent, active: bool },
    /// Fire the gun once.
    Fire,
    /// Hand the turn to the next tank.
    EndTurn,
}
