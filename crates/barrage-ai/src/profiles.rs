//! Difficulty-specific behavioral profiles.
//!
//! Consolidates per-difficulty parameters for the decision rules, fire
//! control and the player's starting handicap.

use serde::{Deserialize, Serialize};

use barrage_core::constants::{AI_TURN_DELAY_BASE, AI_TURN_DELAY_MIN, AI_TURN_DELAY_STRATEGIC};
use barrage_core::enums::Difficulty;

/// Behavioral profile for a difficulty tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub name: String,
    /// Seconds an AI tank waits at the start of its turn before deciding.
    pub reaction_secs: f64,
    /// 0..=1. Drives shot scatter.
    pub aim_accuracy: f64,
    /// 0..=1. Gates retreating, cover seeking and flanking.
    pub strategic_thinking: f64,
    /// 0..=1. Carried for tuning; the rules do not read it yet.
    pub aggressiveness: f64,
    /// 0..=1. Fraction of the fuel-bounded move distance actually driven.
    pub fuel_efficiency: f64,
    /// 0..=1. Chance per turn of heading for cover when exposed.
    pub cover_usage: f64,
    /// Added to the player tank's max health.
    pub player_health_bonus: i32,
    /// Added to the player tank's max fuel.
    pub player_fuel_bonus: f64,
}

impl DifficultyProfile {
    /// Pause after an AI decision before the turn passes on.
    pub fn turn_delay_secs(&self) -> f64 {
        (AI_TURN_DELAY_BASE - self.strategic_thinking * AI_TURN_DELAY_STRATEGIC)
            .max(AI_TURN_DELAY_MIN)
    }
}

/// Get the profile for a difficulty tier.
pub fn get_profile(difficulty: Difficulty) -> DifficultyProfile {
    match difficulty {
        Difficulty::Beginner => DifficultyProfile {
            name: difficulty.display_name().to_string(),
            reaction_secs: 2.0,
            aim_accuracy: 0.3,
            strategic_thinking: 0.2,
            aggressiveness: 0.3,
            fuel_efficiency: 0.6,
            cover_usage: 0.3,
            player_health_bonus: 50,
            player_fuel_bonus: 50.0,
        },
        Difficulty::Professional => DifficultyProfile {
            name: difficulty.display_name().to_string(),
            reaction_secs: 1.2,
            aim_accuracy: 0.7,
            strategic_thinking: 0.6,
            aggressiveness: 0.6,
            fuel_efficiency: 0.8,
            cover_usage: 0.7,
            player_health_bonus: 0,
            player_fuel_bonus: 0.0,
        },
        Difficulty::Veteran => DifficultyProfile {
            name: difficulty.display_name().to_string(),
            reaction_secs: 0.6,
            aim_accuracy: 0.95,
            strategic_thinking: 0.9,
            aggressiveness: 0.8,
            fuel_efficiency: 0.95,
            cover_usage: 0.9,
            player_health_bonus: -25,
            player_fuel_bonus: -25.0,
        },
    }
}
