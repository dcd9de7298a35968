//! Opponent AI for BARRAGE.
//!
//! Difficulty profiles, battlefield assessment (sight lines, cover,
//! flanking), the ranked decision rules and fire control. No ECS
//! dependency: everything operates on plain data.

pub mod decision;
pub mod fire_control;
pub mod profiles;
pub mod sight;

pub use barrage_core as core;
pub use decision::{decide, AiDecision, Situation};
pub use profiles::{get_profile, DifficultyProfile};
