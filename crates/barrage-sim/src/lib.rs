//! Simulation engine for BARRAGE.
//!
//! Owns the hecs ECS world and the terrain, runs the turn state machine
//! and all systems at a fixed tick rate, and produces GameStateSnapshots
//! for the front end.

pub mod actions;
pub mod engine;
pub mod outbox;
pub mod systems;
pub mod turn;
pub mod world_setup;

pub use barrage_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
