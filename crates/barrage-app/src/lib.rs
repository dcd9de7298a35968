//! BARRAGE headless runner.
//!
//! Wires the simulation crates into a command-line spectator: the engine
//! runs on its own game-loop thread and both sides are played by the AI.

pub mod config;
pub mod game_loop;
pub mod state;
pub mod telemetry;

pub use barrage_core as core;
