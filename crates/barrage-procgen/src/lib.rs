//! Seeded procedural generation for BARRAGE rounds.
//!
//! Island heightfield, building and tree layout, and tank spawn points.
//! Everything draws from the caller's `ChaCha8Rng`, so a seed fully
//! determines a round.

pub mod island;
pub mod layout;
pub mod spawn;

pub use island::generate_island;
pub use layout::{place_buildings, place_trees};
pub use spawn::{place_tanks, Clearance, SpawnPoint};
