//! Terrain system for BARRAGE.
//!
//! Square heightfield with nearest-sample lookups and crater deformation.

pub use barrage_core as core;

pub mod grid;

// Re-export key types for convenience.
pub use grid::{Heightfield, TerrainError};
