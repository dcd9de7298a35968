//! Heightfield: elevation queries and in-place crater deformation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use barrage_core::constants::{TERRAIN_SEGMENTS, TERRAIN_SIZE};
use barrage_core::types::Vec3;

#[derive(Debug, Error, PartialEq)]
pub enum TerrainError {
    #[error("expected {expected} height samples, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
    #[error("terrain needs at least one segment")]
    NoSegments,
}

/// Square heightfield centered on the origin.
///
/// `(segments + 1)²` samples, row-major with x varying fastest.
/// Sample `(gx, gz)` sits at world `(-size/2 + gx·cell, -size/2 + gz·cell)`.
/// Heights are never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heightfield {
    size: f64,
    segments: usize,
    heights: Vec<f64>,
    revision: u64,
    dirty: bool,
}

impl Default for Heightfield {
    fn default() -> Self {
        Self::flat(TERRAIN_SIZE, TERRAIN_SEGMENTS, 0.0)
    }
}

impl Heightfield {
    /// Uniform heightfield.
    pub fn flat(size: f64, segments: usize, height: f64) -> Self {
        let segments = segments.max(1);
        let side = segments + 1;
        Self {
            size,
            segments,
            heights: vec![height.max(0.0); side * side],
            revision: 0,
            dirty: false,
        }
    }

    /// Heightfield from pre-computed samples. Negative or NaN samples become 0.
    pub fn from_heights(
        size: f64,
        segments: usize,
        heights: Vec<f64>,
    ) -> Result<Self, TerrainError> {
        if segments == 0 {
            return Err(TerrainError::NoSegments);
        }
        let expected = (segments + 1) * (segments + 1);
        if heights.len() != expected {
            return Err(TerrainError::SampleCountMismatch {
                expected,
                actual: heights.len(),
            });
        }
        let heights = heights
            .into_iter()
            .map(|h| if h.is_nan() { 0.0 } else { h.max(0.0) })
            .collect();
        Ok(Self {
            size,
            segments,
            heights,
            revision: 0,
            dirty: false,
        })
    }

    /// Build by evaluating `f(x, z)` at every sample position.
    pub fn from_fn(size: f64, segments: usize, mut f: impl FnMut(f64, f64) -> f64) -> Self {
        let mut field = Self::flat(size, segments, 0.0);
        let side = field.samples_per_side();
        for gz in 0..side {
            for gx in 0..side {
                let (x, z) = field.sample_position(gx, gz);
                let h = f(x, z);
                field.heights[gx + gz * side] = if h.is_nan() { 0.0 } else { h.max(0.0) };
            }
        }
        field
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn samples_per_side(&self) -> usize {
        self.segments + 1
    }

    /// Distance between adjacent samples.
    pub fn cell_size(&self) -> f64 {
        self.size / self.segments as f64
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// World x/z of sample `(gx, gz)`.
    pub fn sample_position(&self, gx: usize, gz: usize) -> (f64, f64) {
        let half = self.size / 2.0;
        let cell = self.cell_size();
        (-half + gx as f64 * cell, -half + gz as f64 * cell)
    }

    /// Whether `(x, z)` lies on the footprint.
    pub fn contains(&self, x: f64, z: f64) -> bool {
        let half = self.size / 2.0;
        x.abs() <= half && z.abs() <= half
    }

    /// Terrain height at a world position.
    ///
    /// Buckets the position onto the sample grid by flooring. Returns 0
    /// outside the footprint or for non-finite input.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        if !x.is_finite() || !z.is_finite() || !self.contains(x, z) {
            return 0.0;
        }
        let half = self.size / 2.0;
        let cell = self.cell_size();
        let gx = ((x + half) / cell).floor() as usize;
        let gz = ((z + half) / cell).floor() as usize;
        let side = self.samples_per_side();
        if gx >= side || gz >= side {
            return 0.0;
        }
        self.heights[gx + gz * side]
    }

    /// Carve a crater centered on `impact`.
    ///
    /// Every sample within `radius` of the impact (in the ground plane) is
    /// lowered by `depth·(1 − d/r)²` and clamped at 0. Returns whether any
    /// sample was touched.
    pub fn deform(&mut self, impact: Vec3, radius: f64, depth: f64) -> bool {
        if radius <= 0.0 || !impact.x.is_finite() || !impact.z.is_finite() {
            return false;
        }
        let depth = depth.abs();
        let half = self.size / 2.0;
        let cell = self.cell_size();
        let side = self.samples_per_side();
        let max_index = self.segments as f64;

        let gx_lo = ((impact.x - radius + half) / cell).floor().clamp(0.0, max_index) as usize;
        let gx_hi = ((impact.x + radius + half) / cell).ceil().clamp(0.0, max_index) as usize;
        let gz_lo = ((impact.z - radius + half) / cell).floor().clamp(0.0, max_index) as usize;
        let gz_hi = ((impact.z + radius + half) / cell).ceil().clamp(0.0, max_index) as usize;

        let radius_sq = radius * radius;
        let mut deformed = false;
        for gz in gz_lo..=gz_hi {
            for gx in gx_lo..=gx_hi {
                let (x, z) = self.sample_position(gx, gz);
                let dx = x - impact.x;
                let dz = z - impact.z;
                let dist_sq = dx * dx + dz * dz;
                if dist_sq < radius_sq {
                    let falloff = 1.0 - dist_sq.sqrt() / radius;
                    let cell_height = &mut self.heights[gx + gz * side];
                    *cell_height = (*cell_height - depth * falloff * falloff).max(0.0);
                    deformed = true;
                }
            }
        }

        if deformed {
            self.revision += 1;
            self.dirty = true;
        }
        deformed
    }

    /// Number of effective deformations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Highest sample.
    pub fn max_height(&self) -> f64 {
        self.heights.iter().copied().fold(0.0, f64::max)
    }
}
