//! Fundamental geometric and simulation types.
//!
//! World space is y-up: the ground plane is x/z and heights are y.
//! Yaw 0 faces +z and increases toward +x.

use serde::{Deserialize, Serialize};

pub use glam::DVec3 as Vec3;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * crate::constants::DT;
    }
}

/// Distance between two points projected onto the ground plane.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

/// Yaw that faces from `from` toward `to` in the ground plane.
pub fn bearing(from: Vec3, to: Vec3) -> f64 {
    (to.x - from.x).atan2(to.z - from.z)
}

/// Unit vector in the ground plane pointing along `yaw`.
pub fn heading_vector(yaw: f64) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Wrap an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU)
        - std::f64::consts::PI;
    if wrapped <= -std::f64::consts::PI {
        wrapped + std::f64::consts::TAU
    } else {
        wrapped
    }
}
