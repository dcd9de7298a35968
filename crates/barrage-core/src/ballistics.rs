//! Ballistics solver.
//!
//! Pure numeric functions over a `GunSpec`. Projectiles fly under constant
//! gravity with no drag, so every solution here is closed-form. The solver
//! never fails: unreachable targets fall back to 45 degrees and all angles
//! come back clamped to the gun's elevation limits.

use glam::DQuat;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::Vec3;

/// Power, muzzle speed and elevation limits of a tank gun.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GunSpec {
    pub min_power: f64,
    pub max_power: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
}

impl Default for GunSpec {
    fn default() -> Self {
        Self {
            min_power: POWER_MIN,
            max_power: POWER_MAX,
            min_speed: PROJECTILE_SPEED_MIN,
            max_speed: PROJECTILE_SPEED_MAX,
            min_elevation: ELEVATION_MIN,
            max_elevation: ELEVATION_MAX,
        }
    }
}

impl GunSpec {
    pub fn clamp_power(&self, power: f64) -> f64 {
        power.clamp(self.min_power, self.max_power)
    }

    pub fn clamp_elevation(&self, elevation: f64) -> f64 {
        elevation.clamp(self.min_elevation, self.max_elevation)
    }
}

/// Muzzle speed for a power setting. Linear between the gun's speed limits.
pub fn speed_from_power(power: f64, gun: &GunSpec) -> f64 {
    let ratio = (power - gun.min_power) / (gun.max_power - gun.min_power);
    gun.min_speed + ratio * (gun.max_speed - gun.min_speed)
}

/// Inverse of [`speed_from_power`]. Not clamped.
pub fn power_for_speed(speed: f64, gun: &GunSpec) -> f64 {
    let ratio = (speed - gun.min_speed) / (gun.max_speed - gun.min_speed);
    gun.min_power + ratio * (gun.max_power - gun.min_power)
}

/// Flat-ground range of a shot.
pub fn range_for(speed: f64, elevation: f64) -> f64 {
    speed * speed * (2.0 * elevation).sin() / GRAVITY
}

/// Elevation that lands a shot of `speed` on a target `horizontal_distance`
/// away and `height_diff` above the muzzle.
///
/// Solves `tan θ = (v² ± √(v⁴ − g(g·x² + 2·h·v²))) / (g·x)` and keeps the
/// flatter root. A negative discriminant means the target is out of reach,
/// in which case 45 degrees is returned.
pub fn elevation_for_range(
    horizontal_distance: f64,
    height_diff: f64,
    speed: f64,
    gun: &GunSpec,
) -> f64 {
    let x = horizontal_distance.max(SOLVER_MIN_DISTANCE);
    let v2 = speed * speed;
    let discriminant = v2 * v2 - GRAVITY * (GRAVITY * x * x + 2.0 * height_diff * v2);

    if discriminant < 0.0 {
        return gun.clamp_elevation(FALLBACK_ELEVATION);
    }

    let low = ((v2 - discriminant.sqrt()) / (GRAVITY * x)).atan();
    gun.clamp_elevation(low)
}

/// Muzzle speed that carries a shot `distance` over flat ground at `elevation`.
///
/// Returns `None` when `sin 2θ` is not positive, i.e. the barrel is level or
/// pointing down and no finite speed reaches the target.
pub fn required_speed_for_range(distance: f64, elevation: f64) -> Option<f64> {
    let sin_2theta = (2.0 * elevation).sin();
    if sin_2theta <= 1e-9 {
        return None;
    }
    Some((GRAVITY * distance / sin_2theta).sqrt())
}

/// Power setting for a shot of `distance` at `elevation`.
///
/// Inverts `x = v²·sin 2θ / g`, maps the speed back to power and scales by
/// `POWER_OVERSHOOT_FACTOR`. Always within the gun's power limits.
pub fn power_for_range(distance: f64, elevation: f64, gun: &GunSpec) -> f64 {
    let distance = distance.max(SOLVER_MIN_DISTANCE);
    match required_speed_for_range(distance, elevation) {
        Some(speed) => gun.clamp_power(power_for_speed(speed, gun) * POWER_OVERSHOOT_FACTOR),
        // Level barrel needs unbounded speed; a depressed one lobs nothing.
        None if elevation >= 0.0 => gun.max_power,
        None => gun.min_power,
    }
}

/// World-space unit vector the barrel points along.
///
/// Composes hull yaw, turret yaw and barrel elevation (positive = up).
pub fn launch_direction(body_yaw: f64, turret_yaw: f64, elevation: f64) -> Vec3 {
    let rotation = DQuat::from_rotation_y(body_yaw)
        * DQuat::from_rotation_y(turret_yaw)
        * DQuat::from_rotation_x(-elevation);
    (rotation * Vec3::Z).normalize()
}
