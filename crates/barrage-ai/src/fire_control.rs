//! Fire control: turns a decision into concrete gun and drive settings.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use barrage_core::ballistics::{elevation_for_range, power_for_range, speed_from_power};
use barrage_core::components::Tank;
use barrage_core::constants::*;
use barrage_core::types::{bearing, horizontal_distance, Vec3};

use crate::profiles::DifficultyProfile;

/// Gun settings for one AI shot, applied after the turret faces the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    /// Absolute barrel elevation, already clamped.
    pub elevation: f64,
    /// Absolute power, already clamped.
    pub power: f64,
    /// Extra turret yaw added on top of facing the target.
    pub turret_scatter: f64,
}

/// A drive toward a point, bounded by distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlan {
    pub destination: Vec3,
    /// Ground-plane unit vector.
    pub direction: Vec3,
    /// Distance the tank may cover this turn.
    pub budget: f64,
}

/// Passes of the muzzle-relative solve. The barrel tip moves with the angle,
/// so each pass re-measures from where the previous one put it.
const MUZZLE_SOLVE_PASSES: usize = 3;

/// Elevation that would land a shot at the tank's current power on `target`,
/// with the turret turned to face it.
///
/// Range and height are measured from the barrel tip, not the hull origin.
pub fn ideal_elevation(shooter: &Tank, target: Vec3) -> f64 {
    let yaw = bearing(shooter.position, target);
    let speed = speed_from_power(shooter.power, &shooter.gun);
    let mut elevation = 0.0;
    for _ in 0..MUZZLE_SOLVE_PASSES {
        let muzzle = shooter.muzzle_position_at(yaw, elevation);
        elevation = elevation_for_range(
            horizontal_distance(muzzle, target),
            target.y - muzzle.y,
            speed,
            &shooter.gun,
        );
    }
    elevation
}

/// Solve a shot at `target` and perturb it by the shooter's inaccuracy.
///
/// Scatter spans `(1 − accuracy) · AI_SCATTER_SPAN` on elevation and half
/// that on turret yaw. Power is solved for the scattered elevation.
pub fn plan_shot(shooter: &Tank, target: Vec3, accuracy: f64, rng: &mut ChaCha8Rng) -> ShotPlan {
    let gun = &shooter.gun;
    let distance = shooter.position.distance(target);
    let optimal = ideal_elevation(shooter, target);

    let max_scatter = (1.0 - accuracy) * AI_SCATTER_SPAN;
    let elevation_scatter = (rng.gen::<f64>() - 0.5) * max_scatter;
    let elevation = gun.clamp_elevation(optimal + elevation_scatter);

    let power = gun.clamp_power(power_for_range(distance, elevation, gun));

    let turret_scatter = if accuracy < 1.0 {
        (rng.gen::<f64>() - 0.5) * max_scatter * 0.5
    } else {
        0.0
    };

    debug!(
        distance,
        elevation_deg = elevation.to_degrees(),
        power,
        accuracy,
        "ai shot solution"
    );

    ShotPlan {
        elevation,
        power,
        turret_scatter,
    }
}

/// Elevation change for an aim-only turn: toward the ideal angle, rate limited.
pub fn aim_step(shooter: &Tank, target: Vec3) -> f64 {
    let desired = shooter.gun.clamp_elevation(ideal_elevation(shooter, target));
    let diff = desired - shooter.elevation;
    let max_step = TANK_BARREL_ELEVATE_SPEED * AI_AIM_STEP_FACTOR;
    diff.signum() * diff.abs().min(max_step)
}

/// Drive plan toward `destination`, or `None` when there is nowhere to go.
///
/// Budget is `min(fuel / AI_FUEL_DISTANCE_DIVISOR, distance) · fuel_efficiency`.
pub fn plan_move(tank: &Tank, destination: Vec3, profile: &DifficultyProfile) -> Option<MovePlan> {
    if tank.fuel <= 0.0 {
        return None;
    }
    let flat = Vec3::new(
        destination.x - tank.position.x,
        0.0,
        destination.z - tank.position.z,
    );
    let direction = flat.try_normalize()?;
    let reach = (tank.fuel / AI_FUEL_DISTANCE_DIVISOR).min(tank.position.distance(destination));
    let budget = reach * profile.fuel_efficiency;
    if budget <= 0.0 {
        return None;
    }
    Some(MovePlan {
        destination,
        direction,
        budget,
    })
}
