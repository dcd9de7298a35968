//! Tank actions.
//!
//! Every action either applies in full or is rejected with the tank left
//! untouched. Player input and the AI both go through these functions.

use hecs::World;

use barrage_core::ballistics::{launch_direction, speed_from_power};
use barrage_core::components::{Obstacle, Projectile, Tank};
use barrage_core::constants::*;
use barrage_core::error::ActionRejected;
use barrage_core::types::{bearing, horizontal_distance, wrap_angle, Vec3};
use barrage_terrain::Heightfield;

/// A standing obstacle as seen by the movement check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blocker {
    pub id: u32,
    pub position: Vec3,
    pub radius: f64,
}

/// Result of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The tank was already destroyed.
    Ignored,
    Damaged,
    /// This hit destroyed the tank.
    Destroyed,
}

/// Collect every standing obstacle in the world.
pub fn standing_blockers(world: &World) -> Vec<Blocker> {
    world
        .query::<&Obstacle>()
        .iter()
        .filter(|(_, o)| !o.destroyed)
        .map(|(_, o)| Blocker {
            id: o.id,
            position: o.position,
            radius: o.radius,
        })
        .collect()
}

/// Drive along `direction` for `dt` seconds at `TANK_MOVE_SPEED`.
///
/// Only the ground-plane part of `direction` is used. Fuel is charged per
/// unit of distance and the tank is re-seated on the terrain.
pub fn move_by(
    tank: &mut Tank,
    direction: Vec3,
    dt: f64,
    terrain: &Heightfield,
    blockers: &[Blocker],
) -> Result<(), ActionRejected> {
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    if tank.fuel <= 0.0 {
        return Err(ActionRejected::OutOfFuel);
    }
    let Some(heading) = Vec3::new(direction.x, 0.0, direction.z).try_normalize() else {
        return Ok(());
    };
    if dt <= 0.0 {
        return Ok(());
    }

    let distance = TANK_MOVE_SPEED * dt;
    let cost = distance * MOVE_FUEL_PER_UNIT;
    if tank.fuel < cost {
        return Err(ActionRejected::InsufficientFuel {
            required: cost,
            available: tank.fuel,
        });
    }

    let destination = tank.position + heading * distance;
    if destination.x.abs() > TANK_MOVE_LIMIT || destination.z.abs() > TANK_MOVE_LIMIT {
        return Err(ActionRejected::OutOfBounds {
            x: destination.x,
            z: destination.z,
        });
    }
    if let Some(blocker) = blockers.iter().find(|b| {
        horizontal_distance(destination, b.position) < b.radius + TANK_COLLISION_RADIUS
    }) {
        return Err(ActionRejected::Blocked {
            obstacle_id: blocker.id,
        });
    }

    tank.position = Vec3::new(
        destination.x,
        terrain.height_at(destination.x, destination.z) + TANK_RIDE_HEIGHT,
        destination.z,
    );
    tank.fuel = (tank.fuel - cost).max(0.0);
    Ok(())
}

/// Turn the hull. Costs fuel in proportion to the angle.
pub fn rotate_body(tank: &mut Tank, angle: f64) -> Result<(), ActionRejected> {
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    if tank.fuel <= 0.0 {
        return Err(ActionRejected::OutOfFuel);
    }
    let cost = angle.abs() * BODY_ROTATION_FUEL_PER_RADIAN;
    if tank.fuel < cost {
        return Err(ActionRejected::InsufficientFuel {
            required: cost,
            available: tank.fuel,
        });
    }
    tank.body_yaw = wrap_angle(tank.body_yaw + angle);
    tank.fuel = (tank.fuel - cost).max(0.0);
    Ok(())
}

/// Turn the turret relative to the hull. Free.
pub fn rotate_turret(tank: &mut Tank, angle: f64) -> Result<(), ActionRejected> {
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    tank.turret_yaw = wrap_angle(tank.turret_yaw + angle);
    Ok(())
}

/// Raise or lower the barrel, clamped to the gun's limits. Free.
pub fn elevate_barrel(tank: &mut Tank, delta: f64) -> Result<(), ActionRejected> {
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    tank.elevation = tank.gun.clamp_elevation(tank.elevation + delta);
    Ok(())
}

/// Nudge the power setting. Human-controlled tank only.
pub fn adjust_power(tank: &mut Tank, delta: f64) -> Result<(), ActionRejected> {
    if !tank.slot.is_player() {
        return Err(ActionRejected::NotPlayerControlled);
    }
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    tank.power = tank.gun.clamp_power(tank.power + delta);
    Ok(())
}

/// Set the power to a solved value, clamped to the gun's limits.
pub fn set_power(tank: &mut Tank, power: f64) -> Result<(), ActionRejected> {
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    tank.power = tank.gun.clamp_power(power);
    Ok(())
}

/// Swing the turret so the barrel faces `target` in the ground plane.
pub fn aim_towards(tank: &mut Tank, target: Vec3) -> Result<(), ActionRejected> {
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    tank.turret_yaw = wrap_angle(bearing(tank.position, target) - tank.body_yaw);
    Ok(())
}

/// Fire once. Returns the new projectile for the caller to spawn.
pub fn shoot(tank: &mut Tank, projectile_id: u32) -> Result<Projectile, ActionRejected> {
    if tank.destroyed {
        return Err(ActionRejected::Destroyed);
    }
    if tank.has_fired_this_turn {
        return Err(ActionRejected::AlreadyFired);
    }
    let direction = launch_direction(tank.body_yaw, tank.turret_yaw, tank.elevation);
    let velocity = direction * speed_from_power(tank.power, &tank.gun);
    tank.has_fired_this_turn = true;
    Ok(Projectile::new(
        projectile_id,
        tank.muzzle_position(),
        velocity,
        tank.slot.is_player(),
    ))
}

/// Refill fuel and re-arm at the start of the tank's turn. Power is kept.
pub fn reset_turn_stats(tank: &mut Tank) {
    tank.fuel = tank.max_fuel;
    tank.has_fired_this_turn = false;
}

/// Apply damage. Health never rises and destruction happens once.
pub fn take_damage(tank: &mut Tank, amount: i32) -> DamageOutcome {
    if tank.destroyed {
        return DamageOutcome::Ignored;
    }
    tank.health = (tank.health - amount.max(0)).max(0);
    if tank.health == 0 {
        tank.destroyed = true;
        DamageOutcome::Destroyed
    } else {
        DamageOutcome::Damaged
    }
}
