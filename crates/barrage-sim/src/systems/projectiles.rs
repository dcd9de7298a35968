//! Shell flight: ballistic integration and launch.

use hecs::World;
use tracing::info;

use barrage_core::components::{Projectile, Tank};
use barrage_core::constants::{GRAVITY, PROJECTILE_BOUNDS, PROJECTILE_FLOOR_Y};
use barrage_core::enums::{RemovalReason, TurnSlot};
use barrage_core::error::ActionRejected;
use barrage_core::events::{AudioEvent, SceneEvent};

use crate::actions;
use crate::outbox::Outbox;

/// Integrate one step of flight: gravity, then position, then age.
///
/// Removed shells and non-positive steps are left alone.
pub fn advance(projectile: &mut Projectile, dt: f64) {
    if !projectile.is_live() || dt <= 0.0 {
        return;
    }
    projectile.velocity.y -= GRAVITY * dt;
    projectile.position += projectile.velocity * dt;
    projectile.age += dt;

    let p = projectile.position;
    if projectile.age > projectile.lifespan {
        projectile.removed = Some(RemovalReason::Expired);
    } else if p.x.abs() > PROJECTILE_BOUNDS
        || p.z.abs() > PROJECTILE_BOUNDS
        || p.y < PROJECTILE_FLOOR_Y
    {
        projectile.removed = Some(RemovalReason::OutOfBounds);
    }
}

/// Advance every shell in flight.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        advance(projectile, dt);
    }
}

/// Fire the gun of the tank in `slot` and spawn the shell.
pub fn fire(
    world: &mut World,
    slot: TurnSlot,
    next_projectile_id: &mut u32,
    outbox: &mut Outbox,
) -> Result<u32, ActionRejected> {
    let entity = super::tank_entity(world, slot).ok_or(ActionRejected::Destroyed)?;
    let projectile = {
        let mut tank = world
            .get::<&mut Tank>(entity)
            .map_err(|_| ActionRejected::Destroyed)?;
        actions::shoot(&mut tank, *next_projectile_id)?
    };
    *next_projectile_id += 1;

    let id = projectile.id;
    info!(?slot, id, speed = projectile.velocity.length(), "tank fired");
    outbox.audio(AudioEvent::Shoot {
        by_player: projectile.fired_by_player,
    });
    outbox.scene(SceneEvent::ProjectileSpawned {
        id,
        position: projectile.position,
        by_player: projectile.fired_by_player,
    });
    world.spawn((projectile,));
    Ok(id)
}

/// Retire every shell still in flight.
pub fn expire_all(world: &mut World) {
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        if projectile.is_live() {
            projectile.removed = Some(RemovalReason::Expired);
        }
    }
}
