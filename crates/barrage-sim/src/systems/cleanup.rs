//! Cleanup system: despawns retired shells and finished obstacles.

use hecs::{Entity, World};
use tracing::trace;

use barrage_core::components::Projectile;
use barrage_core::events::SceneEvent;

use crate::outbox::Outbox;

/// Despawn everything queued on `despawn_buffer` plus every retired shell.
///
/// The buffer may already hold entities queued by earlier systems this tick.
pub fn run(world: &mut World, outbox: &mut Outbox, despawn_buffer: &mut Vec<Entity>) {
    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if let Some(reason) = projectile.removed {
            outbox.scene(SceneEvent::ProjectileRemoved {
                id: projectile.id,
                reason,
            });
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        if let Err(err) = world.despawn(entity) {
            trace!(?entity, %err, "already despawned");
        }
    }
}
