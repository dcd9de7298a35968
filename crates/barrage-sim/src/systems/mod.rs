//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! Long-lived state stays in components or in the engine.

pub mod ai_turn;
pub mod cleanup;
pub mod collision;
pub mod effects;
pub mod input;
pub mod projectiles;
pub mod snapshot;

use hecs::{Entity, World};

use barrage_core::components::Tank;
use barrage_core::enums::TurnSlot;

/// Entity of the tank occupying `slot`.
pub fn tank_entity(world: &World, slot: TurnSlot) -> Option<Entity> {
    world
        .query::<&Tank>()
        .iter()
        .find(|(_, tank)| tank.slot == slot)
        .map(|(entity, _)| entity)
}
