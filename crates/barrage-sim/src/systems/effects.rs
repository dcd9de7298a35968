//! Timed destruction effects and camera shake.
//!
//! Wrecks sink and fade, buildings collapse, trees fall, lie and fade.
//! Each stage is a countdown carried in a `Decay` component.

use hecs::{Entity, World};
use tracing::debug;

use barrage_core::components::{Decay, Obstacle, Tank};
use barrage_core::constants::*;
use barrage_core::enums::DestructionStage;
use barrage_core::events::SceneEvent;
use barrage_core::state::CameraShakeView;

use crate::outbox::Outbox;

/// Screen shake requested by a tank kill, decaying linearly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    pub intensity: f64,
    pub duration_secs: f64,
    pub remaining_secs: f64,
}

impl CameraShake {
    /// Restart the shake. A new kill overrides whatever is left.
    pub fn trigger(&mut self, intensity: f64, duration_secs: f64) {
        self.intensity = intensity;
        self.duration_secs = duration_secs;
        self.remaining_secs = duration_secs;
    }

    pub fn update(&mut self, dt: f64) {
        self.remaining_secs = (self.remaining_secs - dt).max(0.0);
    }

    pub fn view(&self) -> Option<CameraShakeView> {
        if self.remaining_secs <= 0.0 || self.duration_secs <= 0.0 {
            return None;
        }
        Some(CameraShakeView {
            intensity: self.intensity * self.remaining_secs / self.duration_secs,
            remaining_secs: self.remaining_secs,
        })
    }
}

/// Length of a destruction stage.
pub fn stage_duration(stage: DestructionStage) -> f64 {
    match stage {
        DestructionStage::Collapsing => BUILDING_COLLAPSE_SECS,
        DestructionStage::Falling => TREE_FALL_SECS,
        DestructionStage::Lying => TREE_LINGER_SECS,
        DestructionStage::Fading => TREE_FADE_SECS,
        DestructionStage::Sinking => TANK_WRECK_SECS,
    }
}

/// Stage that follows `stage`, or `None` when the entity is gone.
fn next_stage(stage: DestructionStage) -> Option<DestructionStage> {
    match stage {
        DestructionStage::Falling => Some(DestructionStage::Lying),
        DestructionStage::Lying => Some(DestructionStage::Fading),
        DestructionStage::Collapsing | DestructionStage::Fading | DestructionStage::Sinking => {
            None
        }
    }
}

/// Advance one countdown. Returns true when the final stage has elapsed.
fn step(decay: &mut Decay, dt: f64) -> bool {
    decay.remaining_secs -= dt;
    let duration = stage_duration(decay.stage);
    if decay.remaining_secs > 0.0 {
        decay.progress = (1.0 - decay.remaining_secs / duration).clamp(0.0, 1.0);
        return false;
    }
    match next_stage(decay.stage) {
        Some(stage) => {
            *decay = Decay::new(stage, stage_duration(stage));
            false
        }
        None => {
            decay.progress = 1.0;
            decay.remaining_secs = 0.0;
            true
        }
    }
}

/// Run every destruction countdown.
///
/// Finished obstacles are queued on `despawn_buffer`. Finished wrecks keep
/// their entity so turn order can still see them; only the countdown goes.
pub fn run(world: &mut World, outbox: &mut Outbox, despawn_buffer: &mut Vec<Entity>, dt: f64) {
    let mut finished_wrecks: Vec<Entity> = Vec::new();

    for (entity, (tank, decay)) in world.query_mut::<(&mut Tank, &mut Decay)>() {
        tank.position.y -= TANK_WRECK_SINK_SPEED * dt;
        if step(decay, dt) {
            finished_wrecks.push(entity);
            outbox.scene(SceneEvent::TankRemoved { slot: tank.slot });
        }
    }

    for (entity, (obstacle, decay)) in world.query_mut::<(&Obstacle, &mut Decay)>() {
        if step(decay, dt) {
            despawn_buffer.push(entity);
            outbox.scene(SceneEvent::ObstacleRemoved { id: obstacle.id });
        }
    }

    detach_decays(world, &finished_wrecks);
}

/// Start a countdown on each entity. Returns how many were attached.
///
/// Entities despawned in the meantime are skipped and logged.
pub fn attach_decays(world: &mut World, decays: Vec<(Entity, Decay)>) -> usize {
    let mut attached = 0;
    for (entity, decay) in decays {
        match world.insert_one(entity, decay) {
            Ok(()) => attached += 1,
            Err(err) => debug!(?entity, stage = ?decay.stage, %err, "decay not attached"),
        }
    }
    attached
}

/// Drop the countdown from each entity. Returns how many were removed.
fn detach_decays(world: &mut World, entities: &[Entity]) -> usize {
    let mut detached = 0;
    for &entity in entities {
        match world.remove_one::<Decay>(entity) {
            Ok(_) => detached += 1,
            Err(err) => debug!(?entity, %err, "decay not detached"),
        }
    }
    detached
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrage_core::enums::TurnSlot;
    use barrage_core::types::Vec3;

    fn run_for(world: &mut World, outbox: &mut Outbox, buffer: &mut Vec<Entity>, secs: f64) {
        let ticks = (secs / DT).round() as usize;
        for _ in 0..ticks {
            run(world, outbox, buffer, DT);
        }
    }

    #[test]
    fn test_tree_goes_through_every_stage() {
        let mut world = World::new();
        let mut outbox = Outbox::default();
        let mut buffer = Vec::new();
        let tree = world.spawn((
            Obstacle::tree(3, Vec3::ZERO, 1.0),
            Decay::new(DestructionStage::Falling, TREE_FALL_SECS),
        ));

        run_for(&mut world, &mut outbox, &mut buffer, TREE_FALL_SECS + 0.5);
        assert_eq!(
            world.get::<&Decay>(tree).unwrap().stage,
            DestructionStage::Lying
        );
        run_for(&mut world, &mut outbox, &mut buffer, TREE_LINGER_SECS);
        assert_eq!(
            world.get::<&Decay>(tree).unwrap().stage,
            DestructionStage::Fading
        );
        assert!(buffer.is_empty());
        run_for(&mut world, &mut outbox, &mut buffer, TREE_FADE_SECS);
        assert!(buffer.contains(&tree));
        assert!(outbox
            .scene
            .contains(&SceneEvent::ObstacleRemoved { id: 3 }));
    }

    #[test]
    fn test_wreck_sinks_and_keeps_entity() {
        let mut world = World::new();
        let mut outbox = Outbox::default();
        let mut buffer = Vec::new();
        let mut tank = Tank::new(TurnSlot::Enemy(0), Vec3::new(0.0, 2.0, 0.0), 100, 100.0);
        tank.destroyed = true;
        let wreck = world.spawn((tank, Decay::new(DestructionStage::Sinking, TANK_WRECK_SECS)));

        run_for(&mut world, &mut outbox, &mut buffer, TANK_WRECK_SECS + 0.1);
        assert!(buffer.is_empty());
        assert!(world.get::<&Decay>(wreck).is_err());
        let y = world.get::<&Tank>(wreck).unwrap().position.y;
        assert!(y < 2.0 - TANK_WRECK_SINK_SPEED * TANK_WRECK_SECS * 0.9);
        assert_eq!(
            outbox.scene,
            vec![SceneEvent::TankRemoved {
                slot: TurnSlot::Enemy(0)
            }]
        );
    }

    #[test]
    fn test_decays_skip_despawned_entities() {
        let mut world = World::new();
        let standing = world.spawn((Obstacle::tree(1, Vec3::ZERO, 1.0),));
        let gone = world.spawn((Obstacle::tree(2, Vec3::X, 1.0),));
        world.despawn(gone).unwrap();

        let attached = attach_decays(
            &mut world,
            vec![
                (standing, Decay::new(DestructionStage::Falling, TREE_FALL_SECS)),
                (gone, Decay::new(DestructionStage::Falling, TREE_FALL_SECS)),
            ],
        );
        assert_eq!(attached, 1);
        assert!(world.get::<&Decay>(standing).is_ok());

        assert_eq!(detach_decays(&mut world, &[standing, gone]), 1);
        assert!(world.get::<&Decay>(standing).is_err());
        assert_eq!(detach_decays(&mut world, &[standing]), 0);
    }

    #[test]
    fn test_camera_shake_decays() {
        let mut shake = CameraShake::default();
        assert!(shake.view().is_none());
        shake.trigger(CAMERA_SHAKE_INTENSITY, CAMERA_SHAKE_SECS);
        shake.update(CAMERA_SHAKE_SECS / 2.0);
        let view = shake.view().unwrap();
        assert!((view.intensity - CAMERA_SHAKE_INTENSITY / 2.0).abs() < 1e-12);
        shake.update(CAMERA_SHAKE_SECS);
        assert!(shake.view().is_none());
    }
}
