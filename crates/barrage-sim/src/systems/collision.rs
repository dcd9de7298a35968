//! Collision resolver.
//!
//! Each live shell is tested against opposing tanks, then buildings, then
//! trees, then the terrain. The first match wins and the shell is retired
//! on the spot.

use hecs::{Entity, World};
use tracing::{debug, info};

use barrage_core::components::{Decay, Obstacle, Projectile, Tank};
use barrage_core::constants::*;
use barrage_core::enums::{DestructionStage, ObstacleKind, RemovalReason};
use barrage_core::events::{AudioEvent, SceneEvent, UiEvent};
use barrage_core::types::Vec3;
use barrage_terrain::Heightfield;

use crate::actions::{self, DamageOutcome};
use crate::outbox::Outbox;
use crate::systems::effects::{attach_decays, stage_duration, CameraShake};

/// The parts of a shell the resolver needs, copied out of the world.
#[derive(Debug, Clone, Copy)]
struct Shell {
    entity: Entity,
    id: u32,
    position: Vec3,
    radius: f64,
    damage: i32,
    fired_by_player: bool,
}

/// What a shell ran into.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Impact {
    Tank,
    Building,
    Tree,
    Ground,
}

/// Resolve collisions for every shell in flight.
pub fn run(
    world: &mut World,
    terrain: &mut Heightfield,
    outbox: &mut Outbox,
    camera_shake: &mut CameraShake,
) {
    let shells: Vec<Shell> = world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| p.is_live())
        .map(|(entity, p)| Shell {
            entity,
            id: p.id,
            position: p.position,
            radius: p.radius,
            damage: p.damage,
            fired_by_player: p.fired_by_player,
        })
        .collect();

    let mut new_decays: Vec<(Entity, Decay)> = Vec::new();

    for shell in shells {
        let impact = strike_tank(world, &shell, outbox, camera_shake, &mut new_decays)
            .or_else(|| strike_obstacle(world, &shell, true, outbox, &mut new_decays))
            .or_else(|| strike_obstacle(world, &shell, false, outbox, &mut new_decays))
            .or_else(|| strike_ground(terrain, &shell, outbox));

        if let Some(impact) = impact {
            debug!(id = shell.id, ?impact, "shell impact");
            if let Ok(mut projectile) = world.get::<&mut Projectile>(shell.entity) {
                projectile.removed = Some(RemovalReason::Collided);
            }
        }
    }

    attach_decays(world, new_decays);
}

fn sphere_overlap(a: Vec3, ra: f64, b: Vec3, rb: f64) -> bool {
    a.distance(b) < ra + rb
}

fn strike_tank(
    world: &mut World,
    shell: &Shell,
    outbox: &mut Outbox,
    camera_shake: &mut CameraShake,
    new_decays: &mut Vec<(Entity, Decay)>,
) -> Option<Impact> {
    let (entity, tank) = world.query_mut::<&mut Tank>().into_iter().find(|(_, t)| {
        !t.destroyed
            && t.slot.is_player() != shell.fired_by_player
            && sphere_overlap(shell.position, shell.radius, t.position, TANK_COLLISION_RADIUS)
    })?;

    let intensity = HIT_INTENSITY_BASE - tank.health_fraction() * HIT_INTENSITY_HEALTH_WEIGHT;
    let outcome = actions::take_damage(tank, shell.damage);

    info!(slot = ?tank.slot, health = tank.health, "tank hit");
    outbox.audio(AudioEvent::TankHit);
    outbox.scene(SceneEvent::TankHit {
        slot: tank.slot,
        position: tank.position,
        intensity,
    });
    outbox.ui(UiEvent::HealthChanged {
        slot: tank.slot,
        current: tank.health,
        max: tank.max_health,
    });

    if outcome == DamageOutcome::Destroyed {
        info!(slot = ?tank.slot, "tank destroyed");
        outbox.audio(AudioEvent::Explosion);
        outbox.scene(SceneEvent::TankDestroyed {
            slot: tank.slot,
            position: tank.position,
        });
        outbox.scene(SceneEvent::CameraShake {
            intensity: CAMERA_SHAKE_INTENSITY,
            duration_secs: CAMERA_SHAKE_SECS,
        });
        camera_shake.trigger(CAMERA_SHAKE_INTENSITY, CAMERA_SHAKE_SECS);
        new_decays.push((
            entity,
            Decay::new(
                DestructionStage::Sinking,
                stage_duration(DestructionStage::Sinking),
            ),
        ));
    }
    Some(Impact::Tank)
}

fn strike_obstacle(
    world: &mut World,
    shell: &Shell,
    buildings: bool,
    outbox: &mut Outbox,
    new_decays: &mut Vec<(Entity, Decay)>,
) -> Option<Impact> {
    let (entity, obstacle) = world.query_mut::<&mut Obstacle>().into_iter().find(|(_, o)| {
        !o.destroyed
            && o.kind.is_building() == buildings
            && sphere_overlap(shell.position, shell.radius, o.hit_center(), o.radius)
    })?;

    outbox.scene(SceneEvent::ObstacleHit {
        id: obstacle.id,
        position: shell.position,
    });

    match obstacle.kind {
        ObstacleKind::Building(_) => {
            obstacle.health = (obstacle.health - shell.damage.max(0)).max(0);
            outbox.audio(AudioEvent::BuildingHit);
            if obstacle.health == 0 {
                obstacle.destroyed = true;
                info!(id = obstacle.id, "building collapsed");
                outbox.audio(AudioEvent::BuildingCollapse);
                outbox.scene(SceneEvent::ObstacleDestroyed {
                    id: obstacle.id,
                    kind: obstacle.kind,
                });
                new_decays.push((
                    entity,
                    Decay::new(
                        DestructionStage::Collapsing,
                        stage_duration(DestructionStage::Collapsing),
                    ),
                ));
            }
            Some(Impact::Building)
        }
        ObstacleKind::Tree => {
            obstacle.health = 0;
            obstacle.destroyed = true;
            info!(id = obstacle.id, "tree felled");
            outbox.audio(AudioEvent::TreeHit);
            outbox.scene(SceneEvent::ObstacleDestroyed {
                id: obstacle.id,
                kind: obstacle.kind,
            });
            new_decays.push((
                entity,
                Decay::new(
                    DestructionStage::Falling,
                    stage_duration(DestructionStage::Falling),
                ),
            ));
            Some(Impact::Tree)
        }
    }
}

fn strike_ground(terrain: &mut Heightfield, shell: &Shell, outbox: &mut Outbox) -> Option<Impact> {
    let ground = terrain.height_at(shell.position.x, shell.position.z);
    if shell.position.y > ground + shell.radius {
        return None;
    }
    terrain.deform(shell.position, CRATER_RADIUS, CRATER_DEPTH);
    outbox.audio(AudioEvent::GroundImpact);
    outbox.scene(SceneEvent::GroundImpact {
        position: shell.position,
    });
    Some(Impact::Ground)
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrage_core::enums::{BuildingStyle, TurnSlot};

    fn flat() -> Heightfield {
        Heightfield::flat(TERRAIN_SIZE, TERRAIN_SEGMENTS, 0.0)
    }

    fn shell_at(world: &mut World, position: Vec3, by_player: bool) -> Entity {
        world.spawn((Projectile::new(0, position, Vec3::ZERO, by_player),))
    }

    fn removed(world: &World, entity: Entity) -> Option<RemovalReason> {
        world.get::<&Projectile>(entity).unwrap().removed
    }

    #[test]
    fn test_own_side_shells_pass_through() {
        let mut world = World::new();
        let mut terrain = flat();
        let mut outbox = Outbox::default();
        let mut shake = CameraShake::default();
        let enemy = world.spawn((Tank::new(
            TurnSlot::Enemy(0),
            Vec3::new(0.0, 10.0, 0.0),
            100,
            100.0,
        ),));
        let shell = shell_at(&mut world, Vec3::new(0.0, 10.5, 0.0), false);

        run(&mut world, &mut terrain, &mut outbox, &mut shake);
        assert_eq!(removed(&world, shell), None);
        assert_eq!(world.get::<&Tank>(enemy).unwrap().health, 100);
    }

    #[test]
    fn test_tank_hit_damages_and_retires_shell() {
        let mut world = World::new();
        let mut terrain = flat();
        let mut outbox = Outbox::default();
        let mut shake = CameraShake::default();
        let enemy = world.spawn((Tank::new(
            TurnSlot::Enemy(0),
            Vec3::new(0.0, 10.0, 0.0),
            100,
            100.0,
        ),));
        let shell = shell_at(&mut world, Vec3::new(0.0, 10.5, 0.0), true);

        run(&mut world, &mut terrain, &mut outbox, &mut shake);
        assert_eq!(removed(&world, shell), Some(RemovalReason::Collided));
        assert_eq!(world.get::<&Tank>(enemy).unwrap().health, 75);
        let intensity = outbox.scene.iter().find_map(|e| match e {
            SceneEvent::TankHit { intensity, .. } => Some(*intensity),
            _ => None,
        });
        assert!(
            (intensity.unwrap() - 0.7).abs() < 1e-12,
            "full-health hit intensity should be 0.7"
        );
        assert!(shake.view().is_none());
    }

    #[test]
    fn test_killing_blow_shakes_camera_and_sinks_wreck() {
        let mut world = World::new();
        let mut terrain = flat();
        let mut outbox = Outbox::default();
        let mut shake = CameraShake::default();
        let mut tank = Tank::new(TurnSlot::Player, Vec3::new(0.0, 10.0, 0.0), 100, 100.0);
        tank.health = 20;
        let player = world.spawn((tank,));
        shell_at(&mut world, Vec3::new(0.5, 10.0, 0.0), false);

        run(&mut world, &mut terrain, &mut outbox, &mut shake);
        assert!(world.get::<&Tank>(player).unwrap().destroyed);
        assert!(world.get::<&Decay>(player).is_ok());
        assert!(outbox.audio.contains(&AudioEvent::Explosion));
        assert!(shake.view().is_some());
    }

    #[test]
    fn test_tank_takes_priority_over_building() {
        let mut world = World::new();
        let mut terrain = flat();
        let mut outbox = Outbox::default();
        let mut shake = CameraShake::default();
        let enemy = world.spawn((Tank::new(
            TurnSlot::Enemy(0),
            Vec3::new(0.0, 2.0, 0.0),
            100,
            100.0,
        ),));
        let house = world.spawn((Obstacle::building(
            1,
            BuildingStyle::House,
            Vec3::ZERO,
            1.0,
        ),));
        shell_at(&mut world, Vec3::new(0.0, 2.0, 0.0), true);

        run(&mut world, &mut terrain, &mut outbox, &mut shake);
        assert_eq!(world.get::<&Tank>(enemy).unwrap().health, 75);
        assert_eq!(
            world.get::<&Obstacle>(house).unwrap().health,
            BUILDING_HEALTH
        );
    }

    #[test]
    fn test_building_collapses_after_enough_hits() {
        let mut world = World::new();
        let mut terrain = flat();
        let mut outbox = Outbox::default();
        let mut shake = CameraShake::default();
        let house = world.spawn((Obstacle::building(
            1,
            BuildingStyle::Warehouse,
            Vec3::new(20.0, 0.0, 0.0),
            1.0,
        ),));
        for _ in 0..4 {
            shell_at(&mut world, Vec3::new(20.0, 2.0, 0.0), true);
            run(&mut world, &mut terrain, &mut outbox, &mut shake);
        }
        let obstacle = world.get::<&Obstacle>(house).unwrap();
        assert!(obstacle.destroyed);
        assert_eq!(obstacle.health, 0);
        assert_eq!(
            world.get::<&Decay>(house).unwrap().stage,
            DestructionStage::Collapsing
        );
    }

    #[test]
    fn test_tree_falls_to_single_hit() {
        let mut world = World::new();
        let mut terrain = flat();
        let mut outbox = Outbox::default();
        let mut shake = CameraShake::default();
        let tree = world.spawn((Obstacle::tree(5, Vec3::new(-10.0, 0.0, 0.0), 1.0),));
        shell_at(&mut world, Vec3::new(-10.0, 1.5, 0.0), false);

        run(&mut world, &mut terrain, &mut outbox, &mut shake);
        assert!(world.get::<&Obstacle>(tree).unwrap().destroyed);
        assert!(outbox.audio.contains(&AudioEvent::TreeHit));
    }

    #[test]
    fn test_ground_impact_digs_crater() {
        let mut world = World::new();
        let mut terrain = Heightfield::flat(TERRAIN_SIZE, TERRAIN_SEGMENTS, 3.0);
        let mut outbox = Outbox::default();
        let mut shake = CameraShake::default();
        let shell = shell_at(&mut world, Vec3::new(10.0, 3.1, 10.0), true);

        run(&mut world, &mut terrain, &mut outbox, &mut shake);
        assert_eq!(removed(&world, shell), Some(RemovalReason::Collided));
        assert!(terrain.is_dirty());
        assert!(terrain.height_at(10.0, 10.0) < 3.0);
    }
}
