//! Snapshot system: reads the world and builds a complete GameStateSnapshot.
//!
//! Read-only. Never modifies the world.

use hecs::World;

use barrage_core::components::{Decay, Obstacle, Projectile, Tank};
use barrage_core::enums::{Difficulty, GamePhase, Outcome, TurnSlot};
use barrage_core::events::{AudioEvent, SceneEvent, UiEvent};
use barrage_core::state::*;
use barrage_core::types::SimTime;

/// Round-level state that lives on the engine rather than in the world.
pub struct RoundView {
    pub time: SimTime,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub turn: Option<TurnSlot>,
    pub outcome: Option<Outcome>,
    pub terrain_revision: u64,
    pub camera_shake: Option<CameraShakeView>,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    round: RoundView,
    audio_events: Vec<AudioEvent>,
    ui_events: Vec<UiEvent>,
    scene_events: Vec<SceneEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: round.time,
        phase: round.phase,
        difficulty: round.difficulty,
        turn: round.turn,
        outcome: round.outcome,
        tanks: build_tanks(world),
        projectiles: build_projectiles(world),
        obstacles: build_obstacles(world),
        terrain_revision: round.terrain_revision,
        camera_shake: round.camera_shake,
        audio_events,
        ui_events,
        scene_events,
    }
}

/// Player first, then enemies by index.
fn slot_order(slot: TurnSlot) -> usize {
    match slot {
        TurnSlot::Player => 0,
        TurnSlot::Enemy(index) => index + 1,
    }
}

fn build_tanks(world: &World) -> Vec<TankView> {
    let mut tanks: Vec<TankView> = world
        .query::<(&Tank, Option<&Decay>)>()
        .iter()
        .map(|(_, (tank, decay))| {
            let opacity = match (tank.destroyed, decay) {
                (false, _) => 1.0,
                (true, Some(decay)) => 1.0 - decay.progress,
                (true, None) => 0.0,
            };
            TankView {
                slot: tank.slot,
                position: tank.position,
                body_yaw: tank.body_yaw,
                turret_yaw: tank.turret_yaw,
                elevation: tank.elevation,
                health: tank.health,
                max_health: tank.max_health,
                fuel: tank.fuel,
                max_fuel: tank.max_fuel,
                power: tank.power,
                has_fired: tank.has_fired_this_turn,
                destroyed: tank.destroyed,
                opacity,
            }
        })
        .collect();
    tanks.sort_by_key(|t| slot_order(t.slot));
    tanks
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<&Projectile>()
        .iter()
        .filter(|(_, p)| p.is_live())
        .map(|(_, p)| ProjectileView {
            id: p.id,
            position: p.position,
            velocity: p.velocity,
            fired_by_player: p.fired_by_player,
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}

fn build_obstacles(world: &World) -> Vec<ObstacleView> {
    let mut obstacles: Vec<ObstacleView> = world
        .query::<(&Obstacle, Option<&Decay>)>()
        .iter()
        .map(|(_, (obstacle, decay))| ObstacleView {
            id: obstacle.id,
            kind: obstacle.kind,
            position: obstacle.position,
            scale: obstacle.scale,
            radius: obstacle.radius,
            health: obstacle.health,
            destroyed: obstacle.destroyed,
            stage: decay.map(|d| d.stage),
            stage_progress: decay.map_or(0.0, |d| d.progress),
        })
        .collect();
    obstacles.sort_by_key(|o| o.id);
    obstacles
}
