//! Entity spawn factories for setting up a round.
//!
//! Builds the island, scatters buildings and trees, then drops the player
//! and the enemy tanks onto clear ground.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use barrage_ai::DifficultyProfile;
use barrage_core::components::{AiMemory, Obstacle, PlayerControlled, Tank};
use barrage_core::constants::*;
use barrage_core::enums::TurnSlot;
use barrage_core::types::{bearing, Vec3};
use barrage_procgen::{generate_island, place_buildings, place_tanks, place_trees};
use barrage_terrain::Heightfield;

use crate::engine::SimConfig;

/// What the engine keeps from round setup besides the entities.
pub struct Round {
    pub terrain: Heightfield,
    pub enemy_count: usize,
}

/// Generate a fresh round into an empty world.
pub fn setup_round(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    config: &SimConfig,
    profile: &DifficultyProfile,
) -> Round {
    let terrain = generate_island(rng);

    let buildings = place_buildings(rng, &terrain, config.building_count, 0);
    let trees = place_trees(
        rng,
        &terrain,
        &buildings,
        config.tree_count,
        buildings.len() as u32,
    );
    let obstacles: Vec<Obstacle> = buildings.into_iter().chain(trees).collect();

    let spawns = place_tanks(rng, terrain.size(), &obstacles, config.enemy_count + 1);
    for obstacle in obstacles.iter().cloned() {
        spawn_obstacle(world, obstacle);
    }

    let mut points = spawns.into_iter().map(|s| seat(&terrain, s.position));
    let player_at = points.next().unwrap_or(Vec3::new(0.0, TANK_RIDE_HEIGHT, 0.0));
    let max_health = (TANK_MAX_HEALTH + profile.player_health_bonus).max(1);
    let max_fuel = (TANK_MAX_FUEL + profile.player_fuel_bonus).max(1.0);
    spawn_player_tank(world, player_at, max_health, max_fuel);

    let mut enemy_count = 0;
    for (index, position) in points.enumerate() {
        spawn_enemy_tank(world, index, position);
        enemy_count += 1;
    }

    info!(
        obstacles = obstacles.len(),
        enemies = enemy_count,
        player_health = max_health,
        player_fuel = max_fuel,
        "round generated"
    );

    Round {
        terrain,
        enemy_count,
    }
}

/// Put a spawn point on the ground at ride height.
fn seat(terrain: &Heightfield, position: Vec3) -> Vec3 {
    Vec3::new(
        position.x,
        terrain.height_at(position.x, position.z) + TANK_RIDE_HEIGHT,
        position.z,
    )
}

/// Tanks start facing the middle of the island.
fn facing_centre(position: Vec3) -> f64 {
    bearing(position, Vec3::ZERO)
}

/// Spawn the human tank.
pub fn spawn_player_tank(world: &mut World, position: Vec3, max_health: i32, max_fuel: f64) -> Entity {
    let mut tank = Tank::new(TurnSlot::Player, position, max_health, max_fuel);
    tank.body_yaw = facing_centre(position);
    world.spawn((PlayerControlled, tank))
}

/// Spawn a computer-controlled tank with stock health and fuel.
pub fn spawn_enemy_tank(world: &mut World, index: usize, position: Vec3) -> Entity {
    let mut tank = Tank::new(TurnSlot::Enemy(index), position, TANK_MAX_HEALTH, TANK_MAX_FUEL);
    tank.body_yaw = facing_centre(position);
    world.spawn((tank, AiMemory::default()))
}

/// Spawn a building or tree.
pub fn spawn_obstacle(world: &mut World, obstacle: Obstacle) -> Entity {
    world.spawn((obstacle,))
}
