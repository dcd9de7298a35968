//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in the simulation crate's
//! action and system modules, not here.

use serde::{Deserialize, Serialize};

use crate::ballistics::{launch_direction, GunSpec};
use crate::constants::*;
use crate::enums::*;
use crate::types::Vec3;

/// A combatant. Exactly one tank per `TurnSlot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub slot: TurnSlot,
    /// Hull origin, `TANK_RIDE_HEIGHT` above the terrain.
    pub position: Vec3,
    /// Hull yaw (radians).
    pub body_yaw: f64,
    /// Turret yaw relative to the hull (radians).
    pub turret_yaw: f64,
    /// Barrel elevation (radians, positive = up).
    pub elevation: f64,
    pub health: i32,
    pub max_health: i32,
    pub fuel: f64,
    pub max_fuel: f64,
    pub power: f64,
    pub has_fired_this_turn: bool,
    /// One-way. Set when health reaches zero.
    pub destroyed: bool,
    pub gun: GunSpec,
}

impl Tank {
    /// A fresh tank with full health and fuel and default gun settings.
    pub fn new(slot: TurnSlot, position: Vec3, max_health: i32, max_fuel: f64) -> Self {
        Self {
            slot,
            position,
            body_yaw: 0.0,
            turret_yaw: 0.0,
            elevation: 0.0,
            health: max_health,
            max_health,
            fuel: max_fuel,
            max_fuel,
            power: POWER_DEFAULT,
            has_fired_this_turn: false,
            destroyed: false,
            gun: GunSpec::default(),
        }
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    /// World yaw the barrel points along.
    pub fn aim_yaw(&self) -> f64 {
        self.body_yaw + self.turret_yaw
    }

    /// Barrel tip for the current turret and barrel settings. Shells start here.
    pub fn muzzle_position(&self) -> Vec3 {
        self.muzzle_position_at(self.aim_yaw(), self.elevation)
    }

    /// Barrel tip if the barrel pointed along world `yaw` at `elevation`.
    pub fn muzzle_position_at(&self, yaw: f64, elevation: f64) -> Vec3 {
        self.position
            + Vec3::new(0.0, MUZZLE_PIVOT_HEIGHT, 0.0)
            + launch_direction(yaw, 0.0, elevation) * BARREL_LENGTH
    }
}

/// A shell in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds since launch.
    pub age: f64,
    pub lifespan: f64,
    pub damage: i32,
    pub radius: f64,
    pub fired_by_player: bool,
    /// Terminal. Once set the projectile no longer moves.
    pub removed: Option<RemovalReason>,
}

impl Projectile {
    pub fn new(id: u32, position: Vec3, velocity: Vec3, fired_by_player: bool) -> Self {
        Self {
            id,
            position,
            velocity,
            age: 0.0,
            lifespan: PROJECTILE_LIFESPAN,
            damage: PROJECTILE_DAMAGE,
            radius: PROJECTILE_RADIUS,
            fired_by_player,
            removed: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.removed.is_none()
    }
}

/// A building or tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Base position on the terrain surface.
    pub position: Vec3,
    pub scale: f64,
    pub radius: f64,
    pub health: i32,
    pub max_health: i32,
    /// One-way. Destroyed obstacles no longer block movement, shots or sight.
    pub destroyed: bool,
}

impl Obstacle {
    pub fn building(id: u32, style: BuildingStyle, position: Vec3, scale: f64) -> Self {
        Self {
            id,
            kind: ObstacleKind::Building(style),
            position,
            scale,
            radius: BUILDING_RADIUS_PER_SCALE * scale,
            health: BUILDING_HEALTH,
            max_health: BUILDING_HEALTH,
            destroyed: false,
        }
    }

    pub fn tree(id: u32, position: Vec3, scale: f64) -> Self {
        Self {
            id,
            kind: ObstacleKind::Tree,
            position,
            scale,
            radius: TREE_RADIUS_PER_SCALE * scale,
            health: TREE_HEALTH,
            max_health: TREE_HEALTH,
            destroyed: false,
        }
    }

    /// Center of the sphere used for projectile hits and sight lines.
    pub fn hit_center(&self) -> Vec3 {
        let lift = match self.kind {
            ObstacleKind::Building(_) => BUILDING_HIT_HEIGHT,
            ObstacleKind::Tree => TREE_HIT_HEIGHT,
        };
        self.position + Vec3::new(0.0, lift * self.scale, 0.0)
    }
}

/// Timed removal of a destroyed tank or obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decay {
    pub stage: DestructionStage,
    /// Seconds left in the current stage.
    pub remaining_secs: f64,
    /// Animation progress through the current stage, 0..=1.
    pub progress: f64,
}

impl Decay {
    pub fn new(stage: DestructionStage, duration_secs: f64) -> Self {
        Self {
            stage,
            remaining_secs: duration_secs,
            progress: 0.0,
        }
    }
}

/// What an AI tank remembers between its turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AiMemory {
    pub last_known_target: Option<Vec3>,
    pub turns_since_last_shot: u32,
}

/// Marks the human-controlled tank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerControlled;
