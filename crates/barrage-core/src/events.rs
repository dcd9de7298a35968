//! Events emitted by the simulation for scene, audio and UI collaborators.
//!
//! All events are fire-and-forget notifications. The simulation never
//! reads anything back from the collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec3;

/// Sound triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    Shoot { by_player: bool },
    TankHit,
    Explosion,
    BuildingHit,
    BuildingCollapse,
    TreeHit,
    GroundImpact,
}

/// Notifications for the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiEvent {
    HealthChanged {
        slot: TurnSlot,
        current: i32,
        max: i32,
    },
    FuelChanged {
        current: f64,
        max: f64,
    },
    PowerChanged {
        power: f64,
    },
    TurnIndicator {
        text: String,
    },
    ActionIndicator {
        text: String,
    },
    EndTurnEnabled {
        enabled: bool,
    },
    GameOver {
        outcome: Outcome,
        message: String,
    },
}

/// Mutations the renderer has to mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneEvent {
    ProjectileSpawned {
        id: u32,
        position: Vec3,
        by_player: bool,
    },
    ProjectileRemoved {
        id: u32,
        reason: RemovalReason,
    },
    /// Visual hit flash on a tank.
    TankHit {
        slot: TurnSlot,
        position: Vec3,
        intensity: f64,
    },
    TankDestroyed {
        slot: TurnSlot,
        position: Vec3,
    },
    TankRemoved {
        slot: TurnSlot,
    },
    ObstacleHit {
        id: u32,
        position: Vec3,
    },
    ObstacleDestroyed {
        id: u32,
        kind: ObstacleKind,
    },
    ObstacleRemoved {
        id: u32,
    },
    GroundImpact {
        position: Vec3,
    },
    /// The heightfield changed; normals need recomputing.
    TerrainDeformed {
        revision: u64,
    },
    CameraShake {
        intensity: f64,
        duration_secs: f64,
    },
}
