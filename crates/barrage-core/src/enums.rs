//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to pick a difficulty.
    #[default]
    DifficultySelection,
    /// Building the round: terrain, obstacles, tanks.
    Initializing,
    /// The human-controlled tank is active.
    PlayerTurn,
    /// An AI-controlled tank is active.
    EnemyTurn,
    /// The round has ended. See `Outcome` for who won.
    GameOver,
}

/// Which tank currently holds the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnSlot {
    Player,
    /// Index into the enemy roster, in spawn order.
    Enemy(usize),
}

impl TurnSlot {
    pub fn is_player(self) -> bool {
        matches!(self, TurnSlot::Player)
    }
}

/// Result of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

/// Difficulty tier selected before a round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Professional,
    Veteran,
}

impl Difficulty {
    /// Display name shown in turn and game-over messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "New Player",
            Difficulty::Professional => "Professional",
            Difficulty::Veteran => "Veteran",
        }
    }
}

/// Kind of static obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Building(BuildingStyle),
    Tree,
}

impl ObstacleKind {
    pub fn is_building(self) -> bool {
        matches!(self, ObstacleKind::Building(_))
    }
}

/// Architectural style of a building. Cosmetic, carried through to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingStyle {
    House,
    Warehouse,
    Tower,
    Mosque,
    Ruins,
}

/// Why a projectile left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Airborne for longer than its lifespan.
    Expired,
    /// Left the playable square or dropped below the floor.
    OutOfBounds,
    /// Hit a tank, obstacle or the ground.
    Collided,
}

/// Held control inputs for the human tank, sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveForward,
    MoveBackward,
    RotateLeft,
    RotateRight,
    TurretLeft,
    TurretRight,
    BarrelUp,
    BarrelDown,
    PowerUp,
    PowerDown,
}

/// What an obstacle or tank is currently doing on its way out of the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DestructionStage {
    /// Building shrinking and sinking.
    Collapsing,
    /// Tree toppling.
    Falling,
    /// Tree lying on the ground.
    Lying,
    /// Tree or wreck fading out.
    Fading,
    /// Tank wreck sinking into the ground.
    Sinking,
}
