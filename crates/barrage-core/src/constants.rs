//! Simulation constants and tuning parameters.

use std::f64::consts::PI;

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World ---

/// Gravitational acceleration applied to projectiles (game-tuned, 2x Earth).
pub const GRAVITY: f64 = 9.81 * 2.0;

/// Edge length of the square terrain footprint (world units).
pub const TERRAIN_SIZE: f64 = 150.0;

/// Number of terrain cells per side. The grid has `TERRAIN_SEGMENTS + 1` samples per side.
pub const TERRAIN_SEGMENTS: usize = 96;

/// Projectiles beyond this absolute x or z are removed.
pub const PROJECTILE_BOUNDS: f64 = 75.0;

/// Projectiles below this height are removed.
pub const PROJECTILE_FLOOR_Y: f64 = -5.0;

/// Tanks may not move beyond this absolute x or z.
pub const TANK_MOVE_LIMIT: f64 = 70.0;

// --- Tank ---

/// Starting and maximum tank health.
pub const TANK_MAX_HEALTH: i32 = 100;

/// Starting and maximum tank fuel.
pub const TANK_MAX_FUEL: f64 = 100.0;

/// Ground speed while driving (units per second).
pub const TANK_MOVE_SPEED: f64 = 5.0;

/// Hull rotation rate (radians per second).
pub const TANK_BODY_ROTATE_SPEED: f64 = PI / 2.0;

/// Turret rotation rate (radians per second).
pub const TANK_TURRET_ROTATE_SPEED: f64 = PI;

/// Barrel elevation rate (radians per second).
pub const TANK_BARREL_ELEVATE_SPEED: f64 = PI / 6.0;

/// Tank collision sphere radius.
pub const TANK_COLLISION_RADIUS: f64 = 1.5;

/// Height of the tank origin above the terrain surface.
pub const TANK_RIDE_HEIGHT: f64 = 0.5;

/// Height of the barrel pivot above the tank origin.
pub const MUZZLE_PIVOT_HEIGHT: f64 = 0.9;

/// Distance from the barrel pivot to the muzzle.
pub const BARREL_LENGTH: f64 = 2.0;

/// Fuel consumed per unit of distance driven.
pub const MOVE_FUEL_PER_UNIT: f64 = 10.0;

/// Fuel consumed per radian of hull rotation.
pub const BODY_ROTATION_FUEL_PER_RADIAN: f64 = 10.0;

// --- Gun ---

/// Lowest power setting.
pub const POWER_MIN: f64 = 10.0;

/// Highest power setting.
pub const POWER_MAX: f64 = 100.0;

/// Power setting of a fresh tank.
pub const POWER_DEFAULT: f64 = 50.0;

/// Power change per tick while a power intent is held.
pub const POWER_STEP: f64 = 1.0;

/// Muzzle speed at minimum power.
pub const PROJECTILE_SPEED_MIN: f64 = 15.0;

/// Muzzle speed at maximum power.
pub const PROJECTILE_SPEED_MAX: f64 = 40.0;

/// Lowest barrel elevation (radians, negative = below horizontal).
pub const ELEVATION_MIN: f64 = -PI / 12.0;

/// Highest barrel elevation (radians).
pub const ELEVATION_MAX: f64 = PI / 3.0;

// --- Projectile ---

/// Damage dealt by a projectile hit.
pub const PROJECTILE_DAMAGE: i32 = 25;

/// Projectile collision sphere radius.
pub const PROJECTILE_RADIUS: f64 = 0.3;

/// Seconds before an airborne projectile expires.
pub const PROJECTILE_LIFESPAN: f64 = 5.0;

// --- Ballistics solver ---

/// Multiplier applied to solved power so shots err long rather than short.
pub const POWER_OVERSHOOT_FACTOR: f64 = 1.2;

/// Horizontal distances below this are treated as this value.
pub const SOLVER_MIN_DISTANCE: f64 = 0.5;

/// Elevation used when the target cannot be reached at the given speed.
pub const FALLBACK_ELEVATION: f64 = PI / 4.0;

// --- Impacts ---

/// Crater radius carved by a ground impact.
pub const CRATER_RADIUS: f64 = 4.0;

/// Crater depth at the impact point.
pub const CRATER_DEPTH: f64 = 1.5;

/// Camera shake intensity when a tank is destroyed.
pub const CAMERA_SHAKE_INTENSITY: f64 = 0.3;

/// Camera shake duration when a tank is destroyed.
pub const CAMERA_SHAKE_SECS: f64 = 1.0;

/// Base hit-effect intensity; scaled down by the target's remaining health fraction.
pub const HIT_INTENSITY_BASE: f64 = 1.2;

/// Weight of the health fraction in the hit-effect intensity.
pub const HIT_INTENSITY_HEALTH_WEIGHT: f64 = 0.5;

// --- Obstacles ---

/// Starting health of a building.
pub const BUILDING_HEALTH: i32 = 100;

/// Building collision radius per unit of scale.
pub const BUILDING_RADIUS_PER_SCALE: f64 = 3.0;

/// Height of a building's hit sphere center above its base.
pub const BUILDING_HIT_HEIGHT: f64 = 2.0;

/// Seconds a destroyed building spends collapsing before it is removed.
pub const BUILDING_COLLAPSE_SECS: f64 = 3.0;

/// Starting health of a tree.
pub const TREE_HEALTH: i32 = 50;

/// Tree collision radius per unit of scale.
pub const TREE_RADIUS_PER_SCALE: f64 = 1.5;

/// Height of a tree's hit sphere center above its base.
pub const TREE_HIT_HEIGHT: f64 = 1.5;

/// Seconds a destroyed tree spends falling over.
pub const TREE_FALL_SECS: f64 = 2.0;

/// Seconds a fallen tree lies still before fading.
pub const TREE_LINGER_SECS: f64 = 3.0;

/// Seconds a fallen tree takes to fade out.
pub const TREE_FADE_SECS: f64 = 3.0;

/// Seconds a destroyed tank takes to sink and fade.
pub const TANK_WRECK_SECS: f64 = 1.0;

/// Rate at which a wreck sinks into the ground (units per second).
pub const TANK_WRECK_SINK_SPEED: f64 = 0.5;

// --- Round setup ---

/// Number of AI-controlled tanks per round.
pub const ENEMY_COUNT: usize = 3;

/// Buildings placed per round.
pub const BUILDING_COUNT: usize = 15;

/// Trees placed per round.
pub const TREE_COUNT: usize = 30;

// --- AI ---

/// Distance within which the AI considers a shot.
pub const AI_MAX_ENGAGE_RANGE: f64 = 60.0;

/// Distance within which the AI shoots without line of sight.
pub const AI_BLIND_FIRE_RANGE: f64 = 30.0;

/// Floor on the accuracy the AI shoots with.
pub const AI_MIN_ACCURACY: f64 = 0.3;

/// Health fraction below which the AI considers retreating.
pub const AI_LOW_HEALTH_FRACTION: f64 = 0.4;

/// Preferred engagement distance.
pub const AI_IDEAL_DISTANCE: f64 = 25.0;

/// Beyond `AI_IDEAL_DISTANCE + AI_ADVANCE_MARGIN` the AI advances.
pub const AI_ADVANCE_MARGIN: f64 = 15.0;

/// Inside `AI_IDEAL_DISTANCE - AI_RETREAT_MARGIN` the AI backs off.
pub const AI_RETREAT_MARGIN: f64 = 5.0;

/// Fraction of the ideal distance covered by an advance step.
pub const AI_ADVANCE_STEP_FACTOR: f64 = 0.3;

/// Fraction of the ideal distance covered by a back-off step.
pub const AI_RETREAT_STEP_FACTOR: f64 = 0.2;

/// Lateral offset of flanking positions.
pub const AI_FLANK_DISTANCE: f64 = 15.0;

/// Distance to a standing building that counts as being in cover.
pub const AI_COVER_DISTANCE: f64 = 3.0;

/// Fuel divisor bounding how far the AI drives in one turn.
pub const AI_FUEL_DISTANCE_DIVISOR: f64 = 20.0;

/// Maximum elevation change per aim-only turn, as a fraction of the barrel speed.
pub const AI_AIM_STEP_FACTOR: f64 = 0.2;

/// Scatter span per unit of inaccuracy.
pub const AI_SCATTER_SPAN: f64 = 0.2;

/// Post-decision delay before the next turn (seconds), before strategic reduction.
pub const AI_TURN_DELAY_BASE: f64 = 2.0;

/// Reduction of the post-decision delay per unit of strategic thinking.
pub const AI_TURN_DELAY_STRATEGIC: f64 = 1.2;

/// Floor on the post-decision delay.
pub const AI_TURN_DELAY_MIN: f64 = 0.8;
