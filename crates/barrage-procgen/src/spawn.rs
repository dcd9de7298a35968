//! Tank spawn placement.

use rand_chacha::ChaCha8Rng;
use tracing::warn;

use barrage_core::components::Obstacle;
use barrage_core::constants::TANK_COLLISION_RADIUS;
use barrage_core::enums::ObstacleKind;
use barrage_core::types::{horizontal_distance, Vec3};

use crate::layout::random_point;

const TANK_EDGE_PADDING: f64 = 25.0;
const TANK_SPACING: f64 = 12.0;
const BUILDING_CLEARANCE: f64 = 8.0;
const TREE_CLEARANCE: f64 = 6.0;
const MAX_ATTEMPTS: usize = 200;

/// How much room a spawn point ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clearance {
    /// Full spacing from tanks and obstacles.
    Full,
    /// Only clear of obstacle footprints and other hulls.
    Reduced,
    /// Nothing satisfied even the reduced rule; the roomiest candidate seen.
    BestEffort,
}

/// A chosen tank position on the ground plane (y = 0; the caller seats it on the terrain).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub clearance: Clearance,
}

impl SpawnPoint {
    pub fn is_clear(&self) -> bool {
        self.clearance == Clearance::Full
    }
}

/// Pick `count` spawn points, spaced from each other and from obstacles.
///
/// Tries the full spacing first, then only keeps hulls off obstacles and
/// each other. If both budgets run out the candidate with the most room
/// is used and a warning is logged.
pub fn place_tanks(
    rng: &mut ChaCha8Rng,
    terrain_size: f64,
    obstacles: &[Obstacle],
    count: usize,
) -> Vec<SpawnPoint> {
    let mut points: Vec<SpawnPoint> = Vec::with_capacity(count);
    for index in 0..count {
        let point = find_point(rng, terrain_size, obstacles, &points);
        match point.clearance {
            Clearance::Full => {}
            Clearance::Reduced => warn!(index, "tank spawned with reduced clearance"),
            Clearance::BestEffort => warn!(
                index,
                attempts = MAX_ATTEMPTS * 2,
                "no free tank position found, using roomiest candidate"
            ),
        }
        points.push(point);
    }
    points
}

fn find_point(
    rng: &mut ChaCha8Rng,
    terrain_size: f64,
    obstacles: &[Obstacle],
    taken: &[SpawnPoint],
) -> SpawnPoint {
    for _ in 0..MAX_ATTEMPTS {
        let candidate = candidate(rng, terrain_size);
        if slack(candidate, obstacles, taken, Clearance::Full) >= 0.0 {
            return SpawnPoint {
                position: candidate,
                clearance: Clearance::Full,
            };
        }
    }

    let mut best = (f64::NEG_INFINITY, Vec3::ZERO);
    for _ in 0..MAX_ATTEMPTS {
        let candidate = candidate(rng, terrain_size);
        let room = slack(candidate, obstacles, taken, Clearance::Reduced);
        if room >= 0.0 {
            return SpawnPoint {
                position: candidate,
                clearance: Clearance::Reduced,
            };
        }
        if room > best.0 {
            best = (room, candidate);
        }
    }
    SpawnPoint {
        position: best.1,
        clearance: Clearance::BestEffort,
    }
}

fn candidate(rng: &mut ChaCha8Rng, terrain_size: f64) -> Vec3 {
    let (x, z) = random_point(rng, terrain_size, TANK_EDGE_PADDING);
    Vec3::new(x, 0.0, z)
}

/// Smallest margin by which `candidate` meets the spacing rules of `level`.
/// Negative when some rule is broken.
fn slack(candidate: Vec3, obstacles: &[Obstacle], taken: &[SpawnPoint], level: Clearance) -> f64 {
    let full = level == Clearance::Full;
    let spacing = if full {
        TANK_SPACING
    } else {
        2.0 * TANK_COLLISION_RADIUS
    };
    let from_tanks = taken
        .iter()
        .map(|p| horizontal_distance(candidate, p.position) - spacing);
    let from_obstacles = obstacles.iter().map(|o| {
        let clearance = match (full, o.kind) {
            (false, _) => 0.0,
            (true, ObstacleKind::Building(_)) => BUILDING_CLEARANCE,
            (true, ObstacleKind::Tree) => TREE_CLEARANCE,
        };
        horizontal_distance(candidate, o.position) - (o.radius + TANK_COLLISION_RADIUS + clearance)
    });
    from_tanks.chain(from_obstacles).fold(f64::INFINITY, f64::min)
}
