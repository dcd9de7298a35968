//! Building and tree placement.
//!
//! Rejection sampling inside a padded square, with spacing against
//! everything already placed and a minimum ground height so nothing
//! stands in an oasis or on the beach.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use barrage_core::components::Obstacle;
use barrage_core::enums::BuildingStyle;
use barrage_core::types::{horizontal_distance, Vec3};
use barrage_terrain::Heightfield;

const BUILDING_EDGE_PADDING: f64 = 20.0;
const BUILDING_SPACING: f64 = 8.0;
const BUILDING_MIN_GROUND: f64 = 1.0;
const BUILDING_SCALE: (f64, f64) = (0.8, 1.3);

const TREE_EDGE_PADDING: f64 = 12.0;
const TREE_SPACING: f64 = 4.0;
const TREE_MIN_GROUND: f64 = 0.8;
const TREE_SCALE: (f64, f64) = (0.8, 1.5);

/// Sampling attempts allowed per requested obstacle.
const ATTEMPTS_PER_ITEM: usize = 15;

/// Cumulative style weights.
const BUILDING_STYLES: [(BuildingStyle, f64); 5] = [
    (BuildingStyle::House, 0.4),
    (BuildingStyle::Warehouse, 0.2),
    (BuildingStyle::Tower, 0.15),
    (BuildingStyle::Mosque, 0.15),
    (BuildingStyle::Ruins, 0.1),
];

/// Place up to `count` buildings. Ids start at `first_id`.
pub fn place_buildings(
    rng: &mut ChaCha8Rng,
    terrain: &Heightfield,
    count: usize,
    first_id: u32,
) -> Vec<Obstacle> {
    let mut placed: Vec<Obstacle> = Vec::with_capacity(count);
    let max_attempts = count * ATTEMPTS_PER_ITEM;
    let mut attempts = 0;

    while placed.len() < count && attempts < max_attempts {
        attempts += 1;
        let (x, z) = random_point(rng, terrain.size(), BUILDING_EDGE_PADDING);
        let candidate = Vec3::new(x, 0.0, z);

        let crowded = placed
            .iter()
            .any(|b| horizontal_distance(candidate, b.position) < b.radius + BUILDING_SPACING);
        if crowded {
            continue;
        }

        let ground = terrain.height_at(x, z);
        if ground < BUILDING_MIN_GROUND {
            continue;
        }

        let style = pick_style(rng.gen::<f64>());
        let scale = rng.gen_range(BUILDING_SCALE.0..BUILDING_SCALE.1);
        let id = first_id + placed.len() as u32;
        placed.push(Obstacle::building(id, style, Vec3::new(x, ground, z), scale));
    }

    debug!(placed = placed.len(), attempts, "buildings generated");
    placed
}

/// Place up to `count` trees clear of `existing` obstacles. Ids start at `first_id`.
pub fn place_trees(
    rng: &mut ChaCha8Rng,
    terrain: &Heightfield,
    existing: &[Obstacle],
    count: usize,
    first_id: u32,
) -> Vec<Obstacle> {
    let mut placed: Vec<Obstacle> = Vec::with_capacity(count);
    let max_attempts = count * ATTEMPTS_PER_ITEM;
    let mut attempts = 0;

    while placed.len() < count && attempts < max_attempts {
        attempts += 1;
        let (x, z) = random_point(rng, terrain.size(), TREE_EDGE_PADDING);
        let candidate = Vec3::new(x, 0.0, z);

        let crowded = existing
            .iter()
            .chain(placed.iter())
            .any(|o| horizontal_distance(candidate, o.position) < o.radius + TREE_SPACING);
        if crowded {
            continue;
        }

        let ground = terrain.height_at(x, z);
        if ground < TREE_MIN_GROUND {
            continue;
        }

        let scale = rng.gen_range(TREE_SCALE.0..TREE_SCALE.1);
        let id = first_id + placed.len() as u32;
        placed.push(Obstacle::tree(id, Vec3::new(x, ground, z), scale));
    }

    debug!(placed = placed.len(), attempts, "trees generated");
    placed
}

/// Uniform point in the footprint shrunk by `padding` on every side.
pub(crate) fn random_point(rng: &mut ChaCha8Rng, size: f64, padding: f64) -> (f64, f64) {
    let lo = -size / 2.0 + padding;
    let hi = size / 2.0 - padding;
    (rng.gen_range(lo..hi), rng.gen_range(lo..hi))
}

fn pick_style(roll: f64) -> BuildingStyle {
    let mut cumulative = 0.0;
    for (style, weight) in BUILDING_STYLES {
        cumulative += weight;
        if roll <= cumulative {
            return style;
        }
    }
    BuildingStyle::House
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_style_weights() {
        assert_eq!(pick_style(0.0), BuildingStyle::House);
        assert_eq!(pick_style(0.39), BuildingStyle::House);
        assert_eq!(pick_style(0.5), BuildingStyle::Warehouse);
        assert_eq!(pick_style(0.7), BuildingStyle::Tower);
        assert_eq!(pick_style(0.85), BuildingStyle::Mosque);
        assert_eq!(pick_style(0.95), BuildingStyle::Ruins);
    }
}
