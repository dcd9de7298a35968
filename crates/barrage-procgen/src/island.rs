//! Island heightfield: layered sine dunes with a smoothstep coastline
//! and a couple of shallow oases.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use barrage_core::constants::{TERRAIN_SEGMENTS, TERRAIN_SIZE};
use barrage_terrain::Heightfield;

/// The island proper ends at this fraction of the footprint.
const ISLAND_RADIUS_FRACTION: f64 = 1.0 / 2.2;

/// The coastline falloff starts at this fraction of the island radius.
const COAST_START: f64 = 0.7;

/// Oases only appear inside this fraction of the island radius.
const OASIS_MAX_RADIUS: f64 = 0.6;

const OASIS_COUNT: usize = 2;

const OASIS_DEPTH: f64 = 2.0;

/// Lowest height anywhere on the map.
const MIN_HEIGHT: f64 = 0.1;

/// Generate the round's terrain.
pub fn generate_island(rng: &mut ChaCha8Rng) -> Heightfield {
    let seed = rng.gen::<f64>() * 1000.0;
    island_heightfield(TERRAIN_SIZE, TERRAIN_SEGMENTS, seed)
}

/// Deterministic island for a given map seed.
pub fn island_heightfield(size: f64, segments: usize, seed: f64) -> Heightfield {
    Heightfield::from_fn(size, segments, |x, z| island_height(x, z, size, seed))
}

/// Height of the island surface at world `(x, z)`.
pub fn island_height(x: f64, z: f64, size: f64, seed: f64) -> f64 {
    // The dune pattern is laid out in plane coordinates, where v runs against world z.
    let u = x;
    let v = -z;

    let from_center = (u * u + v * v).sqrt();
    let island_radius = size * ISLAND_RADIUS_FRACTION;

    let base = 2.0 + (seed + u * 0.02).sin() * 0.5;
    let large = dune(u + seed * 10.0, 0.08, v + seed * 15.0, 0.06) * 6.0;
    let medium = dune(u + seed * 25.0, 0.15, v + seed * 30.0, 0.12) * 3.0;
    let small = dune(u + seed * 50.0, 0.25, v + seed * 75.0, 0.2) * 1.5;
    let undulation = ((u + seed * 100.0) * 0.1 + std::f64::consts::FRAC_PI_4).sin()
        * ((v + seed * 125.0) * 0.15 + std::f64::consts::FRAC_PI_3).cos()
        * 0.8;

    let mut height = base + large + medium + small + undulation;

    let coast = island_radius * COAST_START;
    if from_center > coast {
        let edge = (1.0 - (from_center - coast) / (island_radius * (1.0 - COAST_START))).max(0.0);
        height *= edge * edge * (3.0 - 2.0 * edge);
    }

    for j in 0..OASIS_COUNT {
        let k = (j + 1) as f64;
        let span = size * 0.6;
        let center_u = (seed * k * 123.456) % span - size * 0.3;
        let center_v = (seed * k * 789.123) % span - size * 0.3;
        let oasis_size = 10.0 + (seed * k * 30.0) % 15.0;

        let du = u - center_u;
        let dv = v - center_v;
        let to_oasis = (du * du + dv * dv).sqrt();
        if to_oasis < oasis_size && from_center < island_radius * OASIS_MAX_RADIUS {
            let strength = 1.0 - to_oasis / oasis_size;
            height = (height - strength * strength * OASIS_DEPTH).max(0.0);
        }
    }

    height.max(MIN_HEIGHT)
}

/// One dune layer, normalized to 0..=1.
fn dune(a: f64, fa: f64, b: f64, fb: f64) -> f64 {
    ((a * fa).sin() * (b * fb).cos() + 1.0) / 2.0
}
