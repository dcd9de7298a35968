//! Battlefield assessment: sight lines, cover and flanking positions.
//!
//! Only standing obstacles matter. Terrain does not block sight.

use barrage_core::components::Obstacle;
use barrage_core::constants::{AI_COVER_DISTANCE, AI_FLANK_DISTANCE};
use barrage_core::types::{horizontal_distance, Vec3};

/// Minimum distance between a tank and a cover position worth driving to.
const MIN_COVER_TRAVEL: f64 = 3.0;

/// Whether the segment `from → to` passes clear of every standing obstacle.
pub fn has_line_of_sight(from: Vec3, to: Vec3, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .filter(|o| !o.destroyed)
        .all(|o| !segment_hits_sphere(from, to, o.hit_center(), o.radius))
}

/// Whether `position` is within cover distance of a standing building's wall.
pub fn in_cover(position: Vec3, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .filter(|o| !o.destroyed && o.kind.is_building())
        .any(|b| horizontal_distance(position, b.position) - b.radius < AI_COVER_DISTANCE)
}

/// Best standing building to hide behind from `threat`.
///
/// Scores `d_threat / 10 − d_self / 20`: far from the threat, near to us.
/// Only positive scores and buildings more than a few units away qualify.
pub fn best_cover(from: Vec3, threat: Vec3, obstacles: &[Obstacle]) -> Option<Vec3> {
    let mut best: Option<Vec3> = None;
    let mut best_score = 0.0;
    for building in obstacles
        .iter()
        .filter(|o| !o.destroyed && o.kind.is_building())
    {
        let to_threat = building.position.distance(threat);
        let to_self = building.position.distance(from);
        let score = to_threat / 10.0 - to_self / 20.0;
        if score > best_score && to_self > MIN_COVER_TRAVEL {
            best_score = score;
            best = Some(building.position);
        }
    }
    best
}

/// A position beside `from`, perpendicular to the line to `target`, that
/// has a clear shot. The left side is tried first.
pub fn flanking_position(from: Vec3, target: Vec3, obstacles: &[Obstacle]) -> Option<Vec3> {
    let perpendicular = Vec3::new(-(target.z - from.z), 0.0, target.x - from.x);
    if perpendicular.length_squared() < 1e-12 {
        return None;
    }
    let offset = perpendicular.normalize() * AI_FLANK_DISTANCE;

    [from + offset, from - offset]
        .into_iter()
        .find(|&flank| has_line_of_sight(flank, target, obstacles))
}

/// `step` units from `from` toward `target`.
pub fn position_towards(from: Vec3, target: Vec3, step: f64) -> Vec3 {
    from + (target - from).normalize_or_zero() * step
}

/// `step` units from `from` directly away from `threat`.
pub fn position_away(from: Vec3, threat: Vec3, step: f64) -> Vec3 {
    from + (from - threat).normalize_or_zero() * step
}

fn segment_hits_sphere(a: Vec3, b: Vec3, center: Vec3, radius: f64) -> bool {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let closest = a + ab * t;
    closest.distance_squared(center) < radius * radius
}
