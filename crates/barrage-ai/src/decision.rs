//! Ranked rule evaluator for AI turns.
//!
//! Each rule inspects the situation and either claims the turn or passes.
//! Rules run from highest to lowest priority and the first claim wins.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use barrage_core::components::Obstacle;
use barrage_core::constants::*;
use barrage_core::types::Vec3;

use crate::profiles::DifficultyProfile;
use crate::sight;

/// What an AI tank does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AiDecision {
    Shoot { accuracy: f64 },
    Retreat { target: Vec3 },
    Reposition { target: Vec3 },
    Flank { target: Vec3 },
    Advance { target: Vec3 },
    HoldDistance { target: Vec3 },
    Aim,
}

impl AiDecision {
    pub fn priority(&self) -> u8 {
        match self {
            AiDecision::Shoot { .. } => 9,
            AiDecision::Retreat { .. } => 8,
            AiDecision::Reposition { .. } => 7,
            AiDecision::Flank { .. } => 6,
            AiDecision::Advance { .. } => 4,
            AiDecision::HoldDistance { .. } => 3,
            AiDecision::Aim => 1,
        }
    }

    /// Text for the action indicator, as in "Enemy is <label>...".
    pub fn label(&self) -> &'static str {
        match self {
            AiDecision::Shoot { .. } => "engaging target",
            AiDecision::Retreat { .. } => "retreating to cover",
            AiDecision::Reposition { .. } => "seeking tactical position",
            AiDecision::Flank { .. } => "flanking target",
            AiDecision::Advance { .. } => "advancing on target",
            AiDecision::HoldDistance { .. } => "maintaining distance",
            AiDecision::Aim => "aiming",
        }
    }

    /// Destination for the movement decisions.
    pub fn move_target(&self) -> Option<Vec3> {
        match *self {
            AiDecision::Retreat { target }
            | AiDecision::Reposition { target }
            | AiDecision::Flank { target }
            | AiDecision::Advance { target }
            | AiDecision::HoldDistance { target } => Some(target),
            AiDecision::Shoot { .. } | AiDecision::Aim => None,
        }
    }
}

/// Input to the decision rules for one AI tank.
pub struct Situation<'a> {
    pub position: Vec3,
    pub target: Vec3,
    pub health: i32,
    pub max_health: i32,
    pub has_fired: bool,
    pub obstacles: &'a [Obstacle],
    pub profile: &'a DifficultyProfile,
}

/// Facts derived once per decision and shared by every rule.
struct Assessment {
    distance: f64,
    line_of_sight: bool,
    in_cover: bool,
}

type Rule = fn(&Situation, &Assessment, &mut ChaCha8Rng) -> Option<AiDecision>;

/// Rules in priority order.
const RULES: [Rule; 4] = [shoot, retreat, tactical, close_or_open_range];

/// Decide what an AI tank does this turn.
pub fn decide(situation: &Situation, rng: &mut ChaCha8Rng) -> AiDecision {
    let assessment = Assessment {
        distance: situation.position.distance(situation.target),
        line_of_sight: sight::has_line_of_sight(
            situation.position,
            situation.target,
            situation.obstacles,
        ),
        in_cover: sight::in_cover(situation.position, situation.obstacles),
    };

    let decision = RULES
        .iter()
        .find_map(|rule| rule(situation, &assessment, rng))
        .unwrap_or(AiDecision::Aim);

    debug!(
        distance = assessment.distance,
        line_of_sight = assessment.line_of_sight,
        in_cover = assessment.in_cover,
        ?decision,
        "ai decision"
    );
    decision
}

fn shoot(s: &Situation, a: &Assessment, _rng: &mut ChaCha8Rng) -> Option<AiDecision> {
    if s.has_fired || a.distance > AI_MAX_ENGAGE_RANGE {
        return None;
    }
    if !a.line_of_sight && a.distance >= AI_BLIND_FIRE_RANGE {
        return None;
    }
    Some(AiDecision::Shoot {
        accuracy: (s.profile.aim_accuracy * 0.8).max(AI_MIN_ACCURACY),
    })
}

fn retreat(s: &Situation, a: &Assessment, _rng: &mut ChaCha8Rng) -> Option<AiDecision> {
    let low_health = (s.health as f64) < s.max_health as f64 * AI_LOW_HEALTH_FRACTION;
    if !low_health || s.profile.strategic_thinking <= 0.5 || a.in_cover {
        return None;
    }
    sight::best_cover(s.position, s.target, s.obstacles)
        .map(|target| AiDecision::Retreat { target })
}

/// Cover seeking, or flanking when cover is not on the cards.
fn tactical(s: &Situation, a: &Assessment, rng: &mut ChaCha8Rng) -> Option<AiDecision> {
    if s.profile.strategic_thinking <= 0.6 {
        return None;
    }
    if !a.in_cover && s.profile.cover_usage > rng.gen::<f64>() {
        return sight::best_cover(s.position, s.target, s.obstacles)
            .map(|target| AiDecision::Reposition { target });
    }
    if a.distance > AI_IDEAL_DISTANCE + AI_ADVANCE_MARGIN && !a.line_of_sight {
        return sight::flanking_position(s.position, s.target, s.obstacles)
            .map(|target| AiDecision::Flank { target });
    }
    None
}

fn close_or_open_range(s: &Situation, a: &Assessment, _rng: &mut ChaCha8Rng) -> Option<AiDecision> {
    if a.distance > AI_IDEAL_DISTANCE + AI_ADVANCE_MARGIN {
        let step = AI_IDEAL_DISTANCE * AI_ADVANCE_STEP_FACTOR;
        return Some(AiDecision::Advance {
            target: sight::position_towards(s.position, s.target, step),
        });
    }
    if a.distance < AI_IDEAL_DISTANCE - AI_RETREAT_MARGIN {
        let step = AI_IDEAL_DISTANCE * AI_RETREAT_STEP_FACTOR;
        return Some(AiDecision::HoldDistance {
            target: sight::position_away(s.position, s.target, step),
        });
    }
    None
}
