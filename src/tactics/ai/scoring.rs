//! Pure scoring functions for target selection and move candidates
//!
//! Positions are scored from archetype stats alone; no hypothetical unit is
//! ever built.

use crate::tactics::ai::decision_context::DecisionContext;
use crate::tactics::ai::personality::AiPersonality;
use crate::tactics::archetype::{Archetype, Faction};
use crate::tactics::position::Position;
use crate::tactics::units::Unit;

/// Priority of `target` for an attacker standing at `from`
///
/// threat(archetype) + wounded bonus + max(0, base - falloff * distance)
/// + exposed bonus when the target has no cover.
pub fn score_target(
    personality: &AiPersonality,
    ctx: &DecisionContext,
    from: Position,
    target: &Unit,
) -> i32 {
    let weights = &personality.targeting;
    let distance = from.distance(&target.position()) as i32;

    let mut score = personality.threat.weight_for(target.archetype());
    if target.is_wounded() {
        score += weights.wounded_bonus;
    }
    score += (weights.proximity_base - weights.proximity_falloff * distance).max(0);
    if ctx.cover_at(target.position()) == 0.0 {
        score += weights.exposed_bonus;
    }
    score
}

/// Value of standing at `candidate` for a unit of `archetype` hunting `target`
pub fn score_position(
    personality: &AiPersonality,
    ctx: &DecisionContext,
    archetype: Archetype,
    faction: Faction,
    candidate: Position,
    target: Position,
) -> i32 {
    let weights = &personality.positioning;
    let stats = archetype.stats();
    let distance = candidate.distance(&target) as i32;

    let mut score = 0;
    if archetype == Archetype::Sniper {
        let ideal = (stats.range / 2) as i32;
        score -= (distance - ideal).abs() * weights.sniper_distance_penalty;
    } else {
        score -= distance * weights.approach_penalty;
    }

    if ctx.cover_at(candidate) > 0.0 {
        score += weights.cover_bonus;
    }

    // Range only; line of sight is left to the attack itself
    if candidate.distance(&target) <= stats.range {
        score += weights.in_range_bonus;
    }

    let crowd = ctx.enemies_near(faction, candidate, weights.crowding_radius) as i32;
    score -= crowd * weights.crowding_penalty;
    score
}
