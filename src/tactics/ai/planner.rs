//! Heuristic planner - one action per unit per phase
//!
//! Pick the highest-priority enemy. Attack it if possible; otherwise take
//! the best-scoring tile within move range; otherwise step one cell
//! towards it.

use tracing::debug;

use crate::core::types::UnitId;
use crate::tactics::ai::decision_context::DecisionContext;
use crate::tactics::ai::personality::AiPersonality;
use crate::tactics::ai::scoring::{score_position, score_target};
use crate::tactics::ai::{PlannedAction, TacticalAi};
use crate::tactics::position::Position;
use crate::tactics::units::Unit;

/// Stateless heuristic AI driven by a personality
#[derive(Debug, Clone, Default)]
pub struct HeuristicPlanner {
    personality: AiPersonality,
}

impl HeuristicPlanner {
    pub fn new(personality: AiPersonality) -> Self {
        Self { personality }
    }

    /// Highest-scoring living enemy; the first one wins ties
    pub fn select_target<'a>(&self, unit: &Unit, ctx: &DecisionContext<'a>) -> Option<&'a Unit> {
        let mut best: Option<(&'a Unit, i32)> = None;
        for enemy in ctx.enemies_of(unit.faction()) {
            let score = score_target(&self.personality, ctx, unit.position(), enemy);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((enemy, score));
            }
        }
        best.map(|(enemy, _)| enemy)
    }

    /// Best enterable tile within move range scoring above the floor
    ///
    /// Candidates are visited dx-major then dy, both ascending; the first
    /// of equal scores is kept.
    pub fn best_tactical_position(
        &self,
        unit: &Unit,
        target: Position,
        ctx: &DecisionContext,
    ) -> Option<Position> {
        let mut best_score = self.personality.positioning.score_floor;
        let mut best_pos = None;

        for candidate in unit.position().within_range(unit.move_range()) {
            if !ctx.can_enter(candidate) {
                continue;
            }
            let score = score_position(
                &self.personality,
                ctx,
                unit.archetype(),
                unit.faction(),
                candidate,
                target,
            );
            if score > best_score {
                best_score = score;
                best_pos = Some(candidate);
            }
        }

        best_pos.filter(|&pos| pos != unit.position())
    }

    /// Enterable neighbour (of eight) closest to the target
    pub fn step_towards(&self, unit: &Unit, target: Position, ctx: &DecisionContext) -> Option<Position> {
        let mut best: Option<(Position, u32)> = None;
        for candidate in unit.position().neighbors8() {
            if !ctx.can_enter(candidate) {
                continue;
            }
            let distance = candidate.distance(&target);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((candidate, distance));
            }
        }
        best.map(|(pos, _)| pos)
    }
}

impl TacticalAi for HeuristicPlanner {
    fn decide(&self, unit_id: UnitId, ctx: &DecisionContext) -> PlannedAction {
        let Some(unit) = ctx.unit(unit_id) else {
            return PlannedAction::Hold;
        };
        if unit.ap() == 0 {
            return PlannedAction::Hold;
        }
        let Some(target) = self.select_target(unit, ctx) else {
            return PlannedAction::Hold;
        };

        let action = if unit.can_attack(target.position(), ctx.map) {
            PlannedAction::Attack {
                target_id: target.id(),
                target: target.position(),
            }
        } else if let Some(to) = self.best_tactical_position(unit, target.position(), ctx) {
            PlannedAction::TacticalMove { to }
        } else if let Some(to) = self.step_towards(unit, target.position(), ctx) {
            PlannedAction::Advance { to }
        } else {
            PlannedAction::Hold
        };

        debug!(unit = %unit_id, target = %target.id(), ?action, "ai decision");
        action
    }

    fn personality(&self) -> &AiPersonality {
        &self.personality
    }
}
