//! AI's read-only view of the tactical state
//!
//! Built fresh for every decision so the planner never sees a half-applied
//! action.

use crate::core::types::UnitId;
use crate::tactics::archetype::Faction;
use crate::tactics::grid_map::GridMap;
use crate::tactics::position::Position;
use crate::tactics::units::{Unit, UnitRegistry};

/// AI's decision-making context
pub struct DecisionContext<'a> {
    pub map: &'a GridMap,
    pub units: &'a UnitRegistry,
}

impl<'a> DecisionContext<'a> {
    pub fn new(map: &'a GridMap, units: &'a UnitRegistry) -> Self {
        Self { map, units }
    }

    pub fn unit(&self, unit_id: UnitId) -> Option<&'a Unit> {
        self.units.get(unit_id)
    }

    /// Living units opposing `faction`, in registry order
    pub fn enemies_of(&self, faction: Faction) -> Vec<&'a Unit> {
        self.units.of_faction(faction.opponent()).collect()
    }

    /// Living units opposing `faction` within `radius` of `pos`
    pub fn enemies_near(&self, faction: Faction, pos: Position, radius: u32) -> usize {
        self.units
            .of_faction(faction.opponent())
            .filter(|u| u.position().distance(&pos) <= radius)
            .count()
    }

    pub fn can_enter(&self, pos: Position) -> bool {
        self.map.can_enter(pos)
    }

    pub fn cover_at(&self, pos: Position) -> f64 {
        self.map.cover_at(pos)
    }
}
