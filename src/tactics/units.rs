//! Units and the unit registry
//!
//! A unit is an archetype tag plus its mutable combat state. Units leave the
//! registry the moment they are eliminated.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::IllegalAction;
use crate::core::types::UnitId;
use crate::tactics::archetype::{AbilityKind, Archetype, ArchetypeStats, Faction};
use crate::tactics::constants::{MAX_AP, WOUNDED_HP_FRACTION};
use crate::tactics::grid_map::GridMap;
use crate::tactics::position::Position;

/// A combatant on the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub(crate) id: UnitId,
    pub(crate) archetype: Archetype,
    pub(crate) faction: Faction,
    pub(crate) hp: u32,
    pub(crate) ap: u32,
    pub(crate) position: Position,
    pub(crate) alive: bool,
}

impl Unit {
    /// Fresh unit at full HP and AP
    pub fn new(id: UnitId, archetype: Archetype, faction: Faction, position: Position) -> Self {
        Self {
            id,
            archetype,
            faction,
            hp: archetype.stats().max_hp,
            ap: MAX_AP,
            position,
            alive: true,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn faction(&self) -> Faction {
        self.faction
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn ap(&self) -> u32 {
        self.ap
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn stats(&self) -> &'static ArchetypeStats {
        self.archetype.stats()
    }

    pub fn name(&self) -> &'static str {
        self.archetype.name()
    }

    pub fn max_hp(&self) -> u32 {
        self.stats().max_hp
    }

    pub fn max_ap(&self) -> u32 {
        MAX_AP
    }

    pub fn damage(&self) -> u32 {
        self.stats().damage
    }

    pub fn range(&self) -> u32 {
        self.stats().range
    }

    pub fn move_range(&self) -> u32 {
        self.stats().move_range
    }

    pub fn ability(&self) -> Option<AbilityKind> {
        self.archetype.ability()
    }

    /// Is the unit below half health?
    pub fn is_wounded(&self) -> bool {
        (self.hp as f64) < self.max_hp() as f64 * WOUNDED_HP_FRACTION
    }

    pub fn has_line_of_sight(&self, target: Position, map: &GridMap) -> bool {
        map.has_line_of_sight(self.position, target)
    }

    /// Attack precondition with the first failing reason
    pub fn check_attack(&self, target: Position, map: &GridMap) -> Result<(), IllegalAction> {
        if self.ap < 1 {
            return Err(IllegalAction::InsufficientAp);
        }
        if target == self.position {
            return Err(IllegalAction::SelfTarget);
        }
        if self.position.distance(&target) > self.range() {
            return Err(IllegalAction::OutOfRange);
        }
        if !self.has_line_of_sight(target, map) {
            return Err(IllegalAction::NoLineOfSight);
        }
        Ok(())
    }

    /// AP available, target in range and in sight
    pub fn can_attack(&self, target: Position, map: &GridMap) -> bool {
        self.check_attack(target, map).is_ok()
    }

    /// Apply damage, returning the HP actually lost
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if self.hp == 0 {
            self.alive = false;
        }
        lost
    }

    /// Restore HP up to max, returning the amount actually healed
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_hp() - self.hp);
        self.hp += healed;
        healed
    }

    /// Grant AP up to max, returning the amount actually gained
    pub fn gain_ap(&mut self, amount: u32) -> u32 {
        let gained = amount.min(MAX_AP - self.ap);
        self.ap += gained;
        gained
    }

    pub fn spend_ap(&mut self, amount: u32) -> Result<(), IllegalAction> {
        if self.ap < amount {
            return Err(IllegalAction::InsufficientAp);
        }
        self.ap -= amount;
        Ok(())
    }

    pub fn reset_ap(&mut self) {
        self.ap = MAX_AP;
    }
}

/// Living units in spawn order with id lookup
///
/// Not serializable: the id index is derived state and would be lost.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: Vec<Unit>,
    index: AHashMap<UnitId, usize>,
    next_id: u32,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            index: AHashMap::new(),
            next_id: 1,
        }
    }

    /// Reserve the next sequential id
    pub fn allocate_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, unit: Unit) {
        self.index.insert(unit.id, self.units.len());
        self.units.push(unit);
    }

    /// Remove a unit, keeping the remaining spawn order
    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let idx = self.index.remove(&id)?;
        let unit = self.units.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(unit)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.index.get(&id).map(|&i| &self.units[i])
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        match self.index.get(&id) {
            Some(&i) => Some(&mut self.units[i]),
            None => None,
        }
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    pub fn of_faction(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.alive && u.faction == faction)
    }

    /// Ids of a faction's living units in registry order
    pub fn ids_of(&self, faction: Faction) -> Vec<UnitId> {
        self.of_faction(faction).map(|u| u.id).collect()
    }

    pub fn living_count(&self, faction: Faction) -> usize {
        self.of_faction(faction).count()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medic() -> Unit {
        Unit::new(UnitId(1), Archetype::Medic, Faction::Rioter, Position::new(4, 4))
    }

    #[test]
    fn test_spawn_full_stats() {
        let unit = medic();
        assert_eq!(unit.hp(), 70);
        assert_eq!(unit.ap(), 2);
        assert!(unit.is_alive());
        assert_eq!(unit.range(), 2);
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut unit = medic();
        assert_eq!(unit.take_damage(30), 30);
        assert_eq!(unit.hp(), 40);
        assert!(unit.is_alive());

        assert_eq!(unit.take_damage(100), 40);
        assert_eq!(unit.hp(), 0);
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_heal_capped_at_max() {
        let mut unit = medic();
        unit.take_damage(10);
        assert_eq!(unit.heal(30), 10);
        assert_eq!(unit.hp(), 70);
        assert_eq!(unit.heal(30), 0);
    }

    #[test]
    fn test_ap_bounds() {
        let mut unit = medic();
        assert_eq!(unit.gain_ap(1), 0);
        unit.spend_ap(2).unwrap();
        assert_eq!(unit.spend_ap(1), Err(IllegalAction::InsufficientAp));
        assert_eq!(unit.gain_ap(5), 2);
        unit.spend_ap(1).unwrap();
        unit.reset_ap();
        assert_eq!(unit.ap(), MAX_AP);
    }

    #[test]
    fn test_wounded_threshold() {
        let mut unit = medic();
        unit.take_damage(35);
        assert!(!unit.is_wounded());
        unit.take_damage(1);
        assert!(unit.is_wounded());
    }

    #[test]
    fn test_check_attack_reasons() {
        let map = GridMap::new(20, 15);
        let mut unit = medic();

        assert_eq!(
            unit.check_attack(Position::new(4, 4), &map),
            Err(IllegalAction::SelfTarget)
        );
        assert_eq!(
            unit.check_attack(Position::new(7, 4), &map),
            Err(IllegalAction::OutOfRange)
        );
        assert!(unit.can_attack(Position::new(5, 5), &map));

        unit.spend_ap(2).unwrap();
        assert_eq!(
            unit.check_attack(Position::new(5, 5), &map),
            Err(IllegalAction::InsufficientAp)
        );
    }

    #[test]
    fn test_check_attack_blocked_by_wall() {
        let mut map = GridMap::new(20, 15);
        map.set_kind(Position::new(5, 4), crate::tactics::terrain::TileKind::Wall)
            .unwrap();
        let unit = medic();
        assert_eq!(
            unit.check_attack(Position::new(6, 4), &map),
            Err(IllegalAction::NoLineOfSight)
        );
    }

    #[test]
    fn test_registry_keeps_spawn_order_after_removal() {
        let mut registry = UnitRegistry::new();
        for x in 1..=4 {
            let id = registry.allocate_id();
            registry.insert(Unit::new(
                id,
                Archetype::Officer,
                Faction::Police,
                Position::new(x, 1),
            ));
        }
        let removed = registry.remove(UnitId(2)).unwrap();
        assert_eq!(removed.position(), Position::new(2, 1));

        let ids: Vec<UnitId> = registry.iter().map(|u| u.id()).collect();
        assert_eq!(ids, vec![UnitId(1), UnitId(3), UnitId(4)]);
        assert_eq!(registry.get(UnitId(4)).unwrap().position(), Position::new(4, 1));
        assert!(registry.get(UnitId(2)).is_none());
        assert!(registry.remove(UnitId(2)).is_none());
    }

    #[test]
    fn test_cloned_registry_answers_lookups() {
        let mut registry = UnitRegistry::new();
        for x in 1..=3 {
            let id = registry.allocate_id();
            registry.insert(Unit::new(id, Archetype::Officer, Faction::Police, Position::new(x, 1)));
        }
        registry.remove(UnitId(1));

        let mut copy = registry.clone();
        assert_eq!(copy.get(UnitId(3)).unwrap().position(), Position::new(3, 1));
        assert!(copy.contains(UnitId(2)));
        assert!(!copy.contains(UnitId(1)));
        copy.get_mut(UnitId(2)).unwrap().take_damage(10);
        assert_eq!(registry.get(UnitId(2)).unwrap().hp(), 100);
        assert_eq!(copy.allocate_id(), UnitId(4));
    }

    #[test]
    fn test_registry_faction_queries() {
        let mut registry = UnitRegistry::new();
        let a = registry.allocate_id();
        registry.insert(Unit::new(a, Archetype::Brawler, Faction::Rioter, Position::new(2, 2)));
        let b = registry.allocate_id();
        registry.insert(Unit::new(b, Archetype::Sniper, Faction::Police, Position::new(9, 9)));

        assert_eq!(registry.living_count(Faction::Rioter), 1);
        assert_eq!(registry.ids_of(Faction::Police), vec![b]);
        assert_ne!(a, b);
    }
}
