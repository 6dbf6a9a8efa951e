//! Combat resolution: movement, attacks and abilities
//!
//! Each resolver validates every precondition before touching state, so a
//! rejected action leaves the map and registry exactly as they were. Turn
//! ownership and game-over checks belong to the turn controller.

use rand::Rng;
use tracing::debug;

use crate::core::config::RulesConfig;
use crate::core::error::{IllegalAction, TacticsError, TacticsResult};
use crate::core::types::UnitId;
use crate::tactics::archetype::{AbilityKind, Faction};
use crate::tactics::constants::{ABILITY_AP_COST, AREA_RADIUS, ATTACK_AP_COST, MOVE_AP_COST};
use crate::tactics::events::TacticsEvent;
use crate::tactics::grid_map::GridMap;
use crate::tactics::position::Position;
use crate::tactics::terrain::TileKind;
use crate::tactics::units::{Unit, UnitRegistry};

/// Cover-reduced, variance-scaled attack damage
///
/// floor(floor(base * (1 - cover)) * variance)
pub fn compute_damage(base: u32, cover_fraction: f64, variance: f64) -> u32 {
    let covered = (base as f64 * (1.0 - cover_fraction)).floor();
    (covered * variance).floor().max(0.0) as u32
}

/// Draw a damage multiplier from the configured uniform range
pub fn roll_variance(config: &RulesConfig, rng: &mut impl Rng) -> f64 {
    rng.gen_range(config.variance_min..=config.variance_max)
}

fn lookup(units: &UnitRegistry, unit_id: UnitId) -> TacticsResult<&Unit> {
    units
        .get(unit_id)
        .ok_or(TacticsError::IllegalAction(IllegalAction::UnitNotFound(unit_id)))
}

fn lookup_mut(units: &mut UnitRegistry, unit_id: UnitId) -> TacticsResult<&mut Unit> {
    units
        .get_mut(unit_id)
        .ok_or(TacticsError::IllegalAction(IllegalAction::UnitNotFound(unit_id)))
}

fn ensure_valid(map: &GridMap, pos: Position) -> TacticsResult<()> {
    if map.is_valid(pos) {
        Ok(())
    } else {
        Err(TacticsError::InvalidPosition(pos))
    }
}

/// Confirm a tile's occupant is registered at that tile
fn ensure_linked(units: &UnitRegistry, unit_id: UnitId, pos: Position) -> TacticsResult<()> {
    match units.get(unit_id) {
        Some(unit) if unit.position() == pos => Ok(()),
        _ => {
            debug_assert!(false, "tile {} links unregistered unit {}", pos, unit_id);
            Err(TacticsError::InconsistentState(format!(
                "tile {} links unit {} which is not there",
                pos, unit_id
            )))
        }
    }
}

/// Take a dead unit off the board and out of the registry
pub(crate) fn eliminate(
    map: &mut GridMap,
    units: &mut UnitRegistry,
    unit_id: UnitId,
) -> TacticsResult<TacticsEvent> {
    let unit = lookup(units, unit_id)?;
    map.remove_unit(unit)?;
    units.remove(unit_id);
    debug!(unit = %unit_id, "unit eliminated");
    Ok(TacticsEvent::UnitEliminated { unit_id })
}

/// Apply flat damage to whoever stands on `pos`, eliminating them at 0 HP
fn damage_occupant(
    map: &mut GridMap,
    units: &mut UnitRegistry,
    attacker_id: UnitId,
    pos: Position,
    amount: u32,
    events: &mut Vec<TacticsEvent>,
) -> TacticsResult<()> {
    let Some(target_id) = map.occupant(pos) else {
        return Ok(());
    };
    let target = lookup_mut(units, target_id)?;
    let dealt = target.take_damage(amount);
    let dead = !target.is_alive();

    events.push(TacticsEvent::DamageDealt {
        attacker_id,
        target_id,
        amount: dealt,
        cover_fraction: 0.0,
    });
    if dead {
        events.push(eliminate(map, units, target_id)?);
    }
    Ok(())
}

/// Move a unit up to its move range (Manhattan, no pathing)
pub fn resolve_move(
    map: &mut GridMap,
    units: &mut UnitRegistry,
    unit_id: UnitId,
    to: Position,
) -> TacticsResult<Vec<TacticsEvent>> {
    let unit = lookup(units, unit_id)?;
    ensure_valid(map, to)?;
    if unit.ap() < MOVE_AP_COST {
        return Err(IllegalAction::InsufficientAp.into());
    }
    if unit.position().distance(&to) > unit.move_range() {
        return Err(IllegalAction::OutOfRange.into());
    }
    if !map.can_enter(to) {
        return Err(IllegalAction::NotEnterable.into());
    }

    let unit = lookup_mut(units, unit_id)?;
    let from = unit.position();
    map.move_unit(unit, to)?;
    unit.spend_ap(MOVE_AP_COST)?;

    debug!(unit = %unit_id, %from, %to, "unit moved");
    Ok(vec![TacticsEvent::UnitMoved { unit_id, from, to }])
}

/// Attack a tile; an empty tile is a miss that still costs AP
pub fn resolve_attack(
    map: &mut GridMap,
    units: &mut UnitRegistry,
    config: &RulesConfig,
    rng: &mut impl Rng,
    attacker_id: UnitId,
    target: Position,
) -> TacticsResult<Vec<TacticsEvent>> {
    let attacker = lookup(units, attacker_id)?;
    ensure_valid(map, target)?;
    attacker.check_attack(target, map)?;

    let defender_id = map.occupant(target);
    if let Some(defender_id) = defender_id {
        ensure_linked(units, defender_id, target)?;
        let defender = lookup(units, defender_id)?;
        if defender.faction() == attacker.faction() {
            return Err(IllegalAction::FriendlyFire.into());
        }
    }

    let base = attacker.damage();
    lookup_mut(units, attacker_id)?.spend_ap(ATTACK_AP_COST)?;

    let Some(defender_id) = defender_id else {
        debug!(attacker = %attacker_id, %target, "attack hit empty tile");
        return Ok(vec![TacticsEvent::AttackMissed {
            attacker_id,
            target,
        }]);
    };

    let cover_fraction = map.cover_at(target);
    let variance = roll_variance(config, rng);
    let amount = compute_damage(base, cover_fraction, variance);

    let defender = lookup_mut(units, defender_id)?;
    defender.take_damage(amount);
    let dead = !defender.is_alive();

    debug!(
        attacker = %attacker_id,
        defender = %defender_id,
        amount,
        cover_fraction,
        variance,
        "attack resolved"
    );

    let mut events = vec![TacticsEvent::DamageDealt {
        attacker_id,
        target_id: defender_id,
        amount,
        cover_fraction,
    }];
    if dead {
        events.push(eliminate(map, units, defender_id)?);
    }
    Ok(events)
}

/// Cast the caster's special ability
///
/// Costs exactly one AP however many tiles or allies are affected,
/// including none.
pub fn resolve_ability(
    map: &mut GridMap,
    units: &mut UnitRegistry,
    config: &RulesConfig,
    caster_id: UnitId,
    kind: AbilityKind,
    target: Option<Position>,
) -> TacticsResult<Vec<TacticsEvent>> {
    let caster = lookup(units, caster_id)?;
    if caster.ability() != Some(kind) {
        return Err(IllegalAction::AbilityUnavailable.into());
    }

    let target = match (kind.is_targeted(), target) {
        (true, None) => return Err(IllegalAction::MissingTarget.into()),
        (false, Some(_)) => return Err(IllegalAction::AbilityNotTargeted.into()),
        (true, Some(pos)) => {
            ensure_valid(map, pos)?;
            Some(pos)
        }
        (false, None) => None,
    };

    if caster.ap() < ABILITY_AP_COST {
        return Err(IllegalAction::InsufficientAp.into());
    }
    if let Some(pos) = target {
        if caster.position().distance(&pos) > caster.range() {
            return Err(IllegalAction::OutOfRange.into());
        }
    }

    let origin = caster.position();
    let faction = caster.faction();
    lookup_mut(units, caster_id)?.spend_ap(ABILITY_AP_COST)?;

    let mut affected = Vec::new();
    let mut effects = Vec::new();

    match kind {
        AbilityKind::Molotov => {
            let center = target.unwrap_or(origin);
            for pos in center.area(AREA_RADIUS) {
                if !map.kind_at(pos).is_some_and(|k| k.is_flammable()) {
                    continue;
                }
                map.set_kind(pos, TileKind::Fire)?;
                affected.push(pos);
                damage_occupant(map, units, caster_id, pos, config.molotov_damage, &mut effects)?;
            }
        }
        AbilityKind::Smoke => {
            for pos in origin.area(AREA_RADIUS) {
                if map.kind_at(pos) == Some(TileKind::Empty) {
                    map.set_kind(pos, TileKind::Smoke)?;
                    affected.push(pos);
                }
            }
        }
        AbilityKind::DeployCover => {
            let spot = origin.neighbors4().into_iter().find(|&pos| {
                map.kind_at(pos) == Some(TileKind::Empty) && map.occupant(pos).is_none()
            });
            if let Some(pos) = spot {
                map.set_kind(pos, TileKind::HalfCover)?;
                affected.push(pos);
            }
        }
        AbilityKind::Heal => {
            for ally in allies_within(units, caster_id, faction, origin, config.heal_radius) {
                let unit = lookup_mut(units, ally)?;
                let amount = unit.heal(config.heal_amount);
                affected.push(unit.position());
                effects.push(TacticsEvent::UnitHealed {
                    unit_id: ally,
                    healer_id: caster_id,
                    amount,
                });
            }
        }
        AbilityKind::Inspire => {
            for ally in allies_within(units, caster_id, faction, origin, config.inspire_radius) {
                let unit = lookup_mut(units, ally)?;
                let ap_gained = unit.gain_ap(config.inspire_ap_gain);
                affected.push(unit.position());
                effects.push(TacticsEvent::UnitInspired {
                    unit_id: ally,
                    source_id: caster_id,
                    ap_gained,
                });
            }
        }
    }

    debug!(caster = %caster_id, ?kind, tiles = affected.len(), "ability resolved");

    let mut events = Vec::with_capacity(effects.len() + 1);
    events.push(TacticsEvent::AbilityUsed {
        unit_id: caster_id,
        kind,
        affected_positions: affected,
    });
    events.extend(effects);
    Ok(events)
}

/// Other living units of `faction` within Manhattan `radius` of `origin`
fn allies_within(
    units: &UnitRegistry,
    caster_id: UnitId,
    faction: Faction,
    origin: Position,
    radius: u32,
) -> Vec<UnitId> {
    units
        .of_faction(faction)
        .filter(|u| u.id() != caster_id && u.position().distance(&origin) <= radius)
        .map(|u| u.id())
        .collect()
}

/// Burn every unit standing on Fire; both factions are affected
pub(crate) fn resolve_hazards(
    map: &mut GridMap,
    units: &mut UnitRegistry,
    config: &RulesConfig,
) -> TacticsResult<Vec<TacticsEvent>> {
    let burning: Vec<UnitId> = units
        .iter()
        .filter(|u| u.is_alive() && map.kind_at(u.position()) == Some(TileKind::Fire))
        .map(|u| u.id())
        .collect();

    let mut events = Vec::new();
    for unit_id in burning {
        let unit = lookup_mut(units, unit_id)?;
        let amount = unit.take_damage(config.fire_hazard_damage);
        let dead = !unit.is_alive();
        events.push(TacticsEvent::HazardDamage { unit_id, amount });
        if dead {
            events.push(eliminate(map, units, unit_id)?);
        }
    }
    Ok(events)
}
