//! Simulation state and turn control
//!
//! `SimulationState` owns everything: map, units, turn counter, phase,
//! targeting mode, event log and the random source. Drivers call its action
//! methods; each one either applies fully and returns its events, or is
//! rejected and leaves the state untouched.

use ahash::AHashSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::RulesConfig;
use crate::core::error::{IllegalAction, TacticsError, TacticsResult};
use crate::core::types::{TurnNumber, UnitId};
use crate::tactics::ai::{
    AiPersonality, AiStep, DecisionContext, HeuristicPlanner, PlannedAction, TacticalAi,
};
use crate::tactics::archetype::{AbilityKind, Archetype, Faction};
use crate::tactics::commands::{Command, TargetingMode};
use crate::tactics::constants::MAX_AP;
use crate::tactics::events::{EventLog, GameResult, LoggedEvent, TacticsEvent};
use crate::tactics::grid_map::{GridMap, Tile};
use crate::tactics::position::Position;
use crate::tactics::resolution::{
    resolve_ability, resolve_attack, resolve_hazards, resolve_move,
};
use crate::tactics::scenario::Scenario;
use crate::tactics::units::{Unit, UnitRegistry};

/// Turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    RioterTurn,
    PoliceTurn,
    GameOver(GameResult),
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver(_))
    }

    fn for_faction(faction: Faction) -> Self {
        match faction {
            Faction::Rioter => GamePhase::RioterTurn,
            Faction::Police => GamePhase::PoliceTurn,
        }
    }
}

/// A pending attack or targeted ability awaiting a target cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targeting {
    pub unit_id: UnitId,
    pub mode: TargetingMode,
}

/// Complete tactical simulation
pub struct SimulationState {
    config: RulesConfig,
    map: GridMap,
    units: UnitRegistry,
    current_faction: Faction,
    turn_number: TurnNumber,
    phase: GamePhase,
    targeting: Option<Targeting>,
    log: EventLog,
    rng: ChaCha8Rng,
    planner: HeuristicPlanner,
    ai_acted: AHashSet<UnitId>,
    pub(crate) history: Vec<Command>,
}

impl SimulationState {
    /// Build from an explicit map and random source
    pub fn new(config: RulesConfig, map: GridMap, rng: ChaCha8Rng) -> TacticsResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            map,
            units: UnitRegistry::new(),
            current_faction: Faction::Rioter,
            turn_number: 1,
            phase: GamePhase::RioterTurn,
            targeting: None,
            log: EventLog::new(),
            rng,
            planner: HeuristicPlanner::default(),
            ai_acted: AHashSet::new(),
            history: Vec::new(),
        })
    }

    /// Empty street map of the configured size with a seeded random source
    pub fn with_seed(config: RulesConfig, seed: u64) -> TacticsResult<Self> {
        let map = GridMap::street(config.map_width, config.map_height);
        Self::new(config, map, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Street map populated from a scenario, spawned in listed order
    pub fn from_scenario(scenario: &Scenario, config: RulesConfig, seed: u64) -> TacticsResult<Self> {
        let mut state = Self::with_seed(config, seed)?;
        for placement in &scenario.units {
            state.spawn_unit(placement.archetype, placement.position, placement.faction())?;
        }
        tracing::info!(
            "Scenario '{}' loaded with {} units",
            scenario.name,
            state.units.len()
        );
        Ok(state)
    }

    /// Swap the AI personality used for `ai_decide_and_apply`
    pub fn set_personality(&mut self, personality: AiPersonality) {
        self.planner = HeuristicPlanner::new(personality);
    }

    // ===== SETUP =====

    /// Place a new unit at full HP and AP
    pub fn spawn_unit(
        &mut self,
        archetype: Archetype,
        position: Position,
        faction: Faction,
    ) -> TacticsResult<UnitId> {
        if !self.map.is_valid(position) {
            return Err(TacticsError::InvalidPosition(position));
        }
        if !self.map.can_enter(position) {
            return Err(IllegalAction::NotEnterable.into());
        }

        let id = self.units.allocate_id();
        let unit = Unit::new(id, archetype, faction, position);
        self.map.place_unit(&unit)?;
        self.units.insert(unit);

        self.record(vec![TacticsEvent::UnitSpawned {
            unit_id: id,
            archetype,
            faction,
            position,
        }]);
        Ok(id)
    }

    // ===== QUERIES =====

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.map.tile_at(pos)
    }

    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.map.occupant(pos).and_then(|id| self.units.get(id))
    }

    pub fn unit(&self, unit_id: UnitId) -> Option<&Unit> {
        self.units.get(unit_id)
    }

    /// Living units in registry order, optionally of one faction
    pub fn list_units(&self, faction: Option<Faction>) -> Vec<&Unit> {
        self.units
            .iter()
            .filter(|u| faction.map_or(true, |f| u.faction() == f))
            .collect()
    }

    pub fn living_count(&self, faction: Faction) -> usize {
        self.units.living_count(faction)
    }

    pub fn current_faction(&self) -> Faction {
        self.current_faction
    }

    pub fn turn_number(&self) -> TurnNumber {
        self.turn_number
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn targeting(&self) -> Option<Targeting> {
        self.targeting
    }

    /// Has this unit already taken its AI action this phase?
    pub fn has_ai_acted(&self, unit_id: UnitId) -> bool {
        self.ai_acted.contains(&unit_id)
    }

    /// Read-only board view the AI decides from
    pub fn decision_context(&self) -> DecisionContext<'_> {
        DecisionContext::new(&self.map, &self.units)
    }

    /// Accepted commands since setup, in order
    pub fn history(&self) -> &[Command] {
        &self.history
    }

    /// Every event since setup
    pub fn events(&self) -> &[LoggedEvent] {
        self.log.entries()
    }

    /// Events not yet handed out by a previous drain
    pub fn drain_events(&mut self) -> Vec<LoggedEvent> {
        self.log.drain()
    }

    /// Enemy-occupied cells the unit could attack right now
    pub fn valid_attack_positions(&self, unit_id: UnitId) -> Vec<Position> {
        let Some(unit) = self.units.get(unit_id) else {
            return Vec::new();
        };
        self.units
            .of_faction(unit.faction().opponent())
            .map(|enemy| enemy.position())
            .filter(|&pos| unit.can_attack(pos, &self.map))
            .collect()
    }

    /// Cells the unit could move to right now
    pub fn reachable_positions(&self, unit_id: UnitId) -> Vec<Position> {
        let Some(unit) = self.units.get(unit_id) else {
            return Vec::new();
        };
        if unit.ap() == 0 {
            return Vec::new();
        }
        unit.position()
            .within_range(unit.move_range())
            .into_iter()
            .filter(|&pos| self.map.can_enter(pos))
            .collect()
    }

    /// Cells a Molotov from this unit could be centred on
    pub fn molotov_positions(&self, unit_id: UnitId) -> Vec<Position> {
        let Some(unit) = self.units.get(unit_id) else {
            return Vec::new();
        };
        if unit.ability() != Some(AbilityKind::Molotov) || unit.ap() == 0 {
            return Vec::new();
        }
        unit.position()
            .within_range(unit.range())
            .into_iter()
            .filter(|&pos| self.map.is_valid(pos))
            .collect()
    }

    /// Verify HP/AP bounds and both directions of the occupancy links
    pub fn check_invariants(&self) -> TacticsResult<()> {
        for unit in self.units.iter() {
            if unit.hp() == 0 || unit.hp() > unit.max_hp() {
                return Err(TacticsError::InconsistentState(format!(
                    "unit {} has hp {} of {}",
                    unit.id(),
                    unit.hp(),
                    unit.max_hp()
                )));
            }
            if unit.ap() > MAX_AP {
                return Err(TacticsError::InconsistentState(format!(
                    "unit {} has ap {} of {}",
                    unit.id(),
                    unit.ap(),
                    MAX_AP
                )));
            }
        }
        self.map.verify_occupancy(&self.units)
    }

    // ===== ACTIONS =====

    pub fn move_unit(&mut self, unit_id: UnitId, to: Position) -> TacticsResult<Vec<TacticsEvent>> {
        let result = self
            .guard_actor(unit_id)
            .and_then(|_| resolve_move(&mut self.map, &mut self.units, unit_id, to));
        self.conclude("move", result)
    }

    pub fn attack(&mut self, unit_id: UnitId, target: Position) -> TacticsResult<Vec<TacticsEvent>> {
        let result = self.guard_actor(unit_id).and_then(|_| {
            resolve_attack(
                &mut self.map,
                &mut self.units,
                &self.config,
                &mut self.rng,
                unit_id,
                target,
            )
        });
        self.conclude("attack", result)
    }

    pub fn cast_ability(
        &mut self,
        unit_id: UnitId,
        kind: AbilityKind,
        target: Option<Position>,
    ) -> TacticsResult<Vec<TacticsEvent>> {
        let result = self.guard_actor(unit_id).and_then(|_| {
            resolve_ability(
                &mut self.map,
                &mut self.units,
                &self.config,
                unit_id,
                kind,
                target,
            )
        });
        self.conclude("ability", result)
    }

    /// Enter targeting mode for an attack or a targeted ability
    pub fn begin_targeting(&mut self, unit_id: UnitId, mode: TargetingMode) -> TacticsResult<()> {
        let result = self.check_targeting(unit_id, mode).map(|_| {
            self.targeting = Some(Targeting { unit_id, mode });
            Vec::new()
        });
        self.conclude("begin targeting", result).map(|_| ())
    }

    fn check_targeting(&self, unit_id: UnitId, mode: TargetingMode) -> TacticsResult<()> {
        self.guard_actor(unit_id)?;
        let unit = self.require_unit(unit_id)?;
        if unit.ap() < 1 {
            return Err(IllegalAction::InsufficientAp.into());
        }
        if let TargetingMode::Ability(kind) = mode {
            if unit.ability() != Some(kind) {
                return Err(IllegalAction::AbilityUnavailable.into());
            }
            if !kind.is_targeted() {
                return Err(IllegalAction::AbilityNotTargeted.into());
            }
        }
        Ok(())
    }

    /// Resolve the pending targeting mode against `target`
    ///
    /// The mode is cleared only if the action is accepted.
    pub fn confirm_target(&mut self, target: Position) -> TacticsResult<Vec<TacticsEvent>> {
        let Some(pending) = self.targeting else {
            return self.conclude(
                "confirm target",
                Err(IllegalAction::NoTargetingMode.into()),
            );
        };
        let events = match pending.mode {
            TargetingMode::Attack => self.attack(pending.unit_id, target)?,
            TargetingMode::Ability(kind) => self.cast_ability(pending.unit_id, kind, Some(target))?,
        };
        self.targeting = None;
        Ok(events)
    }

    pub fn cancel_targeting(&mut self) {
        self.targeting = None;
    }

    /// Finish the current faction's phase
    ///
    /// Clears targeting, burns units on fire, checks for a winner, restores
    /// the ending faction's AP and hands over. Handing over to the Police
    /// runs their AI phase when `auto_ai_phase` is set; handing back to the
    /// Rioters advances the turn counter.
    pub fn end_turn(&mut self) -> TacticsResult<Vec<TacticsEvent>> {
        if self.is_game_over() {
            return self.conclude("end turn", Err(IllegalAction::GameOver.into()));
        }

        self.targeting = None;
        let mut events = resolve_hazards(&mut self.map, &mut self.units, &self.config)?;

        if let Some(game_over) = self.evaluate_outcome() {
            events.push(game_over);
            self.record(events.clone());
            return Ok(events);
        }

        let ending = self.current_faction;
        for unit in self.units.iter_mut().filter(|u| u.faction() == ending) {
            unit.reset_ap();
        }

        self.current_faction = ending.opponent();
        self.phase = GamePhase::for_faction(self.current_faction);
        self.ai_acted.clear();
        if ending == Faction::Police {
            self.turn_number += 1;
        }
        events.push(TacticsEvent::TurnEnded {
            faction: ending,
            new_turn_number: self.turn_number,
        });
        tracing::info!(
            "{} end their phase; {} to act on turn {}",
            ending,
            self.current_faction,
            self.turn_number
        );
        self.record(events.clone());
        self.debug_check();

        if ending == Faction::Rioter && self.config.auto_ai_phase {
            for step in self.run_ai_phase()? {
                events.extend(step.events);
            }
        }
        Ok(events)
    }

    /// Decide and apply one action for one unit of the acting faction
    ///
    /// Each unit may do this once per phase.
    pub fn ai_decide_and_apply(&mut self, unit_id: UnitId) -> TacticsResult<AiStep> {
        if let Err(err) = self.check_ai_turn(unit_id) {
            self.reject("ai action", &err);
            return Err(err);
        }

        let action = self.planner.decide(unit_id, &self.decision_context());

        let result = match action {
            PlannedAction::Attack { target, .. } => resolve_attack(
                &mut self.map,
                &mut self.units,
                &self.config,
                &mut self.rng,
                unit_id,
                target,
            ),
            PlannedAction::TacticalMove { to } | PlannedAction::Advance { to } => {
                resolve_move(&mut self.map, &mut self.units, unit_id, to)
            }
            PlannedAction::Hold => Ok(Vec::new()),
        };

        let events = self.conclude("ai action", result)?;
        self.ai_acted.insert(unit_id);
        Ok(AiStep {
            unit_id,
            action,
            events,
        })
    }

    /// One AI action for every living unit of the acting faction
    ///
    /// Units act in registry order; stops early if the game ends.
    pub fn run_ai_phase(&mut self) -> TacticsResult<Vec<AiStep>> {
        let mut steps = Vec::new();
        for unit_id in self.units.ids_of(self.current_faction) {
            if self.is_game_over() {
                break;
            }
            if !self.units.contains(unit_id) || self.ai_acted.contains(&unit_id) {
                continue;
            }
            steps.push(self.ai_decide_and_apply(unit_id)?);
        }
        Ok(steps)
    }

    // ===== INTERNALS =====

    fn check_ai_turn(&self, unit_id: UnitId) -> TacticsResult<()> {
        self.guard_actor(unit_id)?;
        if self.ai_acted.contains(&unit_id) {
            return Err(IllegalAction::AlreadyActed.into());
        }
        Ok(())
    }

    fn require_unit(&self, unit_id: UnitId) -> TacticsResult<&Unit> {
        self.units
            .get(unit_id)
            .ok_or(TacticsError::IllegalAction(IllegalAction::UnitNotFound(unit_id)))
    }

    /// Game still running, unit exists, and it belongs to the acting faction
    fn guard_actor(&self, unit_id: UnitId) -> TacticsResult<()> {
        if self.is_game_over() {
            return Err(IllegalAction::GameOver.into());
        }
        if self.require_unit(unit_id)?.faction() != self.current_faction {
            return Err(IllegalAction::WrongFaction.into());
        }
        Ok(())
    }

    /// Log a rejection, or finish an applied action with the win check
    fn conclude(
        &mut self,
        action: &str,
        result: TacticsResult<Vec<TacticsEvent>>,
    ) -> TacticsResult<Vec<TacticsEvent>> {
        match result {
            Ok(mut events) => {
                if let Some(game_over) = self.evaluate_outcome() {
                    events.push(game_over);
                }
                self.record(events.clone());
                self.debug_check();
                Ok(events)
            }
            Err(err) => {
                self.reject(action, &err);
                Err(err)
            }
        }
    }

    fn reject(&self, action: &str, err: &TacticsError) {
        match err {
            TacticsError::InconsistentState(msg) => {
                tracing::error!("{} aborted on inconsistent state: {}", action, msg)
            }
            other => tracing::warn!("{} rejected: {}", action, other),
        }
    }

    /// Defeat if no Rioters remain, else Victory if no Police remain
    fn evaluate_outcome(&mut self) -> Option<TacticsEvent> {
        if self.is_game_over() {
            return None;
        }
        let result = if self.units.living_count(Faction::Rioter) == 0 {
            GameResult::Defeat
        } else if self.units.living_count(Faction::Police) == 0 {
            GameResult::Victory
        } else {
            return None;
        };

        self.phase = GamePhase::GameOver(result);
        self.targeting = None;
        tracing::info!("Game over on turn {}: {}", self.turn_number, result);
        Some(TacticsEvent::GameOver { result })
    }

    fn record(&mut self, events: Vec<TacticsEvent>) {
        self.log.extend(self.turn_number, &events);
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_invariants().is_ok(),
            "invariant violated: {:?}",
            self.check_invariants()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tactics::terrain::TileKind;

    fn manual_config() -> RulesConfig {
        RulesConfig {
            auto_ai_phase: false,
            ..Default::default()
        }
    }

    fn duel() -> (SimulationState, UnitId, UnitId) {
        let mut state = SimulationState::with_seed(manual_config(), 3).unwrap();
        let brawler = state
            .spawn_unit(Archetype::Brawler, Position::new(5, 6), Faction::Rioter)
            .unwrap();
        let officer = state
            .spawn_unit(Archetype::Officer, Position::new(11, 6), Faction::Police)
            .unwrap();
        (state, brawler, officer)
    }

    #[test]
    fn test_initial_state() {
        let (state, brawler, _) = duel();
        assert_eq!(state.phase(), GamePhase::RioterTurn);
        assert_eq!(state.current_faction(), Faction::Rioter);
        assert_eq!(state.turn_number(), 1);
        assert_eq!(state.unit(brawler).unwrap().ap(), 2);
        assert_eq!(state.events().len(), 2);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_spawn_rejects_blocked_tile() {
        let (mut state, _, _) = duel();
        let err = state
            .spawn_unit(Archetype::Medic, Position::new(3, 3), Faction::Rioter)
            .unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::NotEnterable));
        let err = state
            .spawn_unit(Archetype::Medic, Position::new(5, 6), Faction::Rioter)
            .unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::NotEnterable));
        assert!(matches!(
            state.spawn_unit(Archetype::Medic, Position::new(40, 6), Faction::Rioter),
            Err(TacticsError::InvalidPosition(_))
        ));
    }

    #[test]
    fn test_wrong_faction_rejected() {
        let (mut state, _, officer) = duel();
        let err = state.move_unit(officer, Position::new(10, 6)).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::WrongFaction));
        assert_eq!(state.unit(officer).unwrap().position(), Position::new(11, 6));
    }

    #[test]
    fn test_two_end_turns_advance_turn_and_restore_ap() {
        let (mut state, brawler, officer) = duel();
        state.move_unit(brawler, Position::new(6, 6)).unwrap();
        state.move_unit(brawler, Position::new(7, 6)).unwrap();
        assert_eq!(state.unit(brawler).unwrap().ap(), 0);

        let events = state.end_turn().unwrap();
        assert_eq!(
            events,
            vec![TacticsEvent::TurnEnded {
                faction: Faction::Rioter,
                new_turn_number: 1,
            }]
        );
        assert_eq!(state.phase(), GamePhase::PoliceTurn);
        assert_eq!(state.unit(brawler).unwrap().ap(), 2);

        state.move_unit(officer, Position::new(12, 6)).unwrap();
        state.end_turn().unwrap();
        assert_eq!(state.turn_number(), 2);
        assert_eq!(state.phase(), GamePhase::RioterTurn);
        assert_eq!(state.unit(officer).unwrap().ap(), 2);
    }

    #[test]
    fn test_hazard_tick_at_end_turn() {
        let (mut state, brawler, officer) = duel();
        state.map.set_kind(Position::new(5, 6), TileKind::Fire).unwrap();
        state.map.set_kind(Position::new(11, 6), TileKind::Fire).unwrap();
        let events = state.end_turn().unwrap();
        assert!(events.contains(&TacticsEvent::HazardDamage {
            unit_id: brawler,
            amount: 25,
        }));
        assert!(events.contains(&TacticsEvent::HazardDamage {
            unit_id: officer,
            amount: 25,
        }));
        assert_eq!(state.unit(brawler).unwrap().hp(), 95);
    }

    #[test]
    fn test_hazard_kill_ends_game_without_handover() {
        let (mut state, _, officer) = duel();
        state.units.get_mut(officer).unwrap().take_damage(90);
        state.map.set_kind(Position::new(11, 6), TileKind::Fire).unwrap();

        let events = state.end_turn().unwrap();
        assert_eq!(
            events.last(),
            Some(&TacticsEvent::GameOver {
                result: GameResult::Victory
            })
        );
        assert_eq!(state.phase(), GamePhase::GameOver(GameResult::Victory));
        assert_eq!(state.current_faction(), Faction::Rioter);
        assert!(!events
            .iter()
            .any(|e| matches!(e, TacticsEvent::TurnEnded { .. })));
    }

    #[test]
    fn test_mutual_wipe_is_defeat() {
        let (mut state, brawler, officer) = duel();
        state.units.get_mut(brawler).unwrap().take_damage(110);
        state.units.get_mut(officer).unwrap().take_damage(90);
        state.map.set_kind(Position::new(5, 6), TileKind::Fire).unwrap();
        state.map.set_kind(Position::new(11, 6), TileKind::Fire).unwrap();

        state.end_turn().unwrap();
        assert_eq!(state.phase(), GamePhase::GameOver(GameResult::Defeat));
        assert!(state.list_units(None).is_empty());
    }

    #[test]
    fn test_game_over_rejects_everything() {
        let (mut state, brawler, officer) = duel();
        state.units.get_mut(officer).unwrap().take_damage(99);
        state.move_unit(brawler, Position::new(9, 6)).unwrap();
        state.move_unit(brawler, Position::new(10, 6)).unwrap();
        state.end_turn().unwrap();
        state.end_turn().unwrap();

        let events = state.attack(brawler, Position::new(11, 6)).unwrap();
        assert!(events.contains(&TacticsEvent::UnitEliminated { unit_id: officer }));
        assert_eq!(state.phase(), GamePhase::GameOver(GameResult::Victory));

        let logged = state.events().len();
        for err in [
            state.move_unit(brawler, Position::new(9, 6)).unwrap_err(),
            state.attack(brawler, Position::new(9, 6)).unwrap_err(),
            state.end_turn().unwrap_err(),
        ] {
            assert_eq!(err.illegal_reason(), Some(IllegalAction::GameOver));
        }
        assert_eq!(state.events().len(), logged);
        assert_eq!(state.unit(brawler).unwrap().position(), Position::new(10, 6));
    }

    #[test]
    fn test_targeting_flow() {
        let mut state = SimulationState::with_seed(manual_config(), 9).unwrap();
        let molotov = state
            .spawn_unit(Archetype::Molotov, Position::new(5, 6), Faction::Rioter)
            .unwrap();
        state
            .spawn_unit(Archetype::Officer, Position::new(15, 12), Faction::Police)
            .unwrap();

        let err = state.confirm_target(Position::new(6, 6)).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::NoTargetingMode));

        state
            .begin_targeting(molotov, TargetingMode::Ability(AbilityKind::Molotov))
            .unwrap();
        let err = state.confirm_target(Position::new(12, 6)).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::OutOfRange));
        assert!(state.targeting().is_some());

        state.confirm_target(Position::new(7, 6)).unwrap();
        assert!(state.targeting().is_none());
        assert_eq!(state.map().kind_at(Position::new(7, 6)), Some(TileKind::Fire));

        state.begin_targeting(molotov, TargetingMode::Attack).unwrap();
        state.end_turn().unwrap();
        assert!(state.targeting().is_none());
    }

    #[test]
    fn test_begin_targeting_checks_ability() {
        let (mut state, brawler, _) = duel();
        let err = state
            .begin_targeting(brawler, TargetingMode::Ability(AbilityKind::Molotov))
            .unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::AbilityUnavailable));
        assert!(state.targeting().is_none());
    }

    #[test]
    fn test_ai_acts_once_per_phase() {
        let (mut state, _, officer) = duel();
        state.end_turn().unwrap();

        let step = state.ai_decide_and_apply(officer).unwrap();
        assert!(matches!(step.action, PlannedAction::TacticalMove { .. }));
        let err = state.ai_decide_and_apply(officer).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::AlreadyActed));
    }

    #[test]
    fn test_auto_ai_phase_runs_on_handover() {
        let mut state = SimulationState::with_seed(RulesConfig::default(), 3).unwrap();
        state
            .spawn_unit(Archetype::Brawler, Position::new(5, 6), Faction::Rioter)
            .unwrap();
        let officer = state
            .spawn_unit(Archetype::Officer, Position::new(11, 6), Faction::Police)
            .unwrap();

        let events = state.end_turn().unwrap();
        assert!(state.has_ai_acted(officer));
        assert!(events
            .iter()
            .any(|e| matches!(e, TacticsEvent::UnitMoved { unit_id, .. } if *unit_id == officer)));
        assert_eq!(state.phase(), GamePhase::PoliceTurn);
    }

    #[test]
    fn test_drain_events() {
        let (mut state, brawler, _) = duel();
        assert_eq!(state.drain_events().len(), 2);
        state.move_unit(brawler, Position::new(6, 6)).unwrap();
        let fresh = state.drain_events();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].seq, 2);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_helper_queries() {
        let (state, brawler, officer) = duel();
        assert!(state.valid_attack_positions(brawler).is_empty());
        assert!(state.reachable_positions(brawler).contains(&Position::new(9, 6)));
        assert!(!state.reachable_positions(brawler).contains(&Position::new(10, 6)));
        assert!(state.molotov_positions(brawler).is_empty());
        assert_eq!(state.unit_at(Position::new(11, 6)).unwrap().id(), officer);
        assert_eq!(state.list_units(Some(Faction::Police)).len(), 1);
        assert_eq!(state.list_units(None).len(), 2);
    }
}
