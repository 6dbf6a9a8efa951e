//! AI phase integration tests

use barricade::core::config::RulesConfig;
use barricade::core::error::IllegalAction;
use barricade::core::types::UnitId;
use barricade::tactics::*;

fn manual_config() -> RulesConfig {
    RulesConfig {
        auto_ai_phase: false,
        ..Default::default()
    }
}

#[test]
fn test_police_phase_runs_in_registry_order() {
    let mut state =
        SimulationState::from_scenario(&Scenario::standard(), manual_config(), 11).unwrap();
    state.end_turn().unwrap();

    let steps = state.run_ai_phase().unwrap();
    let order: Vec<UnitId> = steps.iter().map(|s| s.unit_id).collect();
    assert_eq!(
        order,
        vec![UnitId(6), UnitId(7), UnitId(8), UnitId(9), UnitId(10)]
    );
    for step in &steps {
        assert!(state.has_ai_acted(step.unit_id));
    }
    assert!(state.check_invariants().is_ok());

    // Second pass finds nobody left to act
    assert!(state.run_ai_phase().unwrap().is_empty());
}

#[test]
fn test_ai_rejects_other_faction() {
    let mut state =
        SimulationState::from_scenario(&Scenario::standard(), manual_config(), 11).unwrap();
    let err = state.ai_decide_and_apply(UnitId(6)).unwrap_err();
    assert_eq!(err.illegal_reason(), Some(IllegalAction::WrongFaction));
}

#[test]
fn test_sniper_opens_fire_when_in_reach() {
    let mut state = SimulationState::with_seed(manual_config(), 2).unwrap();
    let brawler = state
        .spawn_unit(Archetype::Brawler, Position::new(11, 11), Faction::Rioter)
        .unwrap();
    let sniper = state
        .spawn_unit(Archetype::Sniper, Position::new(18, 11), Faction::Police)
        .unwrap();
    state.end_turn().unwrap();

    let step = state.ai_decide_and_apply(sniper).unwrap();
    assert_eq!(
        step.action,
        PlannedAction::Attack {
            target_id: brawler,
            target: Position::new(11, 11),
        }
    );
    assert!(matches!(
        step.events[0],
        TacticsEvent::DamageDealt { target_id, .. } if target_id == brawler
    ));
    assert_eq!(state.unit(sniper).unwrap().ap(), 1);
}

#[test]
fn test_ai_closes_distance_over_turns() {
    let mut state = SimulationState::with_seed(RulesConfig::default(), 4).unwrap();
    let medic = state
        .spawn_unit(Archetype::Medic, Position::new(2, 2), Faction::Rioter)
        .unwrap();
    let officer = state
        .spawn_unit(Archetype::Officer, Position::new(17, 12), Faction::Police)
        .unwrap();
    let start = state.unit(officer).unwrap().position().distance(&Position::new(2, 2));

    // Each Rioter end_turn hands over to the auto AI phase
    for _ in 0..3 {
        state.end_turn().unwrap();
        state.end_turn().unwrap();
    }

    assert_eq!(state.turn_number(), 4);
    let medic_pos = state.unit(medic).unwrap().position();
    let now = state.unit(officer).unwrap().position().distance(&medic_pos);
    assert!(now < start, "officer should have advanced: {} -> {}", start, now);
}

#[test]
fn test_rioter_ai_drives_the_other_side() {
    let mut state = SimulationState::with_seed(manual_config(), 8).unwrap();
    let brawler = state
        .spawn_unit(Archetype::Brawler, Position::new(5, 6), Faction::Rioter)
        .unwrap();
    let officer = state
        .spawn_unit(Archetype::Officer, Position::new(6, 6), Faction::Police)
        .unwrap();

    let step = state.ai_decide_and_apply(brawler).unwrap();
    assert_eq!(
        step.action,
        PlannedAction::Attack {
            target_id: officer,
            target: Position::new(6, 6),
        }
    );
}

#[test]
fn test_custom_personality_changes_target() {
    let mut state = SimulationState::with_seed(manual_config(), 8).unwrap();
    let medic = state
        .spawn_unit(Archetype::Medic, Position::new(10, 3), Faction::Rioter)
        .unwrap();
    let molotov = state
        .spawn_unit(Archetype::Molotov, Position::new(10, 9), Faction::Rioter)
        .unwrap();
    let officer = state
        .spawn_unit(Archetype::Officer, Position::new(10, 6), Faction::Police)
        .unwrap();
    state.end_turn().unwrap();

    let mut personality = AiPersonality::default();
    personality.threat.medic = 200;
    state.set_personality(personality);

    let step = state.ai_decide_and_apply(officer).unwrap();
    assert_eq!(
        step.action,
        PlannedAction::Attack {
            target_id: medic,
            target: Position::new(10, 3),
        }
    );
    assert!(state.unit(molotov).is_some());
}

#[test]
fn test_full_skirmish_terminates() {
    let mut state =
        SimulationState::from_scenario(&Scenario::standard(), manual_config(), 99).unwrap();

    while !state.is_game_over() && state.turn_number() <= 60 {
        state.run_ai_phase().unwrap();
        if !state.is_game_over() {
            state.end_turn().unwrap();
        }
        state.check_invariants().unwrap();
    }
    let turn_ends = state
        .events()
        .iter()
        .filter(|e| matches!(e.event, TacticsEvent::TurnEnded { .. }))
        .count();
    assert!(turn_ends > 0);
}
