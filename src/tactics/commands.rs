//! Replayable command surface
//!
//! Every driver request is a serializable `Command`. Applying the same
//! commands to the same scenario and seed rebuilds the same state and event
//! log.

use serde::{Deserialize, Serialize};

use crate::core::config::RulesConfig;
use crate::core::error::TacticsResult;
use crate::core::types::UnitId;
use crate::tactics::archetype::AbilityKind;
use crate::tactics::events::TacticsEvent;
use crate::tactics::execution::SimulationState;
use crate::tactics::position::Position;
use crate::tactics::scenario::Scenario;

/// What a pending target selection will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingMode {
    Attack,
    Ability(AbilityKind),
}

/// A single driver request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Move {
        unit_id: UnitId,
        to: Position,
    },
    Attack {
        unit_id: UnitId,
        target: Position,
    },
    CastAbility {
        unit_id: UnitId,
        kind: AbilityKind,
        target: Option<Position>,
    },
    EndTurn,
    AiDecideAndApply {
        unit_id: UnitId,
    },
    BeginTargeting {
        unit_id: UnitId,
        mode: TargetingMode,
    },
    ConfirmTarget {
        target: Position,
    },
    CancelTargeting,
}

impl SimulationState {
    /// Dispatch a command, recording it in the history if accepted
    pub fn apply(&mut self, command: Command) -> TacticsResult<Vec<TacticsEvent>> {
        let events = match &command {
            Command::Move { unit_id, to } => self.move_unit(*unit_id, *to)?,
            Command::Attack { unit_id, target } => self.attack(*unit_id, *target)?,
            Command::CastAbility {
                unit_id,
                kind,
                target,
            } => self.cast_ability(*unit_id, *kind, *target)?,
            Command::EndTurn => self.end_turn()?,
            Command::AiDecideAndApply { unit_id } => self.ai_decide_and_apply(*unit_id)?.events,
            Command::BeginTargeting { unit_id, mode } => {
                self.begin_targeting(*unit_id, *mode)?;
                Vec::new()
            }
            Command::ConfirmTarget { target } => self.confirm_target(*target)?,
            Command::CancelTargeting => {
                self.cancel_targeting();
                Vec::new()
            }
        };
        self.history.push(command);
        Ok(events)
    }
}

/// Rebuild a simulation by applying `commands` to a fresh scenario
///
/// Fails on the first rejected command, since a recorded history only holds
/// accepted ones.
pub fn replay(
    scenario: &Scenario,
    config: RulesConfig,
    seed: u64,
    commands: &[Command],
) -> TacticsResult<SimulationState> {
    let mut state = SimulationState::from_scenario(scenario, config, seed)?;
    for command in commands {
        state.apply(command.clone())?;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::IllegalAction;

    #[test]
    fn test_apply_records_only_accepted() {
        let mut state =
            SimulationState::from_scenario(&Scenario::standard(), RulesConfig::default(), 1).unwrap();
        state
            .apply(Command::Move {
                unit_id: UnitId(1),
                to: Position::new(2, 3),
            })
            .unwrap();
        let err = state
            .apply(Command::Move {
                unit_id: UnitId(6),
                to: Position::new(15, 10),
            })
            .unwrap_err();
        assert_eq!(err.illegal_reason(), Some(IllegalAction::WrongFaction));
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_replay_matches_history() {
        let scenario = Scenario::standard();
        let mut state =
            SimulationState::from_scenario(&scenario, RulesConfig::default(), 42).unwrap();
        state
            .apply(Command::BeginTargeting {
                unit_id: UnitId(2),
                mode: TargetingMode::Ability(AbilityKind::Molotov),
            })
            .unwrap();
        state
            .apply(Command::ConfirmTarget {
                target: Position::new(4, 6),
            })
            .unwrap();
        state.apply(Command::EndTurn).unwrap();
        state.apply(Command::EndTurn).unwrap();

        let rebuilt = replay(&scenario, RulesConfig::default(), 42, state.history()).unwrap();
        assert_eq!(rebuilt.events(), state.events());
        assert_eq!(rebuilt.turn_number(), state.turn_number());
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_string(&Command::Move {
            unit_id: UnitId(3),
            to: Position::new(4, 5),
        })
        .unwrap();
        assert!(json.contains("\"command\":\"move\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(
            back,
            Command::Move {
                unit_id: UnitId(3),
                to: Position::new(4, 5),
            }
        );
    }
}
