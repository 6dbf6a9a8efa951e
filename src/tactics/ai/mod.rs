//! Opponent AI for tactical decision-making
//!
//! Architecture: Trait + Data hybrid
//! - TacticalAi trait defines the interface for swappable implementations
//! - AiPersonality struct holds TOML-loaded weights
//! - DecisionContext provides a read-only view of the board

mod decision_context;
mod personality;
mod planner;
pub mod scoring;

pub use decision_context::DecisionContext;
pub use personality::{
    load_personality, AiPersonality, PositioningConfig, TargetingConfig, ThreatWeights,
};
pub use planner::HeuristicPlanner;
pub use scoring::{score_position, score_target};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::UnitId;
use crate::tactics::events::TacticsEvent;
use crate::tactics::position::Position;

/// What the AI chose for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedAction {
    Attack { target_id: UnitId, target: Position },
    TacticalMove { to: Position },
    Advance { to: Position },
    Hold,
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannedAction::Attack { target_id, target } => {
                write!(f, "attack unit {} at {}", target_id, target)
            }
            PlannedAction::TacticalMove { to } => write!(f, "take position at {}", to),
            PlannedAction::Advance { to } => write!(f, "advance to {}", to),
            PlannedAction::Hold => write!(f, "hold"),
        }
    }
}

/// One applied AI decision and what it produced
#[derive(Debug, Clone, PartialEq)]
pub struct AiStep {
    pub unit_id: UnitId,
    pub action: PlannedAction,
    pub events: Vec<TacticsEvent>,
}

/// Trait for tactical AI implementations
pub trait TacticalAi {
    /// Choose one action for one unit; never mutates anything
    fn decide(&self, unit_id: UnitId, context: &DecisionContext) -> PlannedAction;

    /// Get the personality configuration
    fn personality(&self) -> &AiPersonality;
}
