//! Tactics system - turn-based squad combat on a street grid
//!
//! Rioters versus riot police, one faction acting per phase.
//!
//! Key rules:
//! - Every action costs action points (AP); two per unit per turn
//! - Cover reduces damage, walls block line of sight
//! - Fire tiles burn anyone still standing in them when a turn ends
//! - The simulation is fully deterministic given its seed

pub mod ai;
pub mod archetype;
pub mod commands;
pub mod constants;
pub mod events;
pub mod execution;
pub mod grid_map;
pub mod position;
pub mod resolution;
pub mod scenario;
pub mod terrain;
pub mod units;

// Re-exports for convenient access
pub use ai::{
    load_personality, AiPersonality, AiStep, DecisionContext, HeuristicPlanner, PlannedAction,
    TacticalAi,
};
pub use archetype::{AbilityKind, Archetype, ArchetypeStats, Faction};
pub use commands::{replay, Command, TargetingMode};
pub use constants::*;
pub use events::{combat_log_lines, EventLog, GameResult, LoggedEvent, TacticsEvent};
pub use execution::{GamePhase, SimulationState};
pub use grid_map::{CoverPlacement, GridMap, Tile, STREET_COVER};
pub use position::Position;
pub use resolution::{compute_damage, resolve_ability, resolve_attack, resolve_move};
pub use scenario::{load_scenario, Scenario, UnitPlacement};
pub use terrain::TileKind;
pub use units::{Unit, UnitRegistry};
