//! Typed event stream emitted by the simulation
//!
//! Events are the only channel through which presentation layers observe
//! changes. They are appended only after an action has fully applied.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{EventSeq, TurnNumber, UnitId};
use crate::tactics::archetype::{AbilityKind, Archetype, Faction};
use crate::tactics::position::Position;

/// Terminal result, from the Rioters' point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Victory, // No Police left
    Defeat,  // No Rioters left
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Victory => write!(f, "Victory"),
            GameResult::Defeat => write!(f, "Defeat"),
        }
    }
}

/// A fact emitted by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TacticsEvent {
    UnitSpawned {
        unit_id: UnitId,
        archetype: Archetype,
        faction: Faction,
        position: Position,
    },
    UnitMoved {
        unit_id: UnitId,
        from: Position,
        to: Position,
    },
    AttackMissed {
        attacker_id: UnitId,
        target: Position,
    },
    DamageDealt {
        attacker_id: UnitId,
        target_id: UnitId,
        amount: u32,
        cover_fraction: f64,
    },
    AbilityUsed {
        unit_id: UnitId,
        kind: AbilityKind,
        affected_positions: Vec<Position>,
    },
    UnitHealed {
        unit_id: UnitId,
        healer_id: UnitId,
        amount: u32,
    },
    UnitInspired {
        unit_id: UnitId,
        source_id: UnitId,
        ap_gained: u32,
    },
    UnitEliminated {
        unit_id: UnitId,
    },
    HazardDamage {
        unit_id: UnitId,
        amount: u32,
    },
    TurnEnded {
        faction: Faction,
        new_turn_number: TurnNumber,
    },
    GameOver {
        result: GameResult,
    },
}

impl TacticsEvent {
    /// Render a combat-log line, naming units through `name_of`
    pub fn describe(&self, name_of: &dyn Fn(UnitId) -> String) -> String {
        match self {
            TacticsEvent::UnitSpawned {
                unit_id, position, ..
            } => format!("{} takes position at {}", name_of(*unit_id), position),
            TacticsEvent::UnitMoved { unit_id, from, to } => {
                format!("{} moves from {} to {}", name_of(*unit_id), from, to)
            }
            TacticsEvent::AttackMissed {
                attacker_id,
                target,
            } => format!("{} attacks {} but hits nothing", name_of(*attacker_id), target),
            TacticsEvent::DamageDealt {
                attacker_id,
                target_id,
                amount,
                cover_fraction,
            } => {
                let cover_text = if *cover_fraction > 0.0 {
                    format!(" (through {}% cover)", (cover_fraction * 100.0) as u32)
                } else {
                    String::new()
                };
                format!(
                    "{} deals {} damage to {}{}",
                    name_of(*attacker_id),
                    amount,
                    name_of(*target_id),
                    cover_text
                )
            }
            TacticsEvent::AbilityUsed {
                unit_id,
                kind,
                affected_positions,
            } => format!(
                "{} uses {} ({} tiles affected)",
                name_of(*unit_id),
                kind,
                affected_positions.len()
            ),
            TacticsEvent::UnitHealed {
                unit_id,
                healer_id,
                amount,
            } => format!(
                "{} heals {} for {} HP",
                name_of(*healer_id),
                name_of(*unit_id),
                amount
            ),
            TacticsEvent::UnitInspired {
                unit_id,
                source_id,
                ap_gained,
            } => format!(
                "{} inspires {} (+{} AP)",
                name_of(*source_id),
                name_of(*unit_id),
                ap_gained
            ),
            TacticsEvent::UnitEliminated { unit_id } => {
                format!("{} is eliminated!", name_of(*unit_id))
            }
            TacticsEvent::HazardDamage { unit_id, amount } => {
                format!("{} burns for {} damage", name_of(*unit_id), amount)
            }
            TacticsEvent::TurnEnded {
                faction,
                new_turn_number,
            } => format!("{} end their turn (turn {})", faction, new_turn_number),
            TacticsEvent::GameOver { result } => format!("Game over: {}", result),
        }
    }
}

impl fmt::Display for TacticsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(&|id| format!("unit {}", id)))
    }
}

/// An event stamped with its position in the stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub seq: EventSeq,
    pub turn: TurnNumber,
    pub event: TacticsEvent,
}

/// Append-only event log with a consumer cursor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
    drained: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, turn: TurnNumber, events: &[TacticsEvent]) {
        for event in events {
            let seq = self.entries.len() as EventSeq;
            self.entries.push(LoggedEvent {
                seq,
                turn,
                event: event.clone(),
            });
        }
    }

    /// Every event since the simulation began
    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    /// Events not yet handed to a consumer; advances the cursor
    pub fn drain(&mut self) -> Vec<LoggedEvent> {
        let fresh = self.entries[self.drained..].to_vec();
        self.drained = self.entries.len();
        fresh
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render log lines with archetype names learned from spawn events
///
/// Units are gone from the registry once eliminated, so names come from
/// the log itself.
pub fn combat_log_lines(entries: &[LoggedEvent]) -> Vec<String> {
    let mut names: AHashMap<UnitId, &'static str> = AHashMap::new();
    let mut lines = Vec::with_capacity(entries.len());

    for entry in entries {
        if let TacticsEvent::UnitSpawned {
            unit_id, archetype, ..
        } = &entry.event
        {
            names.insert(*unit_id, archetype.name());
        }
        let name_of = |id: UnitId| match names.get(&id) {
            Some(name) => name.to_string(),
            None => format!("unit {}", id),
        };
        lines.push(entry.event.describe(&name_of));
    }
    lines
}
