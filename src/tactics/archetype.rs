//! Factions, unit archetypes and their static stat table
//!
//! Stats are immutable and looked up by archetype tag; nothing about an
//! archetype is stored per unit except the tag itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two sides of the street fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Rioter,
    Police,
}

impl Faction {
    pub fn opponent(&self) -> Self {
        match self {
            Faction::Rioter => Faction::Police,
            Faction::Police => Faction::Rioter,
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Rioter => write!(f, "Rioters"),
            Faction::Police => write!(f, "Police"),
        }
    }
}

/// Special abilities, one per rioter archetype at most
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    Molotov,     // 3x3 fire at a target cell in range
    Smoke,       // 3x3 smoke around the caster
    DeployCover, // Half cover on first free orthogonal neighbour
    Heal,        // Restore HP to nearby allies
    Inspire,     // Grant AP to nearby allies
}

impl AbilityKind {
    /// Does this ability need a target cell?
    pub fn is_targeted(&self) -> bool {
        matches!(self, AbilityKind::Molotov)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AbilityKind::Molotov => "Fire Area",
            AbilityKind::Smoke => "Smoke",
            AbilityKind::DeployCover => "Deploy Cover",
            AbilityKind::Heal => "Heal",
            AbilityKind::Inspire => "Inspire",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    // Rioters
    Brawler,
    Molotov,
    Leader,
    Medic,
    Hacker,
    RioterShield,

    // Police
    Officer,
    PoliceShield,
    Sniper,
    Teargas,
    Drone,
}

/// Fixed stat profile for an archetype
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeStats {
    pub name: &'static str,
    pub faction: Faction,
    pub max_hp: u32,
    pub damage: u32,
    pub range: u32,
    pub move_range: u32,
    pub ability: Option<AbilityKind>,
    pub help: &'static str,
}

#[allow(clippy::too_many_arguments)]
const fn stats(
    name: &'static str,
    faction: Faction,
    max_hp: u32,
    damage: u32,
    range: u32,
    move_range: u32,
    ability: Option<AbilityKind>,
    help: &'static str,
) -> ArchetypeStats {
    ArchetypeStats {
        name,
        faction,
        max_hp,
        damage,
        range,
        move_range,
        ability,
        help,
    }
}

/// Indexed by `Archetype as usize`; order must follow the enum declaration.
static STATS: [ArchetypeStats; 11] = [
    stats("Brawler", Faction::Rioter, 120, 45, 1, 4, None, "Charge: High damage melee fighter"),
    stats("Molotov", Faction::Rioter, 80, 60, 4, 3, Some(AbilityKind::Molotov), "Q: Create fire area (3x3)"),
    stats("Leader", Faction::Rioter, 100, 35, 3, 3, Some(AbilityKind::Inspire), "Q: Inspire nearby allies (+1 AP)"),
    stats("Medic", Faction::Rioter, 70, 25, 2, 3, Some(AbilityKind::Heal), "Q: Heal nearby allies (+30 HP)"),
    stats("Hacker", Faction::Rioter, 75, 30, 2, 3, Some(AbilityKind::Smoke), "Q: Create smoke for concealment"),
    stats("Shield", Faction::Rioter, 130, 40, 1, 3, Some(AbilityKind::DeployCover), "Q: Deploy temporary cover"),
    stats("Officer", Faction::Police, 100, 50, 4, 3, None, "No special ability"),
    stats("Shield Police", Faction::Police, 140, 35, 1, 3, None, "No special ability"),
    stats("Sniper", Faction::Police, 80, 80, 8, 3, None, "No special ability"),
    stats("Teargas", Faction::Police, 90, 40, 5, 3, None, "No special ability"),
    stats("Drone Op", Faction::Police, 60, 25, 3, 3, None, "No special ability"),
];

impl Archetype {
    pub const ALL: [Archetype; 11] = [
        Archetype::Brawler,
        Archetype::Molotov,
        Archetype::Leader,
        Archetype::Medic,
        Archetype::Hacker,
        Archetype::RioterShield,
        Archetype::Officer,
        Archetype::PoliceShield,
        Archetype::Sniper,
        Archetype::Teargas,
        Archetype::Drone,
    ];

    pub fn stats(&self) -> &'static ArchetypeStats {
        &STATS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.stats().name
    }

    /// Faction this archetype is normally fielded by
    pub fn home_faction(&self) -> Faction {
        self.stats().faction
    }

    pub fn ability(&self) -> Option<AbilityKind> {
        self.stats().ability
    }

    pub fn help_text(&self) -> &'static str {
        self.stats().help
    }

    /// Parse a console name like "molotov" or "shield-police"
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "brawler" => Some(Archetype::Brawler),
            "molotov" => Some(Archetype::Molotov),
            "leader" => Some(Archetype::Leader),
            "medic" => Some(Archetype::Medic),
            "hacker" => Some(Archetype::Hacker),
            "shield" | "riotershield" => Some(Archetype::RioterShield),
            "officer" => Some(Archetype::Officer),
            "shieldpolice" | "policeshield" => Some(Archetype::PoliceShield),
            "sniper" => Some(Archetype::Sniper),
            "teargas" => Some(Archetype::Teargas),
            "drone" | "droneop" => Some(Archetype::Drone),
            _ => None,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
