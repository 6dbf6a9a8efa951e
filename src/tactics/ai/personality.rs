//! AI personality configuration loaded from TOML
//!
//! Personalities hold every weight the heuristic planner uses. The default
//! personality reproduces the canonical street-fight AI exactly.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::TacticsResult;
use crate::tactics::archetype::Archetype;

/// Base priority per target archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatWeights {
    pub molotov: i32,
    pub leader: i32,
    pub medic: i32,
    pub brawler: i32,
    pub hacker: i32,
    pub shield: i32,
    /// Any archetype not listed above
    pub other: i32,
}

impl Default for ThreatWeights {
    fn default() -> Self {
        Self {
            molotov: 100,
            leader: 80,
            medic: 70,
            brawler: 60,
            hacker: 50,
            shield: 40,
            other: 50,
        }
    }
}

impl ThreatWeights {
    pub fn weight_for(&self, archetype: Archetype) -> i32 {
        match archetype {
            Archetype::Molotov => self.molotov,
            Archetype::Leader => self.leader,
            Archetype::Medic => self.medic,
            Archetype::Brawler => self.brawler,
            Archetype::Hacker => self.hacker,
            Archetype::RioterShield => self.shield,
            _ => self.other,
        }
    }
}

/// Target selection bonuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Added when the target is below half HP
    pub wounded_bonus: i32,
    /// Proximity term is max(0, base - falloff * distance)
    pub proximity_base: i32,
    pub proximity_falloff: i32,
    /// Added when the target stands on a tile without cover
    pub exposed_bonus: i32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            wounded_bonus: 30,
            proximity_base: 50,
            proximity_falloff: 5,
            exposed_bonus: 20,
        }
    }
}

/// Move candidate scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositioningConfig {
    /// Snipers lose this per tile away from half their range
    pub sniper_distance_penalty: i32,
    /// Everyone else loses this per tile away from the target
    pub approach_penalty: i32,
    pub cover_bonus: i32,
    /// Added when the target could be attacked from the candidate
    pub in_range_bonus: i32,
    /// Lost per opposing unit within `crowding_radius`
    pub crowding_penalty: i32,
    pub crowding_radius: u32,
    /// A candidate must score above this to be taken
    pub score_floor: i32,
}

impl Default for PositioningConfig {
    fn default() -> Self {
        Self {
            sniper_distance_penalty: 5,
            approach_penalty: 3,
            cover_bonus: 20,
            in_range_bonus: 50,
            crowding_penalty: 15,
            crowding_radius: 2,
            score_floor: -1000,
        }
    }
}

/// Complete AI personality configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPersonality {
    /// Name of this personality (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub threat: ThreatWeights,
    #[serde(default)]
    pub targeting: TargetingConfig,
    #[serde(default)]
    pub positioning: PositioningConfig,
}

impl Default for AiPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            threat: ThreatWeights::default(),
            targeting: TargetingConfig::default(),
            positioning: PositioningConfig::default(),
        }
    }
}

impl AiPersonality {
    pub fn from_toml_str(contents: &str) -> TacticsResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from an explicit path; the name is taken from the file stem
    pub fn load(path: impl AsRef<Path>) -> TacticsResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut personality = Self::from_toml_str(&contents)?;
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            personality.name = stem.to_string();
        }
        Ok(personality)
    }
}

/// Load personality from TOML file
///
/// Loads from `data/ai_personalities/{name}.toml`
pub fn load_personality(name: &str) -> TacticsResult<AiPersonality> {
    AiPersonality::load(personality_path(name))
}

/// Get path to personality file
fn personality_path(name: &str) -> PathBuf {
    PathBuf::from("data/ai_personalities").join(format!("{}.toml", name))
}
