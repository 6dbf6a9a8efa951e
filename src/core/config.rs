//! Rules configuration with documented defaults
//!
//! Every tunable rule number lives here. Defaults reproduce the canonical
//! street-fight rules; scenario files may override any subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{TacticsError, TacticsResult};

/// Largest accepted grid side; keeps the tile count well inside `i32`
pub const MAX_MAP_DIMENSION: i32 = 1024;

/// Tunable numbers for the tactics rules
///
/// Owned by the simulation state. There is no process-wide instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    // === MAP ===
    /// Grid width in tiles, including the wall border
    pub map_width: i32,

    /// Grid height in tiles, including the wall border
    pub map_height: i32,

    // === HAZARDS ===
    /// Flat damage taken at end of turn by any unit standing on Fire
    pub fire_hazard_damage: u32,

    /// Flat damage dealt by a Molotov to occupants of tiles it ignites
    ///
    /// Bypasses cover entirely.
    pub molotov_damage: u32,

    // === SUPPORT ABILITIES ===
    /// HP restored by Heal to each ally in radius, capped at max HP
    pub heal_amount: u32,

    /// Manhattan radius of Heal
    pub heal_radius: u32,

    /// Manhattan radius of Inspire
    pub inspire_radius: u32,

    /// AP granted by Inspire to each ally in radius, capped at max AP
    pub inspire_ap_gain: u32,

    // === DAMAGE ===
    /// Lower bound of the uniform damage multiplier
    pub variance_min: f64,

    /// Upper bound of the uniform damage multiplier
    ///
    /// Must be >= variance_min. Equal bounds make attacks deterministic.
    pub variance_max: f64,

    // === TURN FLOW ===
    /// Run the Police AI phase inside `end_turn`
    ///
    /// Drivers that pace AI actions themselves turn this off and call
    /// `ai_decide_and_apply` once per unit.
    pub auto_ai_phase: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            map_width: 20,
            map_height: 15,
            fire_hazard_damage: 25,
            molotov_damage: 20,
            heal_amount: 30,
            heal_radius: 2,
            inspire_radius: 3,
            inspire_ap_gain: 1,
            variance_min: 0.8,
            variance_max: 1.2,
            auto_ai_phase: true,
        }
    }
}

impl RulesConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> TacticsResult<()> {
        if self.map_width <= 2 || self.map_height <= 2 {
            return Err(TacticsError::Config(format!(
                "map must be larger than its wall border, got {}x{}",
                self.map_width, self.map_height
            )));
        }

        if self.map_width > MAX_MAP_DIMENSION || self.map_height > MAX_MAP_DIMENSION {
            return Err(TacticsError::Config(format!(
                "map sides are capped at {}, got {}x{}",
                MAX_MAP_DIMENSION, self.map_width, self.map_height
            )));
        }

        let finite = self.variance_min.is_finite() && self.variance_max.is_finite();
        if !finite || self.variance_min < 0.0 || self.variance_min > self.variance_max {
            return Err(TacticsError::Config(format!(
                "variance bounds must satisfy 0 <= min <= max, got {}..={}",
                self.variance_min, self.variance_max
            )));
        }

        if self.heal_radius == 0 || self.inspire_radius == 0 {
            return Err(TacticsError::Config("ability radii must be positive".into()));
        }

        Ok(())
    }

    /// Parse a (possibly partial) TOML document; missing keys take defaults
    pub fn from_toml_str(contents: &str) -> TacticsResult<Self> {
        let config: RulesConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a rules file
    pub fn load(path: impl AsRef<Path>) -> TacticsResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }
}
