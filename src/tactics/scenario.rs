//! Scenario descriptions - which units start where
//!
//! Scenarios are plain serde data so they can live in `data/scenarios/`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::TacticsResult;
use crate::tactics::archetype::{Archetype, Faction};
use crate::tactics::position::Position;

/// One unit to spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPlacement {
    pub archetype: Archetype,
    /// Defaults to the archetype's home faction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<Faction>,
    pub position: Position,
}

impl UnitPlacement {
    pub fn new(archetype: Archetype, x: i32, y: i32) -> Self {
        Self {
            archetype,
            faction: None,
            position: Position::new(x, y),
        }
    }

    pub fn faction(&self) -> Faction {
        self.faction.unwrap_or_else(|| self.archetype.home_faction())
    }
}

/// Named starting layout, spawned in listed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub units: Vec<UnitPlacement>,
}

impl Scenario {
    /// Five rioters in the north-west against five police in the south-east
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            units: vec![
                UnitPlacement::new(Archetype::Brawler, 2, 2),
                UnitPlacement::new(Archetype::Molotov, 2, 4),
                UnitPlacement::new(Archetype::Leader, 4, 2),
                UnitPlacement::new(Archetype::Medic, 4, 4),
                UnitPlacement::new(Archetype::Hacker, 6, 3),
                UnitPlacement::new(Archetype::Officer, 16, 10),
                UnitPlacement::new(Archetype::Officer, 16, 12),
                UnitPlacement::new(Archetype::PoliceShield, 14, 11),
                UnitPlacement::new(Archetype::Sniper, 18, 11),
                UnitPlacement::new(Archetype::Teargas, 17, 9),
            ],
        }
    }

    pub fn from_toml_str(contents: &str) -> TacticsResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> TacticsResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

/// Load scenario from `data/scenarios/{name}.toml`
pub fn load_scenario(name: &str) -> TacticsResult<Scenario> {
    Scenario::load(PathBuf::from("data/scenarios").join(format!("{}.toml", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_counts() {
        let scenario = Scenario::standard();
        let rioters = scenario
            .units
            .iter()
            .filter(|p| p.faction() == Faction::Rioter)
            .count();
        assert_eq!(rioters, 5);
        assert_eq!(scenario.units.len(), 10);
    }

    #[test]
    fn test_standard_file_matches_builtin() {
        let loaded = load_scenario("standard").expect("Should load standard scenario");
        assert_eq!(loaded, Scenario::standard());
    }

    #[test]
    fn test_faction_override() {
        let scenario = Scenario::from_toml_str(
            r#"
name = "mirror"

[[units]]
archetype = "Officer"
faction = "Rioter"
position = { x = 3, y = 5 }
"#,
        )
        .unwrap();
        assert_eq!(scenario.units[0].faction(), Faction::Rioter);
        assert_eq!(scenario.units[0].position, Position::new(3, 5));
    }
}
