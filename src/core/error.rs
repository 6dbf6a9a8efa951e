use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::UnitId;
use crate::tactics::position::Position;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Position {0} is outside the grid")]
    InvalidPosition(Position),

    #[error("Illegal action: {0}")]
    IllegalAction(IllegalAction),

    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl From<IllegalAction> for TacticsError {
    fn from(reason: IllegalAction) -> Self {
        Self::IllegalAction(reason)
    }
}

impl TacticsError {
    /// Reason code when this is a rule rejection
    pub fn illegal_reason(&self) -> Option<IllegalAction> {
        match self {
            Self::IllegalAction(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Reason codes for rejected actions. A rejected action never mutates state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IllegalAction {
    #[error("unit {0} does not exist")]
    UnitNotFound(UnitId),
    #[error("it is not this faction's turn")]
    WrongFaction,
    #[error("the game is over")]
    GameOver,
    #[error("not enough action points")]
    InsufficientAp,
    #[error("target is out of range")]
    OutOfRange,
    #[error("destination is blocked or occupied")]
    NotEnterable,
    #[error("line of sight is blocked")]
    NoLineOfSight,
    #[error("a unit cannot target itself")]
    SelfTarget,
    #[error("target tile holds a friendly unit")]
    FriendlyFire,
    #[error("unit does not have this ability")]
    AbilityUnavailable,
    #[error("ability requires a target position")]
    MissingTarget,
    #[error("ability does not take a target")]
    AbilityNotTargeted,
    #[error("unit already acted this phase")]
    AlreadyActed,
    #[error("no targeting mode is active")]
    NoTargetingMode,
}

pub type TacticsResult<T> = std::result::Result<T, TacticsError>;
