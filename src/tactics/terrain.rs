//! Tile kinds and their rule effects

use serde::{Deserialize, Serialize};

use crate::tactics::constants::{FULL_COVER_FRACTION, HALF_COVER_FRACTION};

/// What a single grid tile is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,      // Impassable, blocks line of sight
    FullCover, // Impassable, halves damage
    HalfCover, // Passable, quarter damage reduction
    Fire,      // Passable, burns at end of turn
    Smoke,     // Passable, cosmetic
}

impl TileKind {
    /// Can a unit stand here (ignoring occupancy)?
    pub fn is_passable(&self) -> bool {
        matches!(
            self,
            TileKind::Empty | TileKind::HalfCover | TileKind::Fire | TileKind::Smoke
        )
    }

    /// Damage reduction for a unit on this tile (0.0 = none)
    pub fn cover_fraction(&self) -> f64 {
        match self {
            TileKind::FullCover => FULL_COVER_FRACTION,
            TileKind::HalfCover => HALF_COVER_FRACTION,
            _ => 0.0,
        }
    }

    pub fn provides_cover(&self) -> bool {
        self.cover_fraction() > 0.0
    }

    /// Does this tile block line of sight?
    pub fn blocks_los(&self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Can a Molotov set this tile alight?
    pub fn is_flammable(&self) -> bool {
        matches!(self, TileKind::Empty | TileKind::HalfCover)
    }

    /// Map glyph for console drivers
    pub fn glyph(&self) -> char {
        match self {
            TileKind::Empty => '.',
            TileKind::Wall => '#',
            TileKind::FullCover => 'H',
            TileKind::HalfCover => 'h',
            TileKind::Fire => '^',
            TileKind::Smoke => '~',
        }
    }
}
