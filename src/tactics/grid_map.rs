//! Street grid: tile lattice plus unit occupancy
//!
//! GridMap is the only code that writes a tile's occupant. Every placement,
//! move and removal goes through it so the tile -> unit and unit -> tile
//! links always agree.

use crate::core::error::{IllegalAction, TacticsError, TacticsResult};
use crate::core::types::UnitId;
use crate::tactics::position::Position;
use crate::tactics::terrain::TileKind;
use crate::tactics::units::{Unit, UnitRegistry};

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tile {
    kind: TileKind,
    occupant: Option<UnitId>,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            occupant: None,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn cover_fraction(&self) -> f64 {
        self.kind.cover_fraction()
    }
}

/// A named cover object on the street map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPlacement {
    pub name: &'static str,
    pub position: Position,
    pub kind: TileKind,
}

const fn cover(name: &'static str, x: i32, y: i32, kind: TileKind) -> CoverPlacement {
    CoverPlacement {
        name,
        position: Position { x, y },
        kind,
    }
}

/// Fixed cover layout of the street map
pub static STREET_COVER: [CoverPlacement; 10] = [
    cover("Barricade", 3, 3, TileKind::FullCover),
    cover("Café table", 7, 5, TileKind::HalfCover),
    cover("Overturned car", 12, 8, TileKind::FullCover),
    cover("Bus stop", 15, 4, TileKind::HalfCover),
    cover("Metro entrance", 5, 10, TileKind::FullCover),
    cover("Fountain", 10, 12, TileKind::HalfCover),
    cover("Lamppost", 8, 8, TileKind::HalfCover),
    cover("Café chairs", 6, 7, TileKind::HalfCover),
    cover("Police barrier", 14, 6, TileKind::FullCover),
    cover("Newspaper stand", 9, 4, TileKind::HalfCover),
];

/// Rectangular tile grid, row-major
#[derive(Debug, Clone)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl GridMap {
    /// Open ground enclosed by a ring of walls
    pub fn new(width: i32, height: i32) -> Self {
        let mut tiles = vec![Tile::default(); (width.max(0) * height.max(0)) as usize];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    tiles[(y * width + x) as usize] = Tile::new(TileKind::Wall);
                }
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// The street map: walled border plus the fixed cover layout
    ///
    /// Cover that falls outside a smaller grid is skipped.
    pub fn street(width: i32, height: i32) -> Self {
        let mut map = Self::new(width, height);
        for placement in STREET_COVER.iter() {
            if let Some(tile) = map.tile_mut(placement.position) {
                tile.kind = placement.kind;
            }
        }
        map
    }

    /// Bounds check
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.is_valid(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.tile_at(pos).map(|t| t.kind)
    }

    /// Cover fraction at a position (0.0 outside the grid)
    pub fn cover_at(&self, pos: Position) -> f64 {
        self.tile_at(pos).map(|t| t.cover_fraction()).unwrap_or(0.0)
    }

    pub fn occupant(&self, pos: Position) -> Option<UnitId> {
        self.tile_at(pos).and_then(|t| t.occupant)
    }

    /// Valid, passable and unoccupied
    pub fn can_enter(&self, pos: Position) -> bool {
        self.tile_at(pos)
            .map(|t| t.kind.is_passable() && t.occupant.is_none())
            .unwrap_or(false)
    }

    fn check_enterable(&self, pos: Position) -> TacticsResult<()> {
        if !self.is_valid(pos) {
            return Err(TacticsError::InvalidPosition(pos));
        }
        if !self.can_enter(pos) {
            return Err(IllegalAction::NotEnterable.into());
        }
        Ok(())
    }

    /// Link a freshly spawned unit to the tile at its position
    pub fn place_unit(&mut self, unit: &Unit) -> TacticsResult<()> {
        self.check_enterable(unit.position())?;
        if let Some(tile) = self.tile_mut(unit.position()) {
            tile.occupant = Some(unit.id());
        }
        Ok(())
    }

    /// Relocate a unit, clearing the old tile and linking the new one
    pub fn move_unit(&mut self, unit: &mut Unit, to: Position) -> TacticsResult<()> {
        self.check_enterable(to)?;
        self.check_link(unit)?;

        if let Some(tile) = self.tile_mut(unit.position()) {
            tile.occupant = None;
        }
        if let Some(tile) = self.tile_mut(to) {
            tile.occupant = Some(unit.id());
        }
        unit.position = to;
        Ok(())
    }

    /// Clear the tile link of a unit leaving the board
    pub fn remove_unit(&mut self, unit: &Unit) -> TacticsResult<()> {
        self.check_link(unit)?;
        if let Some(tile) = self.tile_mut(unit.position()) {
            tile.occupant = None;
        }
        Ok(())
    }

    fn check_link(&self, unit: &Unit) -> TacticsResult<()> {
        let linked = self.occupant(unit.position());
        if linked != Some(unit.id()) {
            debug_assert!(
                false,
                "tile {} holds {:?}, expected unit {}",
                unit.position(),
                linked,
                unit.id()
            );
            return Err(TacticsError::InconsistentState(format!(
                "tile {} holds {:?}, expected unit {}",
                unit.position(),
                linked,
                unit.id()
            )));
        }
        Ok(())
    }

    /// Change a tile's kind; occupancy is untouched
    pub fn set_kind(&mut self, pos: Position, kind: TileKind) -> TacticsResult<()> {
        let tile = self
            .tile_mut(pos)
            .ok_or(TacticsError::InvalidPosition(pos))?;
        tile.kind = kind;
        Ok(())
    }

    /// Coarse step-sampled sight line
    ///
    /// Samples floor(from + i * delta / steps) for i in 1..steps, where steps
    /// is the larger axis delta. Any in-bounds Wall sample blocks. Looking
    /// at one's own cell is never a valid sight line.
    pub fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0 && dy == 0 {
            return false;
        }

        let steps = dx.abs().max(dy.abs());
        for i in 1..steps {
            let sample = Position::new(
                from.x + (i * dx).div_euclid(steps),
                from.y + (i * dy).div_euclid(steps),
            );
            if self.kind_at(sample).is_some_and(|k| k.blocks_los()) {
                return false;
            }
        }
        true
    }

    /// Check both directions of the tile <-> unit link
    pub fn verify_occupancy(&self, units: &UnitRegistry) -> TacticsResult<()> {
        for unit in units.iter() {
            if !unit.is_alive() {
                return Err(TacticsError::InconsistentState(format!(
                    "dead unit {} still registered",
                    unit.id()
                )));
            }
            if self.occupant(unit.position()) != Some(unit.id()) {
                return Err(TacticsError::InconsistentState(format!(
                    "unit {} at {} is not linked from its tile",
                    unit.id(),
                    unit.position()
                )));
            }
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                if let Some(id) = self.occupant(pos) {
                    match units.get(id) {
                        Some(unit) if unit.position() == pos => {}
                        _ => {
                            return Err(TacticsError::InconsistentState(format!(
                                "tile {} links unit {} which is not there",
                                pos, id
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Iterate all positions with their tiles, row by row
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (Position::new(i as i32 % width, i as i32 / width), t))
    }

    pub fn count_kind(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }
}
