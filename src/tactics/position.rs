//! Grid coordinates for the street map
//!
//! Square lattice, x to the east and y to the south. North is (0, -1).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Orthogonal directions in scan order: North, East, South, West
pub const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance
    pub fn distance(&self, other: &Self) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours, North first then clockwise
    pub fn neighbors4(&self) -> [Position; 4] {
        ORTHOGONAL.map(|(dx, dy)| self.offset(dx, dy))
    }

    /// The eight surrounding cells, dx outer loop and dy inner, both ascending
    pub fn neighbors8(&self) -> Vec<Position> {
        let mut results = Vec::with_capacity(8);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                results.push(self.offset(dx, dy));
            }
        }
        results
    }

    /// Square block centred on self (3x3 for radius 1), row-major from the top-left
    pub fn area(&self, radius: i32) -> Vec<Position> {
        let mut results = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                results.push(self.offset(dx, dy));
            }
        }
        results
    }

    /// Every cell within Manhattan `range`, dx outer loop then dy, both ascending
    ///
    /// Includes self. No bounds filtering.
    pub fn within_range(&self, range: u32) -> Vec<Position> {
        let r = range as i32;
        let mut results = Vec::new();
        for dx in -r..=r {
            for dy in -r..=r {
                if dx.abs() + dy.abs() > r {
                    continue;
                }
                results.push(self.offset(dx, dy));
            }
        }
        results
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
