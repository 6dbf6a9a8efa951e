//! Tactics constants - fixed rule values that are not tunable per scenario
//!
//! Tunable numbers (damage, radii, variance) live in `RulesConfig`.

// Action points
pub const MAX_AP: u32 = 2;
pub const MOVE_AP_COST: u32 = 1;
pub const ATTACK_AP_COST: u32 = 1;
pub const ABILITY_AP_COST: u32 = 1;

// Cover fractions (damage reduction)
pub const FULL_COVER_FRACTION: f64 = 0.5;
pub const HALF_COVER_FRACTION: f64 = 0.25;

// Area abilities use a 3x3 block
pub const AREA_RADIUS: i32 = 1;

// The AI treats a target as wounded strictly below this share of max HP
pub const WOUNDED_HP_FRACTION: f64 = 0.5;
