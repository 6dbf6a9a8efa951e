//! Barricade - turn-based squad tactics rules engine
//!
//! Rioters versus riot police on a fixed street grid. The crate holds only the
//! simulation core; rendering, audio and input belong to whoever drives it.

pub mod core;
pub mod tactics;
