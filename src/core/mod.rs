//! Core infrastructure shared by the simulation and its drivers

pub mod config;
pub mod error;
pub mod types;
