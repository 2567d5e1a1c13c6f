//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - dt clamped and sub-stepped the same way on every driver
//! - Seeded RNG only, and only at the command boundary (planet placement)
//! - Stable iteration order (planets in placement order)
//! - No rendering or platform dependencies

pub mod controller;
pub mod engine;
pub mod level;
pub mod world;

pub use controller::{RunController, RunPhase};
pub use engine::{Puck, SimEvent, Simulation};
pub use level::{Goal, Level, LevelError, Note, Planet, PlanetSet};
pub use world::{OptionsPatch, WorldConfig};
