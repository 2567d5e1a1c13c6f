//! Level data: ordered note waypoints, goal region, and placed planets

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::dist_sq;

/// An ordered checkpoint. Notes must be touched strictly in sequence; the
/// label and frequency are carried for consumers (audio, HUD) and ignored
/// by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pos: Vec2,
    pub radius: f32,
    pub label: char,
    pub freq: f32,
}

impl Note {
    pub fn new(pos: Vec2, label: char, freq: f32) -> Self {
        Self {
            pos,
            radius: NOTE_RADIUS,
            label,
            freq,
        }
    }
}

/// Terminal success region, live only once every note is captured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub pos: Vec2,
    pub radius: f32,
}

impl Goal {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: GOAL_RADIUS,
        }
    }
}

/// Level construction failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// A level without notes would make the goal live immediately
    NoNotes,
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::NoNotes => write!(f, "level has no notes"),
        }
    }
}

impl std::error::Error for LevelError {}

/// Ordered note sequence plus a goal region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    notes: Vec<Note>,
    pub goal: Goal,
}

impl Level {
    /// Build a level, rejecting an empty note sequence
    pub fn new(name: impl Into<String>, notes: Vec<Note>, goal: Goal) -> Result<Self, LevelError> {
        if notes.is_empty() {
            return Err(LevelError::NoNotes);
        }
        Ok(Self {
            name: name.into(),
            notes,
            goal,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }
}

/// A gravitating obstacle at a fixed position. Radius follows from mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub pos: Vec2,
    pub mass: f32,
    pub radius: f32,
}

impl Planet {
    pub fn new(pos: Vec2, mass: f32) -> Self {
        Self {
            pos,
            mass,
            radius: PLANET_BASE_RADIUS + mass * PLANET_RADIUS_PER_MASS,
        }
    }

    /// Place a planet with a uniformly rolled mass
    pub fn place<R: Rng>(pos: Vec2, rng: &mut R) -> Self {
        let mass = rng.random_range(PLANET_MASS_MIN..PLANET_MASS_MAX);
        Self::new(pos, mass)
    }
}

/// The player's placed planets, capped at [`MAX_PLANETS`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetSet {
    planets: Vec<Planet>,
}

impl PlanetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Planet] {
        &self.planets
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Add a planet; returns false when the cap is reached
    pub fn push(&mut self, planet: Planet) -> bool {
        if self.planets.len() >= MAX_PLANETS {
            return false;
        }
        self.planets.push(planet);
        true
    }

    /// Remove the planet nearest to `point` (right-click removal)
    pub fn remove_nearest(&mut self, point: Vec2) -> Option<Planet> {
        let idx = self
            .planets
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                dist_sq(a.pos, point)
                    .partial_cmp(&dist_sq(b.pos, point))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)?;
        Some(self.planets.remove(idx))
    }

    /// Undo: drop the most recently placed planet
    pub fn pop(&mut self) -> Option<Planet> {
        self.planets.pop()
    }

    pub fn clear(&mut self) {
        self.planets.clear();
    }

    /// Replace wholesale (worker sync); excess planets are dropped
    pub fn replace(&mut self, planets: Vec<Planet>) {
        self.planets = planets;
        self.planets.truncate(MAX_PLANETS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal() -> Goal {
        Goal::new(Vec2::new(900.0, 360.0))
    }

    #[test]
    fn test_empty_level_rejected() {
        let err = Level::new("empty", Vec::new(), goal()).unwrap_err();
        assert_eq!(err, LevelError::NoNotes);
    }

    #[test]
    fn test_planet_radius_from_mass() {
        let p = Planet::new(Vec2::ZERO, 10.0);
        assert!((p.radius - 24.0).abs() < 1e-5);
    }

    #[test]
    fn test_planet_cap() {
        let mut set = PlanetSet::new();
        for i in 0..MAX_PLANETS {
            assert!(set.push(Planet::new(Vec2::new(i as f32, 0.0), 5.0)));
        }
        assert!(!set.push(Planet::new(Vec2::ZERO, 5.0)));
        assert_eq!(set.len(), MAX_PLANETS);
    }

    #[test]
    fn test_remove_nearest() {
        let mut set = PlanetSet::new();
        set.push(Planet::new(Vec2::new(100.0, 100.0), 5.0));
        set.push(Planet::new(Vec2::new(500.0, 500.0), 5.0));
        let removed = set.remove_nearest(Vec2::new(490.0, 510.0)).unwrap();
        assert_eq!(removed.pos, Vec2::new(500.0, 500.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_replace_truncates_to_cap() {
        let mut set = PlanetSet::new();
        let many: Vec<_> = (0..10)
            .map(|i| Planet::new(Vec2::new(i as f32 * 10.0, 0.0), 5.0))
            .collect();
        set.replace(many);
        assert_eq!(set.len(), MAX_PLANETS);
    }

    #[test]
    fn test_placed_mass_in_range() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        for _ in 0..64 {
            let p = Planet::place(Vec2::ZERO, &mut rng);
            assert!(p.mass >= PLANET_MASS_MIN && p.mass < PLANET_MASS_MAX);
        }
    }
}
