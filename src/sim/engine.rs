//! Gravitational simulation engine
//!
//! One canonical integrator for puck motion under multi-body gravity, with
//! collision/boundary handling and ordered-waypoint progress. Must stay pure
//! and deterministic: no RNG, no platform calls, stable iteration order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::{Level, Planet, PlanetSet};
use super::world::{OptionsPatch, WorldConfig};
use crate::compute_score;
use crate::consts::*;

/// The controlled entity. Exactly one per run; reset, never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Puck {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Puck {
    /// Launch pose: fixed x, vertically centered, moving right
    fn at_start(arena_height: f32) -> Self {
        Self {
            pos: Vec2::new(LAUNCH_X, arena_height * 0.5),
            vel: Vec2::new(LAUNCH_SPEED, 0.0),
            radius: PUCK_RADIUS,
        }
    }
}

/// Discrete outcomes surfaced while advancing the simulation.
///
/// `Crashed`, `OutOfBounds` and `GoalReached` are terminal: the run stops
/// and no further motion occurs within the same advance call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "kebab-case")]
pub enum SimEvent {
    /// Waypoint captured; `index` is the 1-based count of captured notes
    NoteCaptured { index: usize },
    /// Hit a planet
    Crashed,
    /// Left the arena with wall bouncing disabled
    OutOfBounds,
    /// All notes captured and the goal touched
    GoalReached { score: u32 },
}

impl SimEvent {
    /// Whether this event ends the run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SimEvent::NoteCaptured { .. })
    }
}

/// The simulation state machine: puck, planets, level progress.
///
/// Single-threaded by construction; `advance` always runs to completion
/// (full sub-step count or early terminal exit) before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    config: WorldConfig,
    level: Level,
    planets: PlanetSet,
    puck: Puck,
    running: bool,
    elapsed: f32,
    next_note: usize,
}

impl Simulation {
    pub fn new(config: WorldConfig, level: Level) -> Self {
        Self {
            puck: Puck::at_start(config.height),
            config,
            level,
            planets: PlanetSet::new(),
            running: false,
            elapsed: 0.0,
            next_note: 0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn planets(&self) -> &PlanetSet {
        &self.planets
    }

    /// Planet mutations are only safe between ticks (idle phases); the
    /// single-threaded engine guarantees no advance is in flight here.
    pub fn planets_mut(&mut self) -> &mut PlanetSet {
        &mut self.planets
    }

    pub fn puck(&self) -> &Puck {
        &self.puck
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Index of the next note to capture; equals the captured count
    pub fn next_note(&self) -> usize {
        self.next_note
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Restore the launch pose and zero all progress
    pub fn reset(&mut self) {
        self.puck = Puck::at_start(self.config.height);
        self.elapsed = 0.0;
        self.next_note = 0;
        self.running = false;
    }

    /// Swap in a new level; waypoint progress starts over
    pub fn replace_level(&mut self, level: Level) {
        self.level = level;
        self.next_note = 0;
    }

    pub fn replace_planets(&mut self, planets: Vec<Planet>) {
        self.planets.replace(planets);
    }

    pub fn apply_options(&mut self, patch: &OptionsPatch) {
        self.config.apply(patch);
    }

    /// Resize the arena. Existing planet/note positions are left alone;
    /// the caller reflows the level if it wants proportional layout.
    pub fn set_arena(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
    }

    /// Advance by one external tick, pushing zero or more events.
    ///
    /// `dt` is clamped to `[0, DT_MAX]` before sub-step division, so a lag
    /// spike cannot destabilize the integrator. Does nothing unless running.
    pub fn advance(&mut self, dt: f32, events: &mut Vec<SimEvent>) {
        if !self.running {
            return;
        }
        let dt = dt.clamp(0.0, DT_MAX);
        let substeps = if self.config.ultra_physics {
            ULTRA_SUBSTEPS
        } else {
            1
        };
        let sdt = dt / substeps as f32;
        for _ in 0..substeps {
            self.step_once(sdt, events);
            if !self.running {
                break;
            }
        }
        // Elapsed reflects the full clamped tick even when a sub-step
        // terminated early; sub-step granularity keeps the error tiny.
        self.elapsed += dt;
    }

    /// One sub-step of the integrator
    fn step_once(&mut self, mut dt: f32, events: &mut Vec<SimEvent>) {
        // Local time slows near mass concentrations, compounding per planet
        if self.config.time_dilation {
            for p in self.planets.as_slice() {
                let d = p.pos.distance(self.puck.pos);
                if d < p.radius * DILATION_RANGE {
                    dt *= DILATION_FACTOR;
                }
            }
        }

        // Accumulate gravity from every planet before integrating; a hit
        // planet ends the run before any motion happens this sub-step
        let mut acc = Vec2::ZERO;
        for p in self.planets.as_slice() {
            let delta = p.pos - self.puck.pos;
            let d2 = delta.length_squared();
            let d = d2.sqrt() + DIST_EPSILON;
            let force = self.config.gravity * p.mass / (d2 + GRAVITY_SOFTENING);
            acc += (delta / d) * force;

            if d < p.radius + self.puck.radius {
                self.running = false;
                events.push(SimEvent::Crashed);
                return;
            }
        }

        // Cap combined acceleration to keep close flybys stable
        let mag = acc.length();
        if mag > MAX_ACCEL {
            acc *= MAX_ACCEL / mag;
        }

        // Semi-implicit Euler
        self.puck.vel += acc * dt;
        self.puck.pos += self.puck.vel * dt;

        let (w, h) = (self.config.width, self.config.height);
        let r = self.puck.radius;
        if self.config.walls_bounce {
            if self.puck.pos.x < r {
                self.puck.pos.x = r;
                self.puck.vel.x = self.puck.vel.x.abs() * WALL_RESTITUTION;
            }
            if self.puck.pos.x > w - r {
                self.puck.pos.x = w - r;
                self.puck.vel.x = -self.puck.vel.x.abs() * WALL_RESTITUTION;
            }
            if self.puck.pos.y < r {
                self.puck.pos.y = r;
                self.puck.vel.y = self.puck.vel.y.abs() * WALL_RESTITUTION;
            }
            if self.puck.pos.y > h - r {
                self.puck.pos.y = h - r;
                self.puck.vel.y = -self.puck.vel.y.abs() * WALL_RESTITUTION;
            }
        } else if self.puck.pos.x < -OOB_MARGIN
            || self.puck.pos.x > w + OOB_MARGIN
            || self.puck.pos.y < -OOB_MARGIN
            || self.puck.pos.y > h + OOB_MARGIN
        {
            self.running = false;
            events.push(SimEvent::OutOfBounds);
            return;
        }

        // Only the next note in sequence is live; the rest are inert
        if let Some(note) = self.level.notes().get(self.next_note) {
            let d = note.pos.distance(self.puck.pos);
            if d < note.radius + self.puck.radius {
                self.next_note += 1;
                events.push(SimEvent::NoteCaptured {
                    index: self.next_note,
                });
            }
        }

        // Goal arms once the whole sequence is captured. A capture above
        // may arm it within the same sub-step.
        if self.next_note == self.level.note_count() {
            let goal = self.level.goal;
            let d = goal.pos.distance(self.puck.pos);
            if d < goal.radius + self.puck.radius {
                self.running = false;
                let score = compute_score(self.elapsed, self.planets.len());
                events.push(SimEvent::GoalReached { score });
            }
        }
    }
}
