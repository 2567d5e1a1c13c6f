//! GraviScore - compose a trajectory with gravity
//!
//! A puck is launched from a fixed emitter and must be steered, using the
//! gravitational pull of player-placed planets, through an ordered sequence
//! of note waypoints and into the goal.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (gravity integration, run state machine)
//! - `levels`: Built-in level catalog and daily-challenge generation
//! - `host`: Command/reply protocol for driving the sim across a boundary
//! - `worker`: Off-thread driver that owns the sim behind message channels
//! - `leaderboard`: Score submission contract and local top-10 board
//! - `settings`: Player preferences with LocalStorage persistence

pub mod host;
pub mod leaderboard;
pub mod levels;
pub mod settings;
pub mod sim;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub use leaderboard::{LeaderboardBackend, LocalBoard, ScoreSubmission};
pub use settings::Settings;
pub use sim::{RunController, SimEvent, Simulation, WorldConfig};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Gravitational constant (tuned for feel, not physical units)
    pub const GRAVITY_DEFAULT: f32 = 2300.0;
    /// Softening term added to squared distance so close approaches
    /// attract strongly without blowing up
    pub const GRAVITY_SOFTENING: f32 = 200.0;
    /// Guard against division by zero at exact overlap
    pub const DIST_EPSILON: f32 = 1e-6;
    /// Combined acceleration cap (pixels/s^2)
    pub const MAX_ACCEL: f32 = 4000.0;

    /// Maximum planets a player may place
    pub const MAX_PLANETS: usize = 6;
    /// Planet radius is derived from mass: r = BASE + mass * PER_MASS
    pub const PLANET_BASE_RADIUS: f32 = 10.0;
    pub const PLANET_RADIUS_PER_MASS: f32 = 1.4;
    /// Mass roll range for newly placed planets
    pub const PLANET_MASS_MIN: f32 = 4.0;
    pub const PLANET_MASS_MAX: f32 = 14.0;

    /// Puck launch pose: x is fixed, y is centered on arena height
    pub const LAUNCH_X: f32 = 90.0;
    pub const LAUNCH_SPEED: f32 = 130.0;
    pub const PUCK_RADIUS: f32 = 7.0;

    /// Waypoint and goal sizes
    pub const NOTE_RADIUS: f32 = 12.0;
    pub const GOAL_RADIUS: f32 = 16.0;

    /// External dt is clamped here before sub-step division (lag spikes,
    /// backgrounded tabs)
    pub const DT_MAX: f32 = 0.05;
    /// Sub-steps per external tick when ultra physics is on
    pub const ULTRA_SUBSTEPS: u32 = 3;

    /// Wall restitution when bouncing is enabled (lossy)
    pub const WALL_RESTITUTION: f32 = 0.9;
    /// How far past the arena edge the puck may drift before the run is
    /// lost (bounce disabled)
    pub const OOB_MARGIN: f32 = 50.0;

    /// Time dilation: sub-step dt shrinks by this factor for every planet
    /// within DILATION_RANGE * planet.radius of the puck
    pub const DILATION_FACTOR: f32 = 0.85;
    pub const DILATION_RANGE: f32 = 1.8;

    /// Scoring: base + time bonus - planet penalty, floored at 1
    pub const SCORE_BASE: f32 = 100.0;
    pub const SCORE_TIME_WINDOW: f32 = 12.0;
    pub const SCORE_TIME_RATE: f32 = 8.0;
    pub const SCORE_PLANET_PENALTY: f32 = 1.2;
}

/// Squared distance helper for nearest-planet queries
#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Final score for a goal reached at `elapsed` seconds with `planets` placed
#[inline]
pub fn compute_score(elapsed: f32, planets: usize) -> u32 {
    use consts::*;
    let time_bonus = (SCORE_TIME_WINDOW - elapsed).max(0.0);
    let penalty = planets as f32 * SCORE_PLANET_PENALTY;
    (SCORE_BASE + time_bonus * SCORE_TIME_RATE - penalty)
        .round()
        .max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_formula() {
        // 5s run, 2 planets: round(100 + 7*8 - 2.4) = round(153.6)
        assert_eq!(compute_score(5.0, 2), 154);
        // Past the 12s bonus window, 6 planets: round(100 - 7.2)
        assert_eq!(compute_score(20.0, 6), 93);
        // Bonus never goes negative, so slower runs score the same
        assert_eq!(compute_score(1000.0, 6), 93);
    }

    #[test]
    fn test_score_zero_planets_fast() {
        // Instant goal with no planets is the ceiling: 100 + 12*8
        assert_eq!(compute_score(0.0, 0), 196);
    }

    #[test]
    fn test_dist_sq() {
        assert_eq!(dist_sq(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 25.0);
    }
}
