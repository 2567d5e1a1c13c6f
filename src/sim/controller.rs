//! Run lifecycle: idle -> running -> terminal, plus score reporting
//!
//! The controller mediates launch/reset/step commands into the engine and
//! surfaces terminal events to external collaborators (leaderboard, UI).

use glam::Vec2;
use rand::Rng;

use super::engine::{SimEvent, Simulation};
use super::level::{Level, Planet};
use super::world::OptionsPatch;
use crate::leaderboard::{LeaderboardBackend, PlayerIdentity, ScoreSubmission, now_ms};

/// Where the run currently sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Waiting for launch; planets may be placed and removed
    Idle,
    /// Puck in flight
    Running,
    /// Crashed, out of bounds, or goal reached
    Terminal,
}

/// Owns a [`Simulation`] and its lifecycle.
///
/// Relaunching from `Terminal` implicitly resets the run first, so the
/// launch button always starts a fresh attempt with zeroed time/progress.
pub struct RunController {
    sim: Simulation,
    phase: RunPhase,
    /// Terminal cause of the last run, if any
    outcome: Option<SimEvent>,
    /// Leaderboard key for the active level (`level:N` or `daily:<date>`)
    seed_key: String,
    player: PlayerIdentity,
    board: Option<Box<dyn LeaderboardBackend>>,
}

impl RunController {
    pub fn new(sim: Simulation, seed_key: impl Into<String>, player: PlayerIdentity) -> Self {
        Self {
            sim,
            phase: RunPhase::Idle,
            outcome: None,
            seed_key: seed_key.into(),
            player,
            board: None,
        }
    }

    /// Attach a leaderboard; submissions are best-effort and never touch
    /// run state
    pub fn set_board(&mut self, board: Box<dyn LeaderboardBackend>) {
        self.board = Some(board);
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn outcome(&self) -> Option<SimEvent> {
        self.outcome
    }

    pub fn seed_key(&self) -> &str {
        &self.seed_key
    }

    /// Start the puck flying. No-op while already running; from a terminal
    /// state the run is reset first.
    pub fn launch(&mut self) {
        match self.phase {
            RunPhase::Running => {}
            RunPhase::Idle => {
                self.sim.set_running(true);
                self.phase = RunPhase::Running;
                log::info!("launch: {}", self.seed_key);
            }
            RunPhase::Terminal => {
                self.sim.reset();
                self.outcome = None;
                self.sim.set_running(true);
                self.phase = RunPhase::Running;
                log::info!("relaunch after terminal: {}", self.seed_key);
            }
        }
    }

    /// Back to idle: puck at the emitter, progress and clock zeroed
    pub fn reset(&mut self) {
        self.sim.reset();
        self.outcome = None;
        self.phase = RunPhase::Idle;
    }

    /// Advance the run by one external tick. Meaningful only while running;
    /// otherwise a no-op. Terminal events flip the phase and, for a goal,
    /// submit the score.
    pub fn tick(&mut self, dt: f32, events: &mut Vec<SimEvent>) {
        if self.phase != RunPhase::Running {
            return;
        }
        let start = events.len();
        self.sim.advance(dt, events);
        for event in &events[start..] {
            if event.is_terminal() {
                self.phase = RunPhase::Terminal;
                self.outcome = Some(*event);
                if let SimEvent::GoalReached { score } = *event {
                    self.report_score(score);
                }
            }
        }
    }

    fn report_score(&mut self, score: u32) {
        let submission = ScoreSubmission {
            seed: self.seed_key.clone(),
            score,
            planets: self.sim.planets().len() as u32,
            uid: self.player.uid.clone(),
            name: self.player.name.clone(),
            when: now_ms(),
        };
        log::info!(
            "goal reached: score {} on {} ({} planets)",
            score,
            submission.seed,
            submission.planets
        );
        if let Some(board) = self.board.as_mut() {
            board.submit(&submission);
        }
    }

    /// Swap the active level; resets the run and waypoint progress
    pub fn load_level(&mut self, level: Level, seed_key: impl Into<String>) {
        self.sim.replace_level(level);
        self.seed_key = seed_key.into();
        self.reset();
    }

    pub fn apply_options(&mut self, patch: &OptionsPatch) {
        self.sim.apply_options(patch);
    }

    // Planet edits are intended for the idle phase; the engine tolerates
    // mid-run mutation but the result is unspecified gameplay-wise.

    /// Place a planet with a rolled mass; false when the cap is hit
    pub fn place_planet<R: Rng>(&mut self, pos: Vec2, rng: &mut R) -> bool {
        self.sim.planets_mut().push(Planet::place(pos, rng))
    }

    /// Remove the planet closest to `point` (right-click)
    pub fn remove_planet_near(&mut self, point: Vec2) -> bool {
        self.sim.planets_mut().remove_nearest(point).is_some()
    }

    /// Undo the most recent placement
    pub fn undo_planet(&mut self) -> bool {
        self.sim.planets_mut().pop().is_some()
    }

    pub fn clear_planets(&mut self) {
        self.sim.planets_mut().clear();
    }

    /// Fetch the top rows for the active level, empty when no board is set
    pub fn fetch_top(&self, limit: usize) -> Vec<crate::leaderboard::ScoreRow> {
        self.board
            .as_ref()
            .map(|b| b.fetch_top(&self.seed_key, limit))
            .unwrap_or_default()
    }
}
