//! Command/reply protocol for driving the simulation across a boundary
//!
//! One engine, two drivers: a same-thread loop can call [`SimHost::handle`]
//! directly, or the host can live on its own thread behind channels (see
//! `worker`). Either way the engine's state never crosses the boundary;
//! only copied command and reply payloads do.

use serde::{Deserialize, Serialize};

use crate::sim::{Level, OptionsPatch, Planet, SimEvent, Simulation, WorldConfig};

/// Commands accepted by the host. Mutating commands apply between ticks,
/// never concurrently with a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Build the simulation; answered with a snapshot
    Init {
        config: WorldConfig,
        level: Level,
        planets: Vec<Planet>,
    },
    /// Replace the planet set wholesale
    UpdatePlanets { planets: Vec<Planet> },
    /// Replace the level wholesale; waypoint progress resets
    UpdateLevel { level: Level },
    /// Patch individual option flags
    SetOptions { opts: OptionsPatch },
    SetRunning { running: bool },
    /// Back to the launch pose; answered with a snapshot
    Reset,
    /// Advance by `dt` seconds; answered with events then a snapshot
    Step { dt: f32 },
}

/// Read-only mirror of the run state, emitted after init/reset/step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub running: bool,
    pub elapsed: f32,
    pub next_note: usize,
}

impl Snapshot {
    fn of(sim: &Simulation) -> Self {
        let puck = sim.puck();
        Self {
            x: puck.pos.x,
            y: puck.pos.y,
            vx: puck.vel.x,
            vy: puck.vel.y,
            running: sim.is_running(),
            elapsed: sim.elapsed(),
            next_note: sim.next_note(),
        }
    }
}

/// Replies flowing back to the driving side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Reply {
    State { state: Snapshot },
    Event { event: SimEvent },
}

/// Owns a [`Simulation`] and applies commands to it, one at a time.
///
/// Commands before `Init` are dropped with a warning; a malformed level
/// (no notes) is rejected here so it never reaches the engine.
#[derive(Debug, Default)]
pub struct SimHost {
    sim: Option<Simulation>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command, pushing zero or more replies
    pub fn handle(&mut self, command: Command, replies: &mut Vec<Reply>) {
        match command {
            Command::Init {
                config,
                level,
                planets,
            } => {
                if level.note_count() == 0 {
                    log::warn!("init rejected: level has no notes");
                    return;
                }
                let mut sim = Simulation::new(config, level);
                sim.replace_planets(planets);
                sim.reset();
                replies.push(Reply::State {
                    state: Snapshot::of(&sim),
                });
                self.sim = Some(sim);
            }
            Command::UpdatePlanets { planets } => {
                if let Some(sim) = self.require_sim() {
                    sim.replace_planets(planets);
                }
            }
            Command::UpdateLevel { level } => {
                if level.note_count() == 0 {
                    log::warn!("updateLevel rejected: level has no notes");
                    return;
                }
                if let Some(sim) = self.require_sim() {
                    sim.replace_level(level);
                }
            }
            Command::SetOptions { opts } => {
                if let Some(sim) = self.require_sim() {
                    sim.apply_options(&opts);
                }
            }
            Command::SetRunning { running } => {
                if let Some(sim) = self.require_sim() {
                    sim.set_running(running);
                }
            }
            Command::Reset => {
                if let Some(sim) = self.require_sim() {
                    sim.reset();
                    replies.push(Reply::State {
                        state: Snapshot::of(sim),
                    });
                }
            }
            Command::Step { dt } => {
                if let Some(sim) = self.require_sim() {
                    let mut events = Vec::new();
                    sim.advance(dt, &mut events);
                    for event in events {
                        replies.push(Reply::Event { event });
                    }
                    replies.push(Reply::State {
                        state: Snapshot::of(sim),
                    });
                }
            }
        }
    }

    fn require_sim(&mut self) -> Option<&mut Simulation> {
        if self.sim.is_none() {
            log::warn!("command before init dropped");
        }
        self.sim.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Goal, Note};
    use glam::Vec2;

    fn init_command() -> Command {
        let level = Level::new(
            "host test",
            vec![Note::new(Vec2::new(5000.0, 5000.0), 'C', 261.63)],
            Goal::new(Vec2::new(6000.0, 5000.0)),
        )
        .unwrap();
        Command::Init {
            config: WorldConfig::new(1280.0, 720.0),
            level,
            planets: Vec::new(),
        }
    }

    #[test]
    fn test_init_answers_with_launch_pose() {
        let mut host = SimHost::new();
        let mut replies = Vec::new();
        host.handle(init_command(), &mut replies);

        assert_eq!(replies.len(), 1);
        let Reply::State { state } = &replies[0] else {
            panic!("expected a snapshot");
        };
        assert_eq!(state.x, 90.0);
        assert_eq!(state.y, 360.0);
        assert_eq!(state.vx, 130.0);
        assert!(!state.running);
        assert_eq!(state.next_note, 0);
    }

    #[test]
    fn test_step_while_idle_posts_snapshot_only() {
        let mut host = SimHost::new();
        let mut replies = Vec::new();
        host.handle(init_command(), &mut replies);
        replies.clear();

        host.handle(Command::Step { dt: 0.016 }, &mut replies);
        assert_eq!(replies.len(), 1);
        let Reply::State { state } = &replies[0] else {
            panic!("expected a snapshot");
        };
        assert_eq!(state.x, 90.0, "no motion while not running");
        assert_eq!(state.elapsed, 0.0);
    }

    #[test]
    fn test_run_and_step_moves_puck() {
        let mut host = SimHost::new();
        let mut replies = Vec::new();
        host.handle(init_command(), &mut replies);
        host.handle(Command::SetRunning { running: true }, &mut replies);
        replies.clear();

        host.handle(Command::Step { dt: 0.016 }, &mut replies);
        let Reply::State { state } = replies.last().unwrap() else {
            panic!("expected a snapshot last");
        };
        assert!(state.x > 90.0);
        assert!(state.running);
        assert!((state.elapsed - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_commands_before_init_dropped() {
        let mut host = SimHost::new();
        let mut replies = Vec::new();
        host.handle(Command::Step { dt: 0.016 }, &mut replies);
        host.handle(Command::Reset, &mut replies);
        assert!(replies.is_empty());
    }

    #[test]
    fn test_empty_level_rejected_at_boundary() {
        // An empty note list cannot be built through Level::new, but it can
        // arrive over the wire; the host must refuse it
        let json = r#"{
            "type": "updateLevel",
            "level": {"name": "bad", "notes": [], "goal": {"pos": [0.0, 0.0], "radius": 16.0}}
        }"#;
        let command: Command = serde_json::from_str(json).unwrap();

        let mut host = SimHost::new();
        let mut replies = Vec::new();
        host.handle(init_command(), &mut replies);
        replies.clear();
        host.handle(command, &mut replies);
        assert!(replies.is_empty());

        // The original level is still in place and steppable
        host.handle(Command::SetRunning { running: true }, &mut replies);
        host.handle(Command::Step { dt: 0.016 }, &mut replies);
        assert!(matches!(replies.last(), Some(Reply::State { .. })));
    }

    #[test]
    fn test_update_level_resets_progress() {
        let spot = Vec2::new(90.0, 360.0);
        let level = Level::new("win", vec![Note::new(spot, 'C', 261.63)], Goal::new(spot)).unwrap();
        let mut host = SimHost::new();
        let mut replies = Vec::new();
        host.handle(
            Command::Init {
                config: WorldConfig::new(1280.0, 720.0),
                level,
                planets: Vec::new(),
            },
            &mut replies,
        );
        host.handle(Command::SetRunning { running: true }, &mut replies);
        replies.clear();
        host.handle(Command::Step { dt: 0.016 }, &mut replies);
        assert!(replies
            .iter()
            .any(|r| matches!(r, Reply::Event { event: SimEvent::NoteCaptured { .. } })));

        let fresh = Level::new(
            "fresh",
            vec![Note::new(Vec2::new(400.0, 200.0), 'E', 329.63)],
            Goal::new(Vec2::new(900.0, 500.0)),
        )
        .unwrap();
        replies.clear();
        host.handle(Command::UpdateLevel { level: fresh }, &mut replies);
        host.handle(Command::Step { dt: 0.0 }, &mut replies);
        let Reply::State { state } = replies.last().unwrap() else {
            panic!("expected a snapshot");
        };
        assert_eq!(state.next_note, 0);
    }

    #[test]
    fn test_goal_step_emits_events_then_state() {
        let spot = Vec2::new(90.0, 360.0);
        let level = Level::new("win", vec![Note::new(spot, 'C', 261.63)], Goal::new(spot)).unwrap();
        let mut host = SimHost::new();
        let mut replies = Vec::new();
        host.handle(
            Command::Init {
                config: WorldConfig::new(1280.0, 720.0),
                level,
                planets: Vec::new(),
            },
            &mut replies,
        );
        host.handle(Command::SetRunning { running: true }, &mut replies);
        replies.clear();

        host.handle(Command::Step { dt: 0.016 }, &mut replies);
        assert_eq!(replies.len(), 3);
        assert!(matches!(
            replies[0],
            Reply::Event {
                event: SimEvent::NoteCaptured { index: 1 }
            }
        ));
        assert!(matches!(
            replies[1],
            Reply::Event {
                event: SimEvent::GoalReached { .. }
            }
        ));
        let Reply::State { state } = &replies[2] else {
            panic!("snapshot must follow events");
        };
        assert!(!state.running);
    }

    #[test]
    fn test_wire_format_round_trip() {
        let command = Command::SetOptions {
            opts: OptionsPatch::time_dilation(false),
        };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.contains(r#""type":"setOptions""#));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }
}
