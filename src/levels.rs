//! Level catalog and daily-challenge generation
//!
//! Built-in layouts are stored with normalized coordinates and scaled by
//! the arena size on instantiation, so a resize can reflow the same layout.
//! Daily levels are generated from a date string: the string is hashed and
//! the hash seeds a PCG stream, so every player sees the same layout.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{Goal, Level, Note};

/// Note pitch in Hz; lowercase labels are the upper octave
pub fn pitch(label: char) -> f32 {
    match label {
        'C' => 261.63,
        'D' => 293.66,
        'E' => 329.63,
        'F' => 349.23,
        'G' => 392.00,
        'A' => 440.00,
        'B' => 493.88,
        'c' => 523.25,
        'd' => 587.33,
        'e' => 659.25,
        'g' => 784.00,
        _ => 261.63,
    }
}

/// Labels the daily generator draws from
const DAILY_LABELS: [char; 10] = ['C', 'D', 'E', 'G', 'A', 'B', 'c', 'd', 'e', 'g'];

/// A built-in layout in normalized [0, 1] coordinates
struct LayoutSpec {
    name: &'static str,
    notes: &'static [(f32, f32, char)],
    goal: (f32, f32),
}

const CATALOG: [LayoutSpec; 5] = [
    LayoutSpec {
        name: "Starter - C E G c",
        notes: &[
            (0.42, 0.28, 'C'),
            (0.65, 0.42, 'E'),
            (0.52, 0.64, 'G'),
            (0.77, 0.28, 'c'),
        ],
        goal: (0.90, 0.50),
    },
    LayoutSpec {
        name: "Orbit Waltz - D F A d",
        notes: &[
            (0.35, 0.25, 'D'),
            (0.58, 0.33, 'F'),
            (0.68, 0.58, 'A'),
            (0.82, 0.40, 'd'),
        ],
        goal: (0.90, 0.70),
    },
    LayoutSpec {
        name: "Crossfire - E G B e",
        notes: &[
            (0.30, 0.60, 'E'),
            (0.55, 0.30, 'G'),
            (0.70, 0.55, 'B'),
            (0.85, 0.25, 'e'),
        ],
        goal: (0.92, 0.50),
    },
    LayoutSpec {
        name: "Spiral Minor - A C D E",
        notes: &[
            (0.40, 0.70, 'A'),
            (0.48, 0.52, 'C'),
            (0.60, 0.40, 'D'),
            (0.78, 0.32, 'E'),
        ],
        goal: (0.90, 0.28),
    },
    LayoutSpec {
        name: "Cascade - G B D g",
        notes: &[
            (0.38, 0.24, 'G'),
            (0.50, 0.44, 'B'),
            (0.62, 0.64, 'D'),
            (0.80, 0.60, 'g'),
        ],
        goal: (0.92, 0.40),
    },
];

pub fn builtin_count() -> usize {
    CATALOG.len()
}

/// Instantiate a catalog level for the given arena size
pub fn builtin(index: usize, width: f32, height: f32) -> Option<Level> {
    let spec = CATALOG.get(index)?;
    let notes = spec
        .notes
        .iter()
        .map(|&(x, y, label)| Note::new(Vec2::new(x * width, y * height), label, pitch(label)))
        .collect();
    let goal = Goal::new(Vec2::new(spec.goal.0 * width, spec.goal.1 * height));
    Some(Level::new(spec.name, notes, goal).expect("catalog layouts always carry notes"))
}

/// Leaderboard key for a catalog level
pub fn builtin_seed_key(index: usize) -> String {
    format!("level:{index}")
}

/// Leaderboard key for a daily challenge
pub fn daily_seed_key(date: &str) -> String {
    format!("daily:{date}")
}

/// FNV-1a 32-bit hash of the seed string
fn hash_seed(s: &str) -> u32 {
    let mut h: u32 = 2166136261;
    for b in s.bytes() {
        h ^= b as u32;
        h = h.wrapping_mul(16777619);
    }
    h
}

/// Generate the daily layout for a date string like `2025-08-30`.
/// Deterministic: the same seed yields the same level everywhere.
pub fn daily(seed: &str, width: f32, height: f32) -> Level {
    let mut rng = Pcg32::seed_from_u64(hash_seed(seed) as u64);
    let notes = (0..4)
        .map(|_| {
            let label = DAILY_LABELS[rng.random_range(0..DAILY_LABELS.len())];
            let x = 0.35 + rng.random::<f32>() * 0.5;
            let y = 0.22 + rng.random::<f32>() * 0.56;
            Note::new(Vec2::new(x * width, y * height), label, pitch(label))
        })
        .collect();
    let gx = 0.78 + rng.random::<f32>() * 0.16;
    let gy = 0.24 + rng.random::<f32>() * 0.52;
    let goal = Goal::new(Vec2::new(gx * width, gy * height));
    Level::new(format!("Daily {seed}"), notes, goal).expect("daily layout always carries notes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{GOAL_RADIUS, NOTE_RADIUS};

    #[test]
    fn test_catalog_instantiates() {
        for i in 0..builtin_count() {
            let level = builtin(i, 1280.0, 720.0).unwrap();
            assert_eq!(level.note_count(), 4);
            assert_eq!(level.goal.radius, GOAL_RADIUS);
            for note in level.notes() {
                assert_eq!(note.radius, NOTE_RADIUS);
                assert!(note.pos.x > 0.0 && note.pos.x < 1280.0);
                assert!(note.pos.y > 0.0 && note.pos.y < 720.0);
                assert!(note.freq > 0.0);
            }
        }
        assert!(builtin(builtin_count(), 1280.0, 720.0).is_none());
    }

    #[test]
    fn test_daily_deterministic() {
        let a = daily("2025-08-30", 1280.0, 720.0);
        let b = daily("2025-08-30", 1280.0, 720.0);
        assert_eq!(a, b);

        let c = daily("2025-08-31", 1280.0, 720.0);
        assert_ne!(a, c, "different dates give different layouts");
    }

    #[test]
    fn test_daily_positions_in_band() {
        let level = daily("2026-01-01", 1000.0, 1000.0);
        for note in level.notes() {
            assert!(note.pos.x >= 350.0 && note.pos.x <= 850.0);
            assert!(note.pos.y >= 220.0 && note.pos.y <= 780.0);
        }
        assert!(level.goal.pos.x >= 780.0 && level.goal.pos.x <= 940.0);
        assert!(level.goal.pos.y >= 240.0 && level.goal.pos.y <= 760.0);
    }

    #[test]
    fn test_seed_keys() {
        assert_eq!(builtin_seed_key(2), "level:2");
        assert_eq!(daily_seed_key("2025-08-30"), "daily:2025-08-30");
    }
}
