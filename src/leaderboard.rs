//! Leaderboard contract and local backend
//!
//! Submissions are fire-and-forget: a backend failure is logged and never
//! affects run state. The local backend keeps the best score per
//! (seed, uid), sorted descending, capped at 10 rows per seed - the same
//! shape remote backends return.

use serde::{Deserialize, Serialize};

/// Rows kept per seed
pub const MAX_ROWS: usize = 10;

/// Who is playing; uid is a locally generated stable id used for
/// best-score-per-player dedupe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub uid: String,
    pub name: Option<String>,
}

impl PlayerIdentity {
    pub fn new(uid: String, name: Option<String>) -> Self {
        Self { uid, name }
    }
}

/// One score report, keyed by the level seed (`level:N` or `daily:<date>`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub seed: String,
    pub score: u32,
    pub planets: u32,
    pub uid: String,
    pub name: Option<String>,
    /// Unix timestamp, milliseconds
    pub when: u64,
}

/// A leaderboard row as shown to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub name: Option<String>,
    pub score: u32,
    pub planets: u32,
    pub when: u64,
}

/// Best-effort score storage. Implementations log their own failures and
/// degrade to no-ops; neither call may panic.
pub trait LeaderboardBackend {
    fn submit(&mut self, submission: &ScoreSubmission);
    fn fetch_top(&self, seed: &str, limit: usize) -> Vec<ScoreRow>;
}

/// Stored entry; uid is kept for dedupe but never surfaced in rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BoardEntry {
    uid: String,
    name: Option<String>,
    score: u32,
    planets: u32,
    when: u64,
}

/// In-memory leaderboard, persisted to LocalStorage on wasm
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalBoard {
    /// seed -> entries sorted by score descending
    boards: std::collections::BTreeMap<String, Vec<BoardEntry>>,
}

impl LocalBoard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "graviscore_board";

    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, submission: &ScoreSubmission) {
        let entries = self.boards.entry(submission.seed.clone()).or_default();

        // Best score per (seed, uid): replace only on improvement
        if let Some(existing) = entries.iter_mut().find(|e| e.uid == submission.uid) {
            if submission.score <= existing.score {
                return;
            }
            existing.score = submission.score;
            existing.planets = submission.planets;
            existing.name = submission.name.clone();
            existing.when = submission.when;
        } else {
            entries.push(BoardEntry {
                uid: submission.uid.clone(),
                name: submission.name.clone(),
                score: submission.score,
                planets: submission.planets,
                when: submission.when,
            });
        }

        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.when.cmp(&b.when)));
        entries.truncate(MAX_ROWS);
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str(&json) {
                    log::info!("Loaded leaderboard from LocalStorage");
                    return board;
                }
            }
        }

        log::info!("No stored leaderboard, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl LeaderboardBackend for LocalBoard {
    fn submit(&mut self, submission: &ScoreSubmission) {
        self.insert(submission);
        self.save();
    }

    fn fetch_top(&self, seed: &str, limit: usize) -> Vec<ScoreRow> {
        self.boards
            .get(seed)
            .map(|entries| {
                entries
                    .iter()
                    .take(limit)
                    .map(|e| ScoreRow {
                        name: e.name.clone(),
                        score: e.score,
                        planets: e.planets,
                        when: e.when,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Current unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
