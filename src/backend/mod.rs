//! Leaderboard / identity API client
//!
//! The server is an external HTTP JSON service. Everything up to the wire
//! (request shapes, error classification, session bookkeeping) is plain Rust
//! so it can be tested natively; the fetch transport is browser-only.

pub mod error;
pub mod request;
pub mod types;
#[cfg(target_arch = "wasm32")]
mod fetch;

pub use error::BackendError;
pub use request::{ApiRequest, Method, parse_response, validate_display_name};
pub use types::{LeaderboardEntry, ScoreRecord, User};
#[cfg(target_arch = "wasm32")]
pub use fetch::{ApiClient, BackendStatus, WebReporter};

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError, load_json, save_json};

/// Signed-in identity. The auth cookie itself is HTTP-only and handled by
/// the browser; we only remember who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
}

impl Session {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "sky_flap_session";

    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let session = load_json::<Session>(store, Self::STORAGE_KEY)?;
        log::info!("Restored session for {}", session.user.display_name);
        Some(session)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        save_json(store, Self::STORAGE_KEY, self)
    }

    pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(Self::STORAGE_KEY)
    }
}

/// Fire-and-forget score submission.
///
/// Implementations must return immediately; any failure is reported out of
/// band and never reaches the game loop.
pub trait ScoreReporter {
    fn submit(&mut self, session: &Session, score: u32);
}

/// Reporter for offline play and native builds
#[derive(Debug, Default)]
pub struct Offline;

impl ScoreReporter for Offline {
    fn submit(&mut self, session: &Session, score: u32) {
        log::debug!(
            "Offline: not submitting {} for {}",
            score,
            session.user.display_name
        );
    }
}

/// Remembers submissions instead of sending them
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub submitted: Vec<(u32, u32)>,
}

impl ScoreReporter for RecordingReporter {
    fn submit(&mut self, session: &Session, score: u32) {
        self.submitted.push((session.user.id, score));
    }
}
