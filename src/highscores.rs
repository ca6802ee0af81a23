//! Personal best score
//!
//! Persisted as a plain decimal string so earlier saves under the same key keep
//! working.

use crate::persistence::{KeyValueStore, StorageError};

/// Storage key for the persisted high score
pub const HIGH_SCORE_KEY: &str = "flappyBirdHighScore";

/// Monotonic best score for this client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Whether `score` would be a new record
    pub fn beats(&self, score: u32) -> bool {
        score > self.best
    }

    /// Load the stored high score. Missing or unparsable values read as 0.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best = store
            .get(HIGH_SCORE_KEY)
            .and_then(|raw| parse_score(&raw))
            .unwrap_or(0);
        log::info!("Loaded high score: {}", best);
        Self { best }
    }

    /// Record a finished run. Returns `Ok(true)` when it set a new record.
    ///
    /// The in-memory value is updated even if the write fails, so the HUD
    /// stays correct for this session.
    pub fn record(&mut self, score: u32, store: &mut dyn KeyValueStore) -> Result<bool, StorageError> {
        if !self.beats(score) {
            return Ok(false);
        }
        self.best = score;
        store.set(HIGH_SCORE_KEY, &score.to_string())?;
        log::info!("New high score saved: {}", score);
        Ok(true)
    }
}

/// Lenient integer parse: leading digits only, like the web's `parseInt`
fn parse_score(raw: &str) -> Option<u32> {
    let digits: String = raw.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_load_missing_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best(), 0);
    }

    #[test]
    fn test_load_parses_stored_value() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "17").unwrap();
        assert_eq!(HighScore::load(&store).best(), 17);

        store.set(HIGH_SCORE_KEY, " 23abc").unwrap();
        assert_eq!(HighScore::load(&store).best(), 23);

        store.set(HIGH_SCORE_KEY, "garbage").unwrap();
        assert_eq!(HighScore::load(&store).best(), 0);
    }

    #[test]
    fn test_record_only_on_improvement() {
        let mut store = MemoryStore::new();
        let mut high = HighScore::new(3);

        assert_eq!(high.record(3, &mut store), Ok(false));
        assert_eq!(store.get(HIGH_SCORE_KEY), None);

        assert_eq!(high.record(5, &mut store), Ok(true));
        assert_eq!(high.best(), 5);
        assert_eq!(store.get(HIGH_SCORE_KEY).as_deref(), Some("5"));

        assert_eq!(high.record(4, &mut store), Ok(false));
        assert_eq!(high.best(), 5);
    }

    #[test]
    fn test_failed_write_still_updates_memory() {
        let mut store = MemoryStore::new();
        store.read_only = true;
        let mut high = HighScore::new(1);
        assert!(high.record(9, &mut store).is_err());
        assert_eq!(high.best(), 9);
    }
}
