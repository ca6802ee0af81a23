//! Game settings and preferences
//!
//! Persisted as JSON next to the high score. Unknown or missing fields fall
//! back to defaults so older saves keep loading.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError, load_json, save_json};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 32,
            QualityPreset::Medium => 96,
            QualityPreset::High => 192,
        }
    }

    /// Number of parallax clouds
    pub fn cloud_count(&self) -> usize {
        match self {
            QualityPreset::Low => 3,
            QualityPreset::Medium => 6,
            QualityPreset::High => 10,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Score/crash particle bursts
    pub particles: bool,
    /// Parallax clouds
    pub clouds: bool,

    // === HUD ===
    pub show_fps: bool,

    // === Audio ===
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Accessibility ===
    /// Reduced motion (no crash flash, slower clouds)
    pub reduced_motion: bool,

    // === Backend ===
    /// Base URL for the leaderboard API; empty means same origin
    pub api_base: String,
    /// Rows to request from the leaderboard
    pub leaderboard_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            clouds: true,
            show_fps: false,
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            reduced_motion: false,
            api_base: String::new(),
            leaderboard_limit: 10,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "sky_flap_settings";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset == QualityPreset::Low {
            self.clouds = false;
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Effective cloud count
    pub fn cloud_count(&self) -> usize {
        if !self.clouds {
            0
        } else {
            self.quality.cloud_count()
        }
    }

    /// Effective crash flash (respects reduced_motion)
    pub fn crash_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Volume to hand to the audio backend (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Some(mut settings) => {
                settings.leaderboard_limit = settings.leaderboard_limit.clamp(1, 100);
                log::info!("Loaded settings ({} quality)", settings.quality.as_str());
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"muted":true,"quality":"High"}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert!(settings.muted);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.leaderboard_limit, 10);
        assert!(settings.clouds);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.api_base = "https://scores.example".into();
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_low_preset_disables_clouds() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert_eq!(settings.cloud_count(), 0);
        assert_eq!(settings.max_particles(), 32);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let mut settings = Settings::default();
        assert!(settings.effective_volume() > 0.0);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"leaderboard_limit":0}"#)
            .unwrap();
        assert_eq!(Settings::load(&store).leaderboard_limit, 1);
    }
}
