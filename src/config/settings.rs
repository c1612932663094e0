//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::variant::DEFAULT_VARIANT_ID;

// ---------------------------------------------------------------------------
// ConversionConfig
// ---------------------------------------------------------------------------

/// Session-level conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Variant id selected at startup; updated on exit with the last
    /// selection so it survives restarts.
    pub variant: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            variant: DEFAULT_VARIANT_ID.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SchedulerConfig
// ---------------------------------------------------------------------------

/// Timing policy for the conversion scheduler.
///
/// | Input length (chars)      | Debounce          |
/// |---------------------------|-------------------|
/// | `> large_input_chars`     | `large_delay_ms`  |
/// | `> medium_input_chars`    | `medium_delay_ms` |
/// | otherwise                 | `base_delay_ms`   |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub large_input_chars: usize,
    pub large_delay_ms: u64,
    pub medium_input_chars: usize,
    pub medium_delay_ms: u64,
    pub base_delay_ms: u64,
    /// How long a call may stay unresolved before the busy indicator shows.
    pub busy_grace_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            large_input_chars: 50_000,
            large_delay_ms: 200,
            medium_input_chars: 5_000,
            medium_delay_ms: 50,
            base_delay_ms: 10,
            busy_grace_ms: 150,
        }
    }
}

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Where the conversion service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL; the variant id is appended as the last path segment.
    pub base_url: String,
    /// Transport-level timeout.  `None` waits indefinitely, matching the
    /// scheduler which enforces no timeout of its own.
    pub timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8765".into(),
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use hanconv_live::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let mut config = AppConfig::load().unwrap();
///
/// config.conversion.variant = "s2twp".into();
/// config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub conversion: ConversionConfig,
    pub scheduler: SchedulerConfig,
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");

        assert_eq!(config.conversion.variant, "s2t");
        assert_eq!(config.scheduler, SchedulerConfig::default());
        assert_eq!(config.service.base_url, "http://127.0.0.1:8765");
    }

    #[test]
    fn default_timings() {
        let cfg = SchedulerConfig::default();

        assert_eq!(cfg.large_input_chars, 50_000);
        assert_eq!(cfg.large_delay_ms, 200);
        assert_eq!(cfg.medium_input_chars, 5_000);
        assert_eq!(cfg.medium_delay_ms, 50);
        assert_eq!(cfg.base_delay_ms, 10);
        assert_eq!(cfg.busy_grace_ms, 150);
    }

    #[test]
    fn modified_values_survive_save_and_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        let mut cfg = AppConfig::default();
        cfg.conversion.variant = "tw2sp".into();
        cfg.scheduler.busy_grace_ms = 300;
        cfg.service.base_url = "http://converter.local".into();
        cfg.service.timeout_secs = Some(5);

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.conversion.variant, "tw2sp");
        assert_eq!(loaded.scheduler.busy_grace_ms, 300);
        assert_eq!(loaded.scheduler.base_delay_ms, 10);
        assert_eq!(loaded.service.base_url, "http://converter.local");
        assert_eq!(loaded.service.timeout_secs, Some(5));
    }

    /// Sections left out of the file fall back to their defaults.
    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[conversion]\nvariant = \"hk2s\"\n").unwrap();

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.conversion.variant, "hk2s");
        assert_eq!(loaded.scheduler, SchedulerConfig::default());
        assert!(loaded.service.timeout_secs.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[conversion\nvariant = ").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
