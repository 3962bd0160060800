//! Engine configuration via `tidemark.toml`
//!
//! A simple config file in the data directory instead of a builder:
//! on first open a default `tidemark.toml` is created; edit the file
//! and restart to change settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tidemark_core::{Error, Result};

/// Config file name placed in the engine data directory.
pub const CONFIG_FILE_NAME: &str = "tidemark.toml";

/// Engine configuration loaded from `tidemark.toml`.
///
/// # Example
///
/// ```toml
/// # Reclamation pass interval in milliseconds
/// sweep_interval_ms = 500
///
/// # Physical evictions allowed per reclamation pass
/// max_records_per_pass = 10000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How often the reclamation scanner runs, in milliseconds.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
    /// Physical evictions allowed per reclamation pass.
    #[serde(default = "default_max_records_per_pass")]
    pub max_records_per_pass: usize,
    /// Where the watermark snapshot is persisted. When absent the
    /// registry is memory-only and watermarks do not survive restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_path: Option<PathBuf>,
}

fn default_sweep_interval_ms() -> u64 {
    500
}

fn default_max_records_per_pass() -> usize {
    10_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: default_sweep_interval_ms(),
            max_records_per_pass: default_max_records_per_pass(),
            watermark_path: None,
        }
    }
}

impl EngineConfig {
    /// The reclamation interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Tidemark engine configuration
#
# Reclamation pass interval in milliseconds (default: 500).
# Suppressed records are invisible immediately; this only controls
# how quickly their physical space is reclaimed.
sweep_interval_ms = 500

# Physical evictions allowed per reclamation pass (default: 10000).
# Lower to reduce per-pass lock hold time, raise for faster catch-up.
max_records_per_pass = 10000

# Watermark snapshot path. Uncomment to persist truncation watermarks
# across restarts; without it a restart resurrects truncated records.
# watermark_path = "watermarks.bin"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            Error::Serialization(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }
}

/// Per-request policy for admin operations.
///
/// `timeout` bounds the whole request; a request that cannot complete
/// within it fails with `Error::Timeout` and leaves no partial effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoPolicy {
    /// Total request timeout; `None` means no deadline.
    pub timeout: Option<Duration>,
}

impl InfoPolicy {
    /// Policy with the given timeout in milliseconds.
    pub fn with_timeout_ms(ms: u64) -> Self {
        InfoPolicy {
            timeout: Some(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.sweep_interval_ms, 500);
        assert_eq!(config.max_records_per_pass, 10_000);
        assert!(config.watermark_path.is_none());
        assert_eq!(config.sweep_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_default_toml_parses() {
        let config: EngineConfig = toml::from_str(EngineConfig::default_toml()).unwrap();
        assert_eq!(config.sweep_interval_ms, 500);
        assert_eq!(config.max_records_per_pass, 10_000);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config.sweep_interval_ms, 500);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EngineConfig = toml::from_str("sweep_interval_ms = 50").unwrap();
        assert_eq!(config.sweep_interval_ms, 50);
        assert_eq!(config.max_records_per_pass, 10_000);
    }

    #[test]
    fn test_watermark_path_round_trip() {
        let config = EngineConfig {
            watermark_path: Some(PathBuf::from("marks.bin")),
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.watermark_path, Some(PathBuf::from("marks.bin")));
    }

    #[test]
    fn test_serialized_default_omits_watermark_path() {
        let toml_str = toml::to_string(&EngineConfig::default()).unwrap();
        assert!(!toml_str.contains("watermark_path"));
    }

    #[test]
    fn test_write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        EngineConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.sweep_interval_ms, 500);
    }

    #[test]
    fn test_write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "sweep_interval_ms = 42\n").unwrap();
        EngineConfig::write_default_if_missing(&path).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.sweep_interval_ms, 42);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "sweep_interval_ms = \"soon\"\n").unwrap();
        assert!(EngineConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_info_policy_helpers() {
        assert_eq!(InfoPolicy::default().timeout, None);
        assert_eq!(
            InfoPolicy::with_timeout_ms(1000).timeout,
            Some(Duration::from_millis(1000))
        );
    }
}
