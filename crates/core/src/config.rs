//! Layered application configuration.
//!
//! Values come from built-in defaults, then an optional TOML file under the
//! user's config directory, then `PAIRS__*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GameError;

/// Directory under the platform config dir holding our files.
pub const CONFIG_DIR: &str = "birthday-pairs";
/// Name of the TOML configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `PAIRS__BOARD__WIDTH=4`.
pub const ENV_PREFIX: &str = "PAIRS";

/// Board dimensions; only their product matters to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Cards per row.
    pub width: u16,
    /// Number of rows.
    pub height: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 3,
        }
    }
}

impl BoardConfig {
    /// Total number of cards dealt for this board.
    pub fn total_cards(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Reject boards that cannot be dealt as pairs.
    pub fn validate(&self) -> Result<(), GameError> {
        let total = self.total_cards();
        if total == 0 || total % 2 != 0 {
            return Err(GameError::InvalidBoard {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Fixed delays used by the showcase and by mismatch hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    /// Pause before the showcase starts turning cards over.
    pub showcase_delay_ms: u64,
    /// Gap between two consecutive showcase turns.
    pub reveal_stagger_ms: u64,
    /// Delay before the first card of a mismatch is turned back.
    pub mismatch_first_ms: u64,
    /// Delay before the second card of a mismatch is turned back.
    pub mismatch_second_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            showcase_delay_ms: 1000,
            reveal_stagger_ms: 100,
            mismatch_first_ms: 1000,
            mismatch_second_ms: 1200,
        }
    }
}

impl Timings {
    /// Showcase start delay.
    pub fn showcase_delay(&self) -> Duration {
        Duration::from_millis(self.showcase_delay_ms)
    }

    /// Stagger between showcase turns.
    pub fn reveal_stagger(&self) -> Duration {
        Duration::from_millis(self.reveal_stagger_ms)
    }

    /// Hide delay for the first mismatched card.
    pub fn mismatch_first(&self) -> Duration {
        Duration::from_millis(self.mismatch_first_ms)
    }

    /// Hide delay for the second mismatched card.
    pub fn mismatch_second(&self) -> Duration {
        Duration::from_millis(self.mismatch_second_ms)
    }
}

/// Top-level configuration consumed by the terminal UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Board size.
    pub board: BoardConfig,
    /// Showcase and mismatch delays.
    pub timings: Timings,
    /// Fixed deck seed; a fresh random deck is dealt when absent.
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from the default file location plus environment.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load configuration from `path` (missing files are fine) plus environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Config::try_from(&AppConfig::default())
            .context("failed to build default configuration")?;
        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let app_config: AppConfig = config
            .try_deserialize()
            .with_context(|| format!("failed to parse configuration {}", path.display()))?;
        app_config.validate()?;
        info!(
            width = app_config.board.width,
            height = app_config.board.height,
            seeded = app_config.seed.is_some(),
            "Configuration loaded"
        );
        Ok(app_config)
    }

    /// Check that the configured board can be dealt.
    pub fn validate(&self) -> Result<()> {
        self.board.validate()?;
        Ok(())
    }
}

/// Location of the configuration file inside the platform config dir.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write a default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = default_config_path();
    write_default_config(&path)?;
    Ok(path)
}

/// Write the default configuration to `path` unless it already exists.
///
/// Returns `true` when a new file was created.
pub fn write_default_config(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(true)
}

const DEFAULT_CONFIG_TOML: &str = r#"# Birthday Pairs configuration.
# width * height must be even.

[board]
width = 6
height = 3

[timings]
showcase_delay_ms = 1000
reveal_stagger_ms = 100
mismatch_first_ms = 1000
mismatch_second_ms = 1200

# Uncomment to deal the same deck every launch.
# seed = 30
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.board, BoardConfig::default());
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.board.total_cards(), 18);
        Ok(())
    }

    #[test]
    fn default_file_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        assert!(write_default_config(&path)?);
        assert!(!write_default_config(&path)?);

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "seed = 7\n[board]\nwidth = 4\nheight = 2\n")?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.board.total_cards(), 8);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.timings.mismatch_second_ms, 1200);
        Ok(())
    }

    #[test]
    fn odd_board_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[board]\nwidth = 3\nheight = 3\n")?;

        assert!(AppConfig::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn board_validation() {
        assert!(BoardConfig { width: 2, height: 3 }.validate().is_ok());
        assert_eq!(
            BoardConfig { width: 0, height: 4 }.validate(),
            Err(GameError::InvalidBoard {
                width: 0,
                height: 4
            })
        );
        assert!(BoardConfig { width: 5, height: 1 }.validate().is_err());
    }
}
