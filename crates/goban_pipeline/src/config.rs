//! # Pipeline Configuration
//!
//! Loaded once at startup. Every field has a default, so an empty file is
//! a valid configuration:
//!
//! ```toml
//! generation_interval_ms = 1000
//! monitor_interval_ms = 200
//! board_size = 17
//! room_code = "room123"
//! player_name = "player123"
//! # seed = 42
//! ```
//!
//! The monitor is meant to tick faster than the generator so every batch of
//! inserts is reported promptly. [`PipelineConfig::validate`] warns when it
//! does not.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::{PipelineError, PipelineResult};

/// Configuration for the generation pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Generator tick in milliseconds.
    pub generation_interval_ms: u64,
    /// Monitor tick in milliseconds.
    pub monitor_interval_ms: u64,
    /// Side length of generated boards.
    pub board_size: usize,
    /// Code given to generated rooms.
    pub room_code: String,
    /// Name given to generated players.
    pub player_name: String,
    /// Seed for kind selection. Derived from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generation_interval_ms: 1000,
            monitor_interval_ms: 200,
            board_size: 17,
            room_code: "room123".to_string(),
            player_name: "player123".to_string(),
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigParse`] for malformed input or unknown
    /// keys, and [`PipelineError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigIo`] if the file cannot be read, plus
    /// everything [`Self::from_toml_str`] returns.
    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| PipelineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks value ranges.
    ///
    /// A monitor interval that is not shorter than the generation interval
    /// is allowed but logged.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.generation_interval_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "generation_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.monitor_interval_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "monitor_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.board_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "board_size must be greater than 0".to_string(),
            ));
        }
        if self.monitor_interval_ms >= self.generation_interval_ms {
            warn!(
                generation_interval_ms = self.generation_interval_ms,
                monitor_interval_ms = self.monitor_interval_ms,
                "monitor interval is not shorter than generation interval"
            );
        }
        Ok(())
    }

    /// Returns a copy with a different generation interval.
    ///
    /// Sub-millisecond durations round up to 1ms.
    #[must_use]
    pub fn with_generation_interval(mut self, interval: Duration) -> Self {
        self.generation_interval_ms = duration_to_ms(interval);
        self
    }

    /// Returns a copy with a different monitor interval.
    #[must_use]
    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval_ms = duration_to_ms(interval);
        self
    }

    /// Returns a copy whose monitor ticks faster than its generator.
    ///
    /// A monitor interval already shorter than the generation interval is
    /// kept. Otherwise it becomes half the generation interval, at least 1ms.
    #[must_use]
    pub fn pace_monitor(mut self) -> Self {
        if self.monitor_interval_ms >= self.generation_interval_ms {
            self.monitor_interval_ms = (self.generation_interval_ms / 2).max(1);
        }
        self
    }

    /// Defaults with the given generation interval and a monitor paced to it.
    #[must_use]
    pub fn for_generation_interval(interval: Duration) -> Self {
        Self::default().with_generation_interval(interval).pace_monitor()
    }

    /// Returns a copy with a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generator tick.
    #[inline]
    #[must_use]
    pub fn generation_interval(&self) -> Duration {
        Duration::from_millis(self.generation_interval_ms)
    }

    /// Monitor tick.
    #[inline]
    #[must_use]
    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }
}

fn duration_to_ms(interval: Duration) -> u64 {
    if interval.is_zero() {
        return 0;
    }
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.generation_interval(), Duration::from_millis(1000));
        assert_eq!(config.monitor_interval(), Duration::from_millis(200));
        assert!(config.monitor_interval() < config.generation_interval());
    }

    #[test]
    fn test_partial_document() {
        let config = PipelineConfig::from_toml_str(
            r#"
            generation_interval_ms = 25
            room_code = "abc"
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.generation_interval_ms, 25);
        assert_eq!(config.room_code, "abc");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.board_size, 17);
    }

    #[test]
    fn test_rejects_unknown_key() {
        let result = PipelineConfig::from_toml_str("tick_ms = 5");
        assert!(matches!(result, Err(PipelineError::ConfigParse(_))));
    }

    #[test]
    fn test_rejects_zero_values() {
        for doc in [
            "generation_interval_ms = 0",
            "monitor_interval_ms = 0",
            "board_size = 0",
        ] {
            let result = PipelineConfig::from_toml_str(doc);
            assert!(matches!(result, Err(PipelineError::InvalidConfig(_))), "{doc}");
        }
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("goban_config_that_does_not_exist.toml");
        let result = PipelineConfig::from_file(&path);
        assert!(matches!(result, Err(PipelineError::ConfigIo { .. })));
    }

    #[test]
    fn test_from_file() {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("test_goban_config_{id}.toml"));
        fs::write(&path, "board_size = 9\nplayer_name = \"kim\"\n").unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.board_size, 9);
        assert_eq!(config.player_name, "kim");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_interval_builders() {
        let config = PipelineConfig::default()
            .with_generation_interval(Duration::from_micros(300))
            .with_monitor_interval(Duration::from_millis(40));
        assert_eq!(config.generation_interval_ms, 1);
        assert_eq!(config.monitor_interval_ms, 40);

        let zero = PipelineConfig::default().with_generation_interval(Duration::ZERO);
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_monitor_paced_faster_than_generation() {
        for ms in [2u64, 50, 150, 200, 1000, 5000] {
            let config = PipelineConfig::for_generation_interval(Duration::from_millis(ms));
            assert_eq!(config.generation_interval_ms, ms);
            assert!(config.monitor_interval_ms < ms, "generation {ms}ms");
            assert!(config.monitor_interval_ms > 0);
        }

        // Already faster: left alone.
        let config = PipelineConfig::for_generation_interval(Duration::from_millis(5000));
        assert_eq!(config.monitor_interval_ms, 200);

        // 1ms cannot be beaten at millisecond resolution.
        let config = PipelineConfig::for_generation_interval(Duration::from_millis(1));
        assert_eq!(config.monitor_interval_ms, 1);
        assert!(config.validate().is_ok());
    }
}
