//! TOML configuration file layered underneath command-line flags.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use wumpus_system_autoplay::Config as AutoplayConfig;
use wumpus_world::WorldConfig;

/// File consulted when no `--config` flag is given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "wumpus.toml";

/// Settings read from the configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) world: WorldSection,
    pub(crate) autoplay: AutoplaySection,
}

/// `[world]` table.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WorldSection {
    pub(crate) size: Option<u32>,
    pub(crate) pit_density: Option<f64>,
    pub(crate) seed: Option<u64>,
}

/// `[autoplay]` table.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AutoplaySection {
    pub(crate) turn_delay_ms: Option<u64>,
    pub(crate) thinking_delay_ms: Option<u64>,
}

impl FileConfig {
    /// Builds the world configuration, preferring `overrides` over the file.
    pub(crate) fn world_config(&self, overrides: &WorldSection) -> WorldConfig {
        let defaults = WorldConfig::default();
        WorldConfig::new(
            overrides
                .size
                .or(self.world.size)
                .unwrap_or(defaults.size),
            overrides
                .pit_density
                .or(self.world.pit_density)
                .unwrap_or(defaults.pit_density),
            overrides
                .seed
                .or(self.world.seed)
                .unwrap_or(defaults.seed),
        )
    }

    /// Builds the autoplay configuration, preferring `overrides` over the file.
    pub(crate) fn autoplay_config(&self, overrides: &AutoplaySection) -> AutoplayConfig {
        let defaults = AutoplayConfig::default();
        let turn_delay = overrides
            .turn_delay_ms
            .or(self.autoplay.turn_delay_ms)
            .map_or(defaults.turn_delay(), Duration::from_millis);
        let thinking_delay = overrides
            .thinking_delay_ms
            .or(self.autoplay.thinking_delay_ms)
            .map_or(defaults.thinking_delay(), Duration::from_millis);
        AutoplayConfig::new(turn_delay, thinking_delay)
    }
}

/// Loads the configuration file.
///
/// An explicit path must exist. The default path is skipped when absent.
pub(crate) fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(error) if !required && error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no configuration file found");
            return Ok(FileConfig::default());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read configuration at {}", path.display()))
        }
    };

    parse(&contents)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

fn parse(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("failed to parse configuration toml contents")
}
