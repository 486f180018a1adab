//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → CLI flags.
//!
//! Config lives at `~/.flashdeck/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::DeckName;
use crate::highlight::DEFAULT_THEME;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FlashdeckConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_deck: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StudyConfig {
    pub transition_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RenderConfig {
    pub theme: Option<String>,
    pub prewarm_highlighter: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 200;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub deck: DeckName,
    pub log_level: LevelFilter,
    pub transition_delay: Duration,
    pub theme: String,
    pub prewarm_highlighter: bool,
}

/// Values given on the command line. `None`/`false` means "not specified".
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides {
    pub deck: Option<DeckName>,
    pub no_prewarm: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.flashdeck/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".flashdeck"))
}

/// Returns the path to `~/.flashdeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.flashdeck/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FlashdeckConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FlashdeckConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FlashdeckConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<FlashdeckConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(FlashdeckConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FlashdeckConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Flashdeck Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → CLI flags.

# [general]
# default_deck = "react-beginner"    # "react-beginner" or "sample"
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"

# [study]
# transition_delay_ms = 200          # pause before the next card slides in; 0 disables

# [render]
# theme = "base16-ocean.dark"        # any bundled syntect theme
# prewarm_highlighter = true         # load the highlighter at startup instead of on first use
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → CLI.
pub fn resolve(config: &FlashdeckConfig, cli: CliOverrides) -> ResolvedConfig {
    // Deck: CLI → config → default
    let deck = cli
        .deck
        .or_else(|| {
            config
                .general
                .default_deck
                .as_deref()
                .and_then(|name| match <DeckName as ValueEnum>::from_str(name, true) {
                    Ok(deck) => Some(deck),
                    Err(_) => {
                        warn!("Unknown deck '{}' in config, using default", name);
                        None
                    }
                })
        })
        .unwrap_or_default();

    let log_level = config
        .general
        .log_level
        .as_deref()
        .and_then(|level| match LevelFilter::from_str(level) {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("Unknown log level '{}' in config, using default", level);
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let transition_delay = Duration::from_millis(
        config
            .study
            .transition_delay_ms
            .unwrap_or(DEFAULT_TRANSITION_DELAY_MS),
    );

    // --no-prewarm can only switch prewarming off
    let prewarm_highlighter =
        !cli.no_prewarm && config.render.prewarm_highlighter.unwrap_or(true);

    ResolvedConfig {
        deck,
        log_level,
        transition_delay,
        theme: config
            .render
            .theme
            .clone()
            .unwrap_or_else(|| DEFAULT_THEME.to_string()),
        prewarm_highlighter,
    }
}
