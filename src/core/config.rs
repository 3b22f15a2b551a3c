//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.cattag/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::LevelFilter;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ImageSize;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CattagConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub tags: TagsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub image_size: Option<ImageSize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TagsConfig {
    pub suggestions: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://cataas.com";
pub const DEFAULT_LOG_FILE: &str = "cattag.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub const DEFAULT_SUGGESTIONS: &[&str] = &[
    "cute", "grumpy", "hat", "orange", "black", "white", "kitten", "sleepy", "box", "funny",
    "fat", "sad",
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: Url,
    pub image_size: ImageSize,
    pub suggestions: Vec<String>,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub image_size: Option<ImageSize>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::InvalidUrl(url) => write!(f, "invalid base URL: {url}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.cattag/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cattag").join("config.toml"))
}

/// Where a loaded config came from.
///
/// Loading happens before the file logger exists, so the outcome is
/// returned to `main` and logged there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from an existing file.
    File(PathBuf),
    /// No file existed; a commented default was written.
    Generated(PathBuf),
    /// No file existed and writing the default failed.
    GenerateFailed { path: PathBuf, reason: String },
    /// No home directory, so built-in defaults only.
    NoHomeDir,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::File(path) => write!(f, "loaded config from {}", path.display()),
            ConfigOrigin::Generated(path) => {
                write!(f, "no config file found, generated default at {}", path.display())
            }
            ConfigOrigin::GenerateFailed { path, reason } => write!(
                f,
                "no config file found, failed to write default at {}: {reason}",
                path.display()
            ),
            ConfigOrigin::NoHomeDir => {
                write!(f, "could not determine home directory, using default config")
            }
        }
    }
}

/// Load config from `~/.cattag/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CattagConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<(CattagConfig, ConfigOrigin), ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok((CattagConfig::default(), ConfigOrigin::NoHomeDir)),
    }
}

pub fn load_config_from(path: &Path) -> Result<(CattagConfig, ConfigOrigin), ConfigError> {
    if !path.exists() {
        let origin = match generate_default_config(path) {
            Ok(()) => ConfigOrigin::Generated(path.to_path_buf()),
            Err(e) => ConfigOrigin::GenerateFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        };
        return Ok((CattagConfig::default(), origin));
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: CattagConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    Ok((config, ConfigOrigin::File(path.to_path_buf())))
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# cattag configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "info"                 # "off", "error", "warn", "info", "debug", "trace"
# log_file = "cattag.log"

# [service]
# base_url = "https://cataas.com"    # Or set CATTAG_BASE_URL
# image_size = "medium"              # "xsmall", "small", "medium", "square"

# [tags]
# suggestions = ["cute", "grumpy", "hat", "orange"]
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &CattagConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    // Base URL: CLI → env → config → default
    let raw_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("CATTAG_BASE_URL").ok())
        .or_else(|| config.service.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = parse_base_url(&raw_url)?;

    // Image size: CLI → env → config → default
    let image_size = cli
        .image_size
        .or_else(|| {
            std::env::var("CATTAG_IMAGE_SIZE")
                .ok()
                .and_then(|s| parse_image_size(&s))
        })
        .or(config.service.image_size)
        .unwrap_or_default();

    let log_level = cli
        .log_level
        .as_deref()
        .or(config.general.log_level.as_deref())
        .and_then(parse_level)
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    Ok(ResolvedConfig {
        base_url,
        image_size,
        suggestions: resolve_suggestions(config),
        log_level,
        log_file,
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidUrl(raw.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}

fn parse_image_size(s: &str) -> Option<ImageSize> {
    ImageSize::from_str(s.trim(), true).ok()
}

/// Configured suggestions, falling back to the built-in list when unset or
/// when every configured label is blank.
///
/// Commas separate tags in request paths, so a label like `"grumpy,hat"`
/// is split into two suggestions.
fn resolve_suggestions(config: &CattagConfig) -> Vec<String> {
    let configured: Vec<String> = config
        .tags
        .suggestions
        .iter()
        .flatten()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if configured.is_empty() {
        DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        configured
    }
}
