//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to a config file
//! 3. Probes several locations for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TALLY_DB_PATH`: Database file path (required)
//! - `TALLY_DB_POOL_SIZE`: Connection pool size (required)
//! - `TALLY_TIMEZONE`: IANA zone used for day buckets
//! - `TALLY_DEFAULT_PERIOD`: Default analytics period (`7d`, `30d`, `all`, ...)
//! - `TALLY_SOCIAL_FEES_RATE`: Social fee rate applied to gross pay
//! - `TALLY_INCOME_TAX_RATE`: Income tax rate applied after social fees
//! - `TALLY_LOG_LEVEL`: Default log level
//! - `TALLY_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! `tally.{toml,json}` and `config.{toml,json}` are probed in the current
//! working directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tally_domain::{
    AnalyticsConfig, Config, DatabaseConfig, LoggingConfig, PayrollConfig, Result, TallyError,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["tally.toml", "tally.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TallyError::Config` if no source yields a valid configuration.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "environment config incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `TALLY_*` environment variables
///
/// Only the database variables are required; every other section falls back
/// to its default.
///
/// # Errors
/// Returns `TallyError::Config` if required variables are missing or any
/// value fails to parse or validate.
pub fn load_from_env() -> Result<Config> {
    let path = env_var("TALLY_DB_PATH")?;
    let pool_size = env_parse::<u32>("TALLY_DB_POOL_SIZE")?;

    let mut analytics = AnalyticsConfig::default();
    if let Some(timezone) = env_opt("TALLY_TIMEZONE") {
        analytics.timezone = timezone;
    }
    if env_opt("TALLY_DEFAULT_PERIOD").is_some() {
        analytics.default_period = env_parse("TALLY_DEFAULT_PERIOD")?;
    }

    let mut payroll = PayrollConfig::default();
    if env_opt("TALLY_SOCIAL_FEES_RATE").is_some() {
        payroll.social_fees_rate = env_parse("TALLY_SOCIAL_FEES_RATE")?;
    }
    if env_opt("TALLY_INCOME_TAX_RATE").is_some() {
        payroll.income_tax_rate = env_parse("TALLY_INCOME_TAX_RATE")?;
    }

    let defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        level: env_opt("TALLY_LOG_LEVEL").unwrap_or(defaults.level),
        json: env_bool("TALLY_LOG_JSON", defaults.json),
    };

    let config = Config { database: DatabaseConfig { path, pool_size }, analytics, payroll, logging };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations via
/// [`probe_config_paths`]. The format is chosen by file extension.
///
/// # Errors
/// Returns `TallyError::Config` if the file is missing, unreadable, malformed
/// or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TallyError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TallyError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TallyError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TallyError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TallyError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TallyError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// Returns the first existing candidate, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| TallyError::Config(format!("Missing required environment variable: {key}")))
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env_var(key)?;
    raw.trim().parse::<T>().map_err(|e| TallyError::Config(format!("Invalid {key}: {e}")))
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map_or(default, |s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
