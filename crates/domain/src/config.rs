//! Configuration management

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_INCOME_TAX_RATE, DEFAULT_SOCIAL_FEES_RATE};
use crate::{Period, Result, TallyError};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub payroll: PayrollConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Aggregation configuration
///
/// `timezone` is an IANA zone name. Calendar-day buckets and day labels are
/// computed in this zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub timezone: String,
    pub default_period: Period,
}

/// Fixed-rate payroll deductions applied to gross pay in earnings reports
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PayrollConfig {
    pub social_fees_rate: f64,
    pub income_tax_rate: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: "tally.db".to_string(), pool_size: 4 },
            analytics: AnalyticsConfig::default(),
            payroll: PayrollConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { timezone: "UTC".to_string(), default_period: Period::Days30 }
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            social_fees_rate: DEFAULT_SOCIAL_FEES_RATE,
            income_tax_rate: DEFAULT_INCOME_TAX_RATE,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(TallyError::Config("database path must not be empty".into()));
        }
        self.analytics.tz()?;
        self.payroll.validate()
    }
}

impl AnalyticsConfig {
    /// Parse the configured IANA zone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| TallyError::Config(format!("Unknown time zone: {}", self.timezone)))
    }
}

impl PayrollConfig {
    /// Both rates must be fractions in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in
            [("social_fees_rate", self.social_fees_rate), ("income_tax_rate", self.income_tax_rate)]
        {
            if !(0.0..=1.0).contains(&rate) {
                return Err(TallyError::Config(format!("{name} must be within [0, 1], got {rate}")));
            }
        }
        Ok(())
    }
}
