//! Application settings loaded from config.toml
//!
//! The file carries the database location, projection tunables and the
//! default categories seeded on startup. Every section is optional; missing
//! values fall back to the defaults below. `DATABASE_URL` in the environment
//! overrides the file's database URL.

use crate::{
    core::projection::{DEFAULT_MAX_HORIZON_MONTHS, ProjectionOptions, WeeklyPolicy},
    entities::MovementKind,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Database URL used when neither the environment nor the file sets one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/financial_control.sqlite?mode=rwc";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database section
    pub database: DatabaseSettings,
    /// Projection section
    pub projection: ProjectionSettings,
    /// Default categories to seed
    pub categories: Vec<CategorySeed>,
}

/// `[database]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// `[projection]` section
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Horizon used when a request does not name one
    pub default_horizon_months: u32,
    /// Largest horizon accepted
    pub max_horizon_months: u32,
    /// How weekly items become monthly amounts
    pub weekly_policy: WeeklyPolicy,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            default_horizon_months: 6,
            max_horizon_months: DEFAULT_MAX_HORIZON_MONTHS,
            weekly_policy: WeeklyPolicy::default(),
        }
    }
}

/// A shared default category
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySeed {
    /// Category name
    pub name: String,
    /// Income or expense
    pub kind: MovementKind,
    /// Optional icon name
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional hex color
    #[serde(default)]
    pub color: Option<String>,
}

impl Settings {
    /// Engine options derived from the `[projection]` section.
    #[must_use]
    pub const fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            weekly_policy: self.projection.weekly_policy,
            max_horizon_months: self.projection.max_horizon_months,
        }
    }

    fn validate(self) -> Result<Self> {
        let projection = self.projection;
        if projection.max_horizon_months == 0 {
            return Err(Error::Config {
                message: "max_horizon_months must be at least 1".to_string(),
            });
        }
        if !(1..=projection.max_horizon_months).contains(&projection.default_horizon_months) {
            return Err(Error::Config {
                message: format!(
                    "default_horizon_months must be between 1 and {}, got {}",
                    projection.max_horizon_months, projection.default_horizon_months
                ),
            });
        }
        Ok(self)
    }
}

/// Parses settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - The projection limits are inconsistent
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.as_ref().display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `FINANCE_CONFIG` (default `./config.toml`) and applies
/// the `DATABASE_URL` override.
///
/// A missing default file yields the built-in defaults; a missing file named
/// explicitly through `FINANCE_CONFIG` is an error.
pub fn load_default_settings() -> Result<Settings> {
    let mut settings = match std::env::var("FINANCE_CONFIG") {
        Ok(path) => load_settings(path)?,
        Err(_) if Path::new("config.toml").exists() => load_settings("config.toml")?,
        Err(_) => {
            tracing::warn!("No config.toml found, using built-in defaults");
            Settings::default()
        }
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        settings.database.url = url;
    }
    Ok(settings)
}
