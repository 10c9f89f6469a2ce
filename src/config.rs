//! Run settings and user configuration
//!
//! [`Settings`] come from the environment with defaults for every field.
//! [`UserConfig`] is the optional `Config.json` that drives the `run` command.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::models::RecipeDatabase;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_json: PathBuf,
    pub config_json: PathBuf,
    pub log_dir: PathBuf,
    pub log_console: bool,
    pub default_belt: String,
    pub default_verbose: bool,
    pub output_folder: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_json: PathBuf::from("data/base.json"),
            config_json: PathBuf::from("data/Config.json"),
            log_dir: PathBuf::from("."),
            log_console: false,
            default_belt: "green".to_string(),
            default_verbose: false,
            output_folder: PathBuf::from("calculation trees"),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_json: lookup("BASE_JSON").map_or(defaults.base_json, PathBuf::from),
            config_json: lookup("CONFIG_JSON").map_or(defaults.config_json, PathBuf::from),
            log_dir: lookup("LOG_DIR").map_or(defaults.log_dir, PathBuf::from),
            log_console: lookup("LOG_CONSOLE").map_or(defaults.log_console, |v| is_true(&v)),
            default_belt: lookup("DEFAULT_BELT").unwrap_or(defaults.default_belt),
            default_verbose: lookup("DEFAULT_VERBOSE").map_or(defaults.default_verbose, |v| is_true(&v)),
            output_folder: lookup("OUTPUT_FOLDER").map_or(defaults.output_folder, PathBuf::from),
        }
    }
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Contents of `Config.json`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub belt_color: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub verbose: Option<bool>,
    #[serde(default, rename = "consoleLogging", deserialize_with = "flexible_bool")]
    pub console_logging: Option<bool>,
}

/// Accepts `true`, `"true"`, `"True"` and friends
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Text(String),
    }

    Ok(Option::<BoolOrString>::deserialize(deserializer)?.map(|v| match v {
        BoolOrString::Bool(b) => b,
        BoolOrString::Text(s) => is_true(&s),
    }))
}

pub const DEFAULT_PRODUCT: &str = "transport_belt";

/// Parse a target rate in items/s; must be finite and not negative
pub fn parse_target_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(format!("rate must be a finite number >= 0, got {}", value));
    }
    Ok(rate)
}

/// Options for one calculation, after config and settings are merged
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub product: String,
    pub belt_color: String,
    pub verbose: bool,
    pub console_logging: bool,
}

impl RunOptions {
    pub fn resolve(config: &UserConfig, settings: &Settings) -> Self {
        Self {
            product: config
                .product
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
            belt_color: config
                .belt_color
                .clone()
                .unwrap_or_else(|| settings.default_belt.clone()),
            verbose: config.verbose.unwrap_or(settings.default_verbose),
            console_logging: config.console_logging.unwrap_or(settings.log_console),
        }
    }
}

/// Everything one calculation run needs, passed explicitly
#[derive(Debug, Clone)]
pub struct RunContext {
    pub settings: Settings,
    pub database: RecipeDatabase,
}

impl RunContext {
    pub fn new(settings: Settings, database: RecipeDatabase) -> Self {
        Self { settings, database }
    }
}
