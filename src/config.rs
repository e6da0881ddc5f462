use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use fitaxis_mealplan::calorie::{DEFAULT_CALORIES, DEFAULT_GOAL_ADJUSTMENT};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    /// Used when calorie prediction fails
    #[serde(default = "default_calories")]
    pub default_calories: f64,
    /// Added for bulking, subtracted for cutting and weight loss
    #[serde(default = "default_goal_adjustment")]
    pub goal_adjustment: f64,
    /// Fixed jitter seed for reproducible plans
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_calories: default_calories(),
            goal_adjustment: default_goal_adjustment(),
            seed: None,
        }
    }
}

fn default_calories() -> f64 {
    DEFAULT_CALORIES
}

fn default_goal_adjustment() -> f64 {
    DEFAULT_GOAL_ADJUSTMENT
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// JSON log lines instead of pretty console output
    #[serde(default)]
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (FITAXIS__PLANNER__DEFAULT_CALORIES, etc.)
    /// 2. Config file specified by path, CONFIG_PATH or config/default.toml
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("planner.default_calories", DEFAULT_CALORIES)?
            .set_default("planner.goal_adjustment", DEFAULT_GOAL_ADJUSTMENT)?
            .set_default("observability.log_level", default_log_level())?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored if not found
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("FITAXIS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let planner = &self.planner;

        if !planner.default_calories.is_finite() || planner.default_calories <= 0.0 {
            return Err(format!(
                "planner.default_calories must be a positive number, got {}",
                planner.default_calories
            ));
        }
        if !planner.goal_adjustment.is_finite() || planner.goal_adjustment < 0.0 {
            return Err(format!(
                "planner.goal_adjustment must be zero or positive, got {}",
                planner.goal_adjustment
            ));
        }
        if self.observability.log_level.trim().is_empty() {
            return Err("observability.log_level must not be empty".to_string());
        }

        Ok(())
    }
}
