use serde::Deserialize;

use crate::engine::core::result::NullOrder;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on grouping dimensions per query; caps CUBE at 2^n sets
    #[serde(default = "default_max_dimensions")]
    pub max_dimensions: usize,
    /// Partitions used by parallel aggregation (0 = one per rayon worker)
    #[serde(default)]
    pub worker_threads: usize,
    /// Rows consumed between cancellation checks
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dimensions: default_max_dimensions(),
            worker_threads: 0,
            batch_size: default_batch_size(),
        }
    }
}

fn default_max_dimensions() -> usize {
    8
}

fn default_batch_size() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_aggregated_marker")]
    pub aggregated_marker: String,
    #[serde(default)]
    pub null_order: NullOrder,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            aggregated_marker: default_aggregated_marker(),
            null_order: NullOrder::default(),
        }
    }
}

fn default_aggregated_marker() -> String {
    "TOTAL".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_stdout_level")]
    pub stdout_level: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            stdout_level: default_stdout_level(),
            file_level: default_file_level(),
        }
    }
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("RENTAL_OLAP_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Loads settings from `path` (extension optional), then applies
/// `RENTAL_OLAP__SECTION__KEY` environment overrides.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("RENTAL_OLAP").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
