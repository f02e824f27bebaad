use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
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

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_stdout_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
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

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Collection holding every recorded event
    #[serde(default = "default_events_collection")]
    pub events_collection: String,
    /// Appended to a stream type name to form its info collection
    #[serde(default = "default_info_suffix")]
    pub info_suffix: String,
}

fn default_events_collection() -> String {
    "Events".to_string()
}

fn default_info_suffix() -> String {
    "_Info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            events_collection: default_events_collection(),
            info_suffix: default_info_suffix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Allocation attempts before giving up on a full 10ms bucket
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_retry_delay_ms() -> u64 {
    10
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("BATCH_LEDGER_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

/// Reads `path` (extension optional) and overlays `BATCH_LEDGER__SECTION__KEY`
/// environment variables.
pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(config::Environment::with_prefix("BATCH_LEDGER").separator("__"))
        .build()?
        .try_deserialize()?;

    if settings.generator.max_attempts == 0 {
        return Err(config::ConfigError::Message(
            "generator.max_attempts must be at least 1".to_string(),
        ));
    }
    Ok(settings)
}
