//! Application configuration
//!
//! Configuration loaded from .count-list.toml file.

use serde::{Deserialize, Serialize};

/// Application configuration loaded from .count-list.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Starting value of the parent counter
    #[serde(default)]
    pub initial_low: i64,

    /// Starting value of the child counter
    #[serde(default = "default_initial_high")]
    pub initial_high: i64,

    /// Names the greeting cycles through; the first one is shown at startup
    #[serde(default = "default_names")]
    pub names: Vec<String>,

    /// Colors picked by the color action, in order
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Milliseconds to wait for input before redrawing
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_initial_high() -> i64 {
    9
}

fn default_names() -> Vec<String> {
    vec!["Dustin".to_string(), "Toran".to_string()]
}

fn default_palette() -> Vec<String> {
    vec!["blue".to_string(), "green".to_string(), "red".to_string()]
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_low: 0,
            initial_high: default_initial_high(),
            names: default_names(),
            palette: default_palette(),
            log_level: default_log_level(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Parse config content, filling empty lists with defaults
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        if config.names.is_empty() {
            config.names = default_names();
        }
        if config.palette.is_empty() {
            config.palette = default_palette();
        }
        Ok(config)
    }
}
