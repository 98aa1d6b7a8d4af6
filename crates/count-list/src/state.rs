use count_list_config::AppConfig;

/// Application state shared by every connected view
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub low: i64,
    pub high: i64,
    pub color: String,
    pub palette: Vec<String>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            low: config.initial_low,
            high: config.initial_high,
            color: config.palette.first().cloned().unwrap_or_default(),
            palette: config.palette.clone(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
