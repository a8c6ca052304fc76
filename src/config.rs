use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Language;

pub const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";
pub const DEFAULT_ITEMS_PER_PAGE: usize = 2;
const DEFAULT_MAX_RESULTS: u32 = 10;

const API_KEY_ENV_VARS: [&str; 2] = ["NEWSDECK_API_KEY", "GNEWS_API_KEY"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: NewsApiConfig,
    pub ui: UiConfig,
}

/// Everything the news client needs; handed to it at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_results: u32,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub items_per_page: usize,
    /// Initial UI locale. News results stay unfiltered by language until
    /// the user picks one.
    pub language: Language,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            language: Language::En,
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("newsdeck").join("config.toml"))
    }

    /// Defaults, then the config file if one exists, then env overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        let key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty());
        if let Some(key) = key {
            self.api.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ui.items_per_page == 0 {
            return Err(AppError::Config(
                "ui.items_per_page must be at least 1".to_string(),
            ));
        }
        url::Url::parse(&self.api.base_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_stock_ui() {
        let config = Config::default();
        assert_eq!(config.ui.items_per_page, 2);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.api.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"
            [api]
            api_key = "secret"
            "#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api.max_results, 10);
        assert_eq!(config.ui.items_per_page, 2);
    }

    #[test]
    fn full_file_round_trip() {
        let file = write_config(
            r#"
            [api]
            base_url = "http://localhost:8080/api"
            max_results = 25

            [ui]
            items_per_page = 4
            language = "zh"
            "#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.max_results, 25);
        assert_eq!(config.ui.items_per_page, 4);
        assert_eq!(config.ui.language, Language::Zh);
    }

    #[test]
    fn malformed_file_is_a_toml_error() {
        let file = write_config("[api\nbase_url = ");
        assert!(matches!(
            Config::load_from(file.path()),
            Err(AppError::Toml(_))
        ));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = Config::default();
        config.ui.items_per_page = 0;
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = Config::default();
        config.api.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(AppError::Url(_))));
    }
}
