//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The hosted TaskMaster backend; override via config, env, or flag.
pub const DEFAULT_API_URL: &str = "https://todo-backend-06ap.onrender.com";

const CONFIG_FILE_NAME: &str = "cli-config.json";
const API_URL_ENV_VAR: &str = "TASKDECK_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("taskdeck").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("https://") || value.starts_with("http://")
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// API base URL precedence: explicit flag, then `TASKDECK_API_URL`,
    /// then the persisted config file, then the built-in default.
    pub fn resolve_api_url(&self, explicit: Option<&str>) -> String {
        if let Some(url) = normalize_text_option(explicit.map(ToString::to_string)) {
            return url;
        }
        if let Some(url) = normalize_text_option(std::env::var(API_URL_ENV_VAR).ok()) {
            return url;
        }
        if let Some(url) = normalize_text_option(self.api_base_url.clone()) {
            return url;
        }
        DEFAULT_API_URL.to_string()
    }

    fn normalize(&mut self) {
        self.api_base_url = normalize_text_option(self.api_base_url.clone())
            .map(|url| url.trim_end_matches('/').to_string());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
        assert_eq!(
            normalize_text_option(Some(" x ".to_string())),
            Some("x".to_string())
        );
    }

    #[test]
    fn is_http_url_requires_scheme() {
        assert!(is_http_url("https://tasks.example.com"));
        assert!(is_http_url(" http://localhost:3000 "));
        assert!(!is_http_url("tasks.example.com"));
    }

    #[test]
    fn config_roundtrip_normalizes_api_url() {
        let path = std::env::temp_dir().join(format!(
            "taskdeck-cli-config-test-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |duration| duration.as_nanos())
        ));

        let config = CliConfig {
            version: 1,
            api_base_url: Some(" https://tasks.example.com/ ".to_string()),
        };
        config.save_to_path(&path).unwrap();

        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(
            loaded.api_base_url.as_deref(),
            Some("https://tasks.example.com")
        );

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let path = std::env::temp_dir().join("taskdeck-config-that-does-not-exist.json");
        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, CliConfig::default());
    }

    #[test]
    fn resolve_api_url_prefers_flag_then_file_then_default() {
        let config = CliConfig {
            version: 1,
            api_base_url: Some("https://from-config.example.com".to_string()),
        };
        assert_eq!(
            config.resolve_api_url(Some("https://from-flag.example.com")),
            "https://from-flag.example.com"
        );
        assert_eq!(
            config.resolve_api_url(None),
            "https://from-config.example.com"
        );

        let empty = CliConfig::default();
        assert_eq!(empty.resolve_api_url(None), DEFAULT_API_URL);
    }
}
