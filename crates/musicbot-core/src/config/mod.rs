//! Configuration module for musicbot.
//!
//! Loads typed configuration from `~/.musicbot/config.json`.
//! Every section has defaults, so a partial file is fine.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub channels: ChannelsConfig,
    pub catalog: CatalogConfig,
    pub dialogue: DialogueConfig,
}

impl Config {
    /// Load configuration from the default path (`~/.musicbot/config.json`).
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default config directory path.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".musicbot")
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Resolved path of the artist dictionary (`~/` is expanded).
    pub fn artists_path(&self) -> PathBuf {
        let raw = &self.dialogue.artists_file;
        if raw.starts_with("~/") || raw.starts_with("~\\") {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(&raw[2..])
        } else {
            PathBuf::from(raw)
        }
    }

    /// Collect every problem with the configuration instead of stopping at
    /// the first one.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(tg) = &self.channels.telegram {
            if tg.enabled && tg.token.trim().is_empty() {
                errors.push("channels.telegram.token is empty but telegram is enabled".to_string());
            }
        }
        if self.catalog.client_id.trim().is_empty() {
            errors.push("catalog.clientId is not set".to_string());
        }
        if self.catalog.client_secret.trim().is_empty() {
            errors.push("catalog.clientSecret is not set".to_string());
        }
        if !self.catalog.api_base.starts_with("http") {
            errors.push(format!("catalog.apiBase is not an http(s) URL: {}", self.catalog.api_base));
        }
        if self.catalog.timeout_seconds == 0 {
            errors.push("catalog.timeoutSeconds must be at least 1".to_string());
        }
        if self.dialogue.artists_file.trim().is_empty() {
            errors.push("dialogue.artistsFile is empty".to_string());
        }
        if self.dialogue.recommendation_limit == 0 {
            errors.push("dialogue.recommendationLimit must be at least 1".to_string());
        }
        if self.dialogue.related_limit == 0 {
            errors.push("dialogue.relatedLimit must be at least 1".to_string());
        }
        if self.dialogue.known_users_capacity == Some(0) {
            errors.push("dialogue.knownUsersCapacity must be at least 1 when set".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Write the default config template to disk.
    pub fn write_default_template() -> anyhow::Result<PathBuf> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = serde_json::json!({
            "channels": {
                "telegram": {
                    "enabled": true,
                    "token": "YOUR_TELEGRAM_BOT_TOKEN",
                    "allowFrom": []
                }
            },
            "catalog": {
                "clientId": "YOUR_SPOTIFY_CLIENT_ID",
                "clientSecret": "YOUR_SPOTIFY_CLIENT_SECRET"
            },
            "dialogue": {
                "artistsFile": "~/.musicbot/artists.txt"
            }
        });

        std::fs::write(&path, serde_json::to_string_pretty(&template)?)?;
        Ok(path)
    }
}

// ── Channels Configuration ──────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: String,
    /// Telegram user ids allowed to talk to the bot; empty allows everyone.
    pub allow_from: Vec<String>,
}

// ── Catalog Configuration ───────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub auth_url: String,
    /// ISO 3166-1 country code passed to artist search.
    pub market: Option<String>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_base: "https://api.spotify.com/v1".into(),
            auth_url: "https://accounts.spotify.com/api/token".into(),
            market: None,
            timeout_seconds: 15,
            max_retries: 3,
        }
    }
}

// ── Dialogue Configuration ──────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogueConfig {
    pub artists_file: String,
    /// Related artists taken per recognized artist.
    pub related_limit: usize,
    /// Lines in a recommendation reply.
    pub recommendation_limit: usize,
    /// Upper bound on remembered senders; unbounded when unset.
    pub known_users_capacity: Option<usize>,
    /// Fixed seed for phrase selection; random when unset.
    pub seed: Option<u64>,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            artists_file: "~/.musicbot/artists.txt".into(),
            related_limit: 10,
            recommendation_limit: 10,
            known_users_capacity: None,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dialogue.related_limit, 10);
        assert_eq!(config.dialogue.recommendation_limit, 10);
        assert_eq!(config.catalog.api_base, "https://api.spotify.com/v1");
        assert!(config.channels.telegram.is_none());
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{
            "channels": {"telegram": {"enabled": true, "token": "123:abc", "allowFrom": ["42"]}},
            "catalog": {"clientId": "id", "clientSecret": "secret", "market": "NL"},
            "dialogue": {"artistsFile": "/srv/artists.txt", "seed": 7}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let tg = config.channels.telegram.as_ref().unwrap();
        assert_eq!(tg.token, "123:abc");
        assert_eq!(tg.allow_from, vec!["42"]);
        assert_eq!(config.catalog.market.as_deref(), Some("NL"));
        assert_eq!(config.catalog.max_retries, 3);
        assert_eq!(config.dialogue.seed, Some(7));
        assert_eq!(config.artists_path(), PathBuf::from("/srv/artists.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let json = r#"{
            "channels": {"telegram": {"enabled": true}},
            "dialogue": {"recommendationLimit": 0, "knownUsersCapacity": 0}
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().any(|e| e.contains("telegram.token")));
        assert!(errors.iter().any(|e| e.contains("clientSecret")));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let json = r#"{"catalog": {"clientId": "id", "clientSecret": "secret", "timeoutSeconds": 0}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["catalog.timeoutSeconds must be at least 1"]);
    }

    #[test]
    fn test_artists_path_expands_home() {
        let config = Config::default();
        let path = config.artists_path();
        assert!(path.ends_with(".musicbot/artists.txt"));
        assert!(!path.to_string_lossy().starts_with('~'));
    }
}
