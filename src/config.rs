//! Configuration Management
//!
//! Handles persistent configuration storage for starship.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Last API root that loaded successfully
    #[serde(default)]
    pub last_url: Option<String>,
    /// Extra headers sent with every request (e.g. Authorization)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("starship").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;

        Ok(())
    }

    /// Get effective root URL (CLI > config)
    pub fn effective_url(&self, cli_url: Option<&str>) -> Option<String> {
        cli_url
            .map(String::from)
            .or_else(|| self.last_url.clone())
    }

    /// Configured headers merged with `Name: value` strings from the CLI.
    /// CLI values win on name clashes.
    pub fn effective_headers(&self, cli_headers: &[String]) -> Result<Vec<(String, String)>> {
        let mut headers = self.headers.clone();
        for raw in cli_headers {
            let (name, value) = parse_header(raw)?;
            headers.insert(name, value);
        }
        Ok(headers.into_iter().collect())
    }

    /// Remember the root URL and save
    pub fn set_last_url(&mut self, url: &str) -> Result<()> {
        self.last_url = Some(url.to_string());
        self.save()
    }
}

/// Parse a `Name: value` header argument
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("Header must look like 'Name: value', got '{}'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Header name is empty in '{}'", raw);
    }

    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Authorization: Bearer abc").unwrap(),
            ("Authorization".to_string(), "Bearer abc".to_string())
        );
        assert_eq!(
            parse_header("X-Url:http://a:b").unwrap(),
            ("X-Url".to_string(), "http://a:b".to_string())
        );
        assert!(parse_header("no-colon").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_effective_url_prefers_cli() {
        let config = Config {
            last_url: Some("https://saved.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.effective_url(Some("https://cli.example.com/")).as_deref(),
            Some("https://cli.example.com/")
        );
        assert_eq!(
            config.effective_url(None).as_deref(),
            Some("https://saved.example.com/")
        );
        assert_eq!(Config::default().effective_url(None), None);
    }

    #[test]
    fn test_effective_headers_cli_overrides() {
        let mut config = Config::default();
        config
            .headers
            .insert("Authorization".to_string(), "Bearer old".to_string());
        config
            .headers
            .insert("X-Client".to_string(), "starship".to_string());

        let headers = config
            .effective_headers(&["Authorization: Bearer new".to_string()])
            .unwrap();

        assert_eq!(
            headers,
            vec![
                ("Authorization".to_string(), "Bearer new".to_string()),
                ("X-Client".to_string(), "starship".to_string()),
            ]
        );
    }

    #[test]
    fn test_save_and_load_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("starship-config-{}", std::process::id()));
        let path = dir.join("config.json");

        let mut config = Config::default();
        config.last_url = Some("https://api.example.com/".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_or_malformed_falls_back() {
        let dir = std::env::temp_dir().join(format!("starship-bad-{}", std::process::id()));
        let path = dir.join("config.json");
        assert_eq!(Config::load_from(&path), Config::default());

        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
