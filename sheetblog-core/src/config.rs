//! Config Store - Persisted Form Values
//!
//! Loaded once at startup and written only on an explicit save.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::worker::WorkerConfig;

pub const DEFAULT_CONFIG_FILE: &str = "app_config.json";

pub const MIN_POSTS_PER_PAGE: u32 = 1;
pub const MAX_POSTS_PER_PAGE: u32 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub cf_api_token: String,
    pub cf_account_id: String,
    pub worker_name_prefix: String,
    pub auto_generate_name: bool,
    pub blog_title: String,
    pub blog_description: String,
    pub blog_keywords: String,
    pub posts_per_page: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: "WEBSITE".to_string(),
            cf_api_token: String::new(),
            cf_account_id: String::new(),
            worker_name_prefix: "blog".to_string(),
            auto_generate_name: true,
            blog_title: "My Blog".to_string(),
            blog_description: "A simple blog powered by Google Sheets".to_string(),
            blog_keywords: "blog, articles, google sheets".to_string(),
            posts_per_page: 6,
        }
    }
}

impl AppConfig {
    pub const KEYS: [&'static str; 10] = [
        "spreadsheet_id",
        "sheet_name",
        "cf_api_token",
        "cf_account_id",
        "worker_name_prefix",
        "auto_generate_name",
        "blog_title",
        "blog_description",
        "blog_keywords",
        "posts_per_page",
    ];

    /// Assign one field from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        match key {
            "spreadsheet_id" => self.spreadsheet_id = value.trim().to_string(),
            "sheet_name" => self.sheet_name = value.to_string(),
            "cf_api_token" => self.cf_api_token = value.trim().to_string(),
            "cf_account_id" => self.cf_account_id = value.trim().to_string(),
            "worker_name_prefix" => self.worker_name_prefix = value.trim().to_string(),
            "auto_generate_name" => {
                self.auto_generate_name = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected true or false"))?;
            }
            "blog_title" => self.blog_title = value.to_string(),
            "blog_description" => self.blog_description = value.to_string(),
            "blog_keywords" => self.blog_keywords = value.to_string(),
            "posts_per_page" => {
                let n: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected an integer"))?;
                if !(MIN_POSTS_PER_PAGE..=MAX_POSTS_PER_PAGE).contains(&n) {
                    return Err(invalid("must be between 1 and 20"));
                }
                self.posts_per_page = n;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            spreadsheet_id: self.spreadsheet_id.clone(),
            sheet_name: self.sheet_name.clone(),
            blog_title: self.blog_title.clone(),
            blog_description: self.blog_description.clone(),
            blog_keywords: self.blog_keywords.clone(),
        }
    }
}

/// Reads and writes [`AppConfig`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Missing file gives defaults. A corrupt file is logged and also gives defaults.
    pub fn load(&self) -> AppConfig {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return AppConfig::default(),
            Err(e) => {
                log::warn!("Cannot read config {}: {}", self.path.display(), e);
                return AppConfig::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => {
                log::info!("Loaded config from {}", self.path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed config {}: {}", self.path.display(), e);
                AppConfig::default()
            }
        }
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Saved config to {}", self.path.display());
        Ok(())
    }

    /// Deletes the config file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, ConfigError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::info!("Cleared config {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ConfigError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}
