//! Configuration loading and management
//!
//! Configuration comes from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file (path in `INVOICE_DESK_CONFIG`)
//! 3. environment variables (after `.env` has been loaded by `dotenvy`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub extraction: ExtractionConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes (PDF uploads)
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which document store to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Mongodb,
}

/// Document store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub uri: String,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            uri: "mongodb://localhost:27017".to_string(),
            database: "invoices".to_string(),
        }
    }
}

/// Generative model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load `.env`, the optional YAML file, then environment overrides
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let vars: HashMap<String, String> = std::env::vars().collect();
        let base = match vars.get("INVOICE_DESK_CONFIG") {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        base.with_overrides(&vars)
    }

    /// Apply environment-style overrides on top of this configuration
    pub fn with_overrides(mut self, vars: &HashMap<String, String>) -> Result<Self> {
        if let Some(host) = vars.get("SERVER_HOST") {
            self.server.host = host.clone();
        }
        if let Some(port) = vars.get("SERVER_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("SERVER_PORT is not a port number: {}", port))?;
        }
        if let Some(uri) = vars.get("MONGODB_URI") {
            self.storage.uri = uri.clone();
            self.storage.backend = StorageBackend::Mongodb;
        }
        if let Some(database) = vars.get("MONGODB_DATABASE") {
            self.storage.database = database.clone();
        }
        if let Some(key) = vars.get("GEMINI_API_KEY") {
            self.extraction.api_key = key.clone();
        }
        if let Some(model) = vars.get("GEMINI_MODEL") {
            self.extraction.model = model.clone();
        }
        if let Some(url) = vars.get("GEMINI_BASE_URL") {
            self.extraction.base_url = url.clone();
        }
        Ok(self)
    }
}
