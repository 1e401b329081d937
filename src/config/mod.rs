//! Application configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Complete application configuration.
///
/// Every section has defaults so the service runs standalone; a YAML file
/// overrides whatever it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub sessions: SessionConfig,
    pub uploads: UploadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            pagination: PaginationConfig::default(),
            sessions: SessionConfig::default(),
            uploads: UploadConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when the client sends no `take` header
    pub default_page_size: i64,

    /// Hard ceiling on requested page sizes; larger requests are clamped
    pub max_page_size: usize,

    /// Server-chosen page size for the comments block in post details
    pub comments_page_size: usize,

    /// Result cap for title search
    pub search_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            comments_page_size: 20,
            search_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions expire this many seconds after creation; absent means
    /// they live until revoked
    pub ttl_seconds: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: Some(30 * 24 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes
    pub max_bytes: u64,

    /// Accepted content types for post media
    pub allowed_types: Vec<String>,

    /// Bucket name media is stored under
    pub bucket: String,

    /// Base URL public media links are built from
    pub public_base_url: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: 50 * (1 << 20),
            allowed_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            bucket: "user-post".to_string(),
            public_base_url: "http://localhost:8000/media".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
