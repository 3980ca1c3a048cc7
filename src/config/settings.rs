use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{EnarvaError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnarvaConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub retention: RetentionConfig,
    pub realtime: RealtimeConfig,
    pub push: PushConfig,
}

impl EnarvaConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        let config: Self = if path.exists() {
            let content = fs::read_to_string(path).await?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| EnarvaError::Config(e.to_string()))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Validate configuration values for consistency.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be greater than 0");
        }
        if self.retention.activity_days == 0 {
            errors.push("retention.activity_days must be greater than 0");
        }
        if self.realtime.channel_capacity == 0 {
            errors.push("realtime.channel_capacity must be greater than 0");
        }
        if self.push.endpoint.is_some() != self.push.api_key.is_some() {
            errors.push("push.endpoint and push.api_key must be set together");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(EnarvaError::Config(errors.join("; ")))
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
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("enarva.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Activity rows older than this are removed by the retention sweep.
    pub activity_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { activity_days: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Capacity of the in-process broadcast channel. Subscribers that fall
    /// behind by more than this many events see a lag error.
    pub channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

/// Push-notification provider settings. When either field is unset the
/// push sender is skipped entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}
