use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// The provider returns at most this many videos per request.
pub const MAX_VIDEOS_PER_REQUEST: u32 = 50;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    pub log_format: LogFormat,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/insight.db".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a channel's video snapshot is served before refetching.
    pub video_max_age_hours: u32,

    /// How long an analysis result is served before recomputing.
    pub analysis_max_age_hours: u32,

    pub max_videos_per_channel: u32,

    /// Serve the last stored result, marked stale, when the provider fails.
    pub serve_stale_on_error: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            video_max_age_hours: 24,
            analysis_max_age_hours: 24,
            max_videos_per_channel: MAX_VIDEOS_PER_REQUEST,
            serve_stale_on_error: false,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn video_max_age(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.video_max_age_hours))
    }

    #[must_use]
    pub fn analysis_max_age(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.analysis_max_age_hours))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = match paths.iter().find(|p| p.exists()) {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                Self::load_from_path(path)?
            }
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// `INSIGHT_DATABASE_PATH` and `INSIGHT_LOG_LEVEL` win over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("INSIGHT_DATABASE_PATH").filter(|v| !v.is_empty()) {
            self.general.database_path = path;
        }
        if let Some(level) = lookup("INSIGHT_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.general.log_level = level;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("insight").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".insight").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.video_max_age_hours == 0 || self.cache.analysis_max_age_hours == 0 {
            anyhow::bail!("Cache max ages must be > 0 hours");
        }

        if self.cache.max_videos_per_channel == 0
            || self.cache.max_videos_per_channel > MAX_VIDEOS_PER_REQUEST
        {
            anyhow::bail!(
                "max_videos_per_channel must be between 1 and {MAX_VIDEOS_PER_REQUEST}"
            );
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("min_db_connections cannot exceed max_db_connections");
        }

        Ok(())
    }
}
