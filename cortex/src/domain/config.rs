// Copyright (c) 2026 LogLens Contributors
// SPDX-License-Identifier: AGPL-3.0

// Cortex Configuration
//
// Tuning knobs for the learning loop and the persistence gateway:
// - Correlation sample threshold and opportunity confidence gate
// - Temporal decay window and factor
// - State file location, I/O timeout and flush strategy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CortexConfig {
    #[serde(default)]
    pub learning: LearningConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Minimum observations before a cause is classified
    #[serde(default = "default_pattern_threshold")]
    pub pattern_threshold: usize,

    /// Patterns above this confidence are optimization candidates
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Idle days after which a pattern decays
    #[serde(default = "default_decay_after_days")]
    pub decay_after_days: i64,

    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,

    /// Most recent observations used for a cause's success rate
    #[serde(default = "default_correlation_window")]
    pub correlation_window: usize,

    /// Window for counting a pattern as active
    #[serde(default = "default_active_window_days")]
    pub active_window_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushMode {
    /// Save after every processed classification
    Sync,
    /// Mark dirty and let the background flusher save
    Background,
}

impl std::str::FromStr for FlushMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sync" => Ok(FlushMode::Sync),
            "background" => Ok(FlushMode::Background),
            other => Err(format!("unknown flush mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    #[serde(default = "default_save_timeout_ms")]
    pub save_timeout_ms: u64,

    #[serde(default = "default_flush_mode")]
    pub flush_mode: FlushMode,

    #[serde(default = "default_flush_interval")]
    pub flush_interval_seconds: u64,
}

impl LearningConfig {
    /// Idle time after which a pattern decays
    pub fn decay_after(&self) -> chrono::Duration {
        days_or_max(self.decay_after_days)
    }

    pub fn active_window(&self) -> chrono::Duration {
        days_or_max(self.active_window_days)
    }
}

/// Day counts beyond what chrono can represent saturate instead of panicking
fn days_or_max(days: i64) -> chrono::Duration {
    chrono::Duration::try_days(days).unwrap_or(chrono::Duration::MAX)
}

impl PersistenceConfig {
    pub fn save_timeout(&self) -> Duration {
        Duration::from_millis(self.save_timeout_ms)
    }
}

fn default_pattern_threshold() -> usize {
    3
}

fn default_confidence_threshold() -> f64 {
    0.7
}

fn default_decay_after_days() -> i64 {
    7
}

fn default_decay_factor() -> f64 {
    0.95
}

fn default_correlation_window() -> usize {
    10
}

fn default_active_window_days() -> i64 {
    7
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./loglens-intelligence.json")
}

fn default_save_timeout_ms() -> u64 {
    5000
}

fn default_flush_mode() -> FlushMode {
    FlushMode::Sync
}

fn default_flush_interval() -> u64 {
    30
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            pattern_threshold: default_pattern_threshold(),
            confidence_threshold: default_confidence_threshold(),
            decay_after_days: default_decay_after_days(),
            decay_factor: default_decay_factor(),
            correlation_window: default_correlation_window(),
            active_window_days: default_active_window_days(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            save_timeout_ms: default_save_timeout_ms(),
            flush_mode: default_flush_mode(),
            flush_interval_seconds: default_flush_interval(),
        }
    }
}

impl CortexConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Discover configuration file using precedence order
    /// 1. LOGLENS_CONFIG_PATH environment variable
    /// 2. ./loglens-config.yaml (working directory)
    /// 3. ~/.loglens/config.yaml (user home)
    /// 4. /etc/loglens/config.yaml (system, Unix)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LOGLENS_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./loglens-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".loglens").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        {
            let system_config = PathBuf::from("/etc/loglens/config.yaml");
            if system_config.exists() {
                return Some(system_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit path must load
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LOGLENS_STATE_PATH") {
            if !val.is_empty() {
                tracing::info!("Environment override: LOGLENS_STATE_PATH={}", val);
                self.persistence.state_path = PathBuf::from(val);
            }
        }

        if let Ok(val) = std::env::var("LOGLENS_FLUSH_MODE") {
            match val.parse::<FlushMode>() {
                Ok(mode) => {
                    tracing::info!("Environment override: LOGLENS_FLUSH_MODE={:?}", mode);
                    self.persistence.flush_mode = mode;
                }
                Err(e) => {
                    tracing::warn!("Invalid value for LOGLENS_FLUSH_MODE: {}. Ignoring.", e);
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let learning = &self.learning;

        if learning.pattern_threshold == 0 {
            anyhow::bail!("learning.pattern_threshold must be at least 1");
        }

        if !(learning.confidence_threshold > 0.0 && learning.confidence_threshold <= 1.0) {
            anyhow::bail!(
                "learning.confidence_threshold must be in (0, 1], got {}",
                learning.confidence_threshold
            );
        }

        if !(learning.decay_factor > 0.0 && learning.decay_factor <= 1.0) {
            anyhow::bail!(
                "learning.decay_factor must be in (0, 1], got {}",
                learning.decay_factor
            );
        }

        if learning.decay_after_days < 0 {
            anyhow::bail!("learning.decay_after_days cannot be negative");
        }

        if chrono::Duration::try_days(learning.decay_after_days).is_none() {
            anyhow::bail!(
                "learning.decay_after_days is out of range, got {}",
                learning.decay_after_days
            );
        }

        if learning.correlation_window == 0 {
            anyhow::bail!("learning.correlation_window must be at least 1");
        }

        if learning.active_window_days <= 0 {
            anyhow::bail!("learning.active_window_days must be positive");
        }

        if chrono::Duration::try_days(learning.active_window_days).is_none() {
            anyhow::bail!(
                "learning.active_window_days is out of range, got {}",
                learning.active_window_days
            );
        }

        if self.persistence.state_path.as_os_str().is_empty() {
            anyhow::bail!("persistence.state_path cannot be empty");
        }

        if self.persistence.save_timeout_ms == 0 {
            anyhow::bail!("persistence.save_timeout_ms must be positive");
        }

        if self.persistence.flush_mode == FlushMode::Background
            && self.persistence.flush_interval_seconds == 0
        {
            anyhow::bail!("persistence.flush_interval_seconds must be positive in background mode");
        }

        Ok(())
    }
}
