//! Configuration persistence
//!
//! Stores user preferences in `~/.config/glance/config.yaml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DiskCacheConfig;

/// Glance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlanceConfig {
    /// Theme id used when none is requested (e.g., "dark", "github-light")
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Highlighting budget per preview, in milliseconds
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Documents with more lines than this are shown unstyled
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Entry bound of the in-process cache tier
    #[serde(default = "default_memory_entries")]
    pub memory_entries: usize,

    /// Override for the shared highlight cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    #[serde(default)]
    pub disk: DiskSettings,
}

/// Disk tier settings as they appear in `config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_disk_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_disk_max_bytes")]
    pub max_bytes: u64,
    /// Run the cleanup sweep after this many writes
    #[serde(default = "default_cleanup_every")]
    pub cleanup_every: usize,
}

fn default_theme() -> String {
    crate::theme::FALLBACK_THEME_ID.to_string()
}

fn default_deadline_ms() -> u64 {
    500
}

fn default_max_lines() -> usize {
    10_000
}

fn default_memory_entries() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_disk_max_entries() -> usize {
    500
}

fn default_disk_max_bytes() -> u64 {
    64 * 1024 * 1024
}

fn default_cleanup_every() -> usize {
    20
}

impl Default for DiskSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_entries: default_disk_max_entries(),
            max_bytes: default_disk_max_bytes(),
            cleanup_every: default_cleanup_every(),
        }
    }
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            deadline_ms: default_deadline_ms(),
            max_lines: default_max_lines(),
            memory_entries: default_memory_entries(),
            cache_dir: None,
            disk: DiskSettings::default(),
        }
    }
}

impl GlanceConfig {
    /// Load config from the user config directory, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`; missing or unparseable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the user config directory
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Resolved shared cache directory (env var, then config, then default)
    pub fn resolved_cache_dir(&self) -> Option<PathBuf> {
        crate::config_paths::cache_dir(self.cache_dir.as_deref())
    }

    /// Disk tier configuration, or `None` when the disk tier is disabled or
    /// no cache directory can be resolved
    pub fn disk_cache_config(&self) -> Option<DiskCacheConfig> {
        if !self.disk.enabled {
            return None;
        }
        let dir = self.resolved_cache_dir()?;
        Some(DiskCacheConfig {
            dir,
            max_entries: self.disk.max_entries,
            max_bytes: self.disk.max_bytes,
            cleanup_every: self.disk.cleanup_every,
        })
    }
}
