//! Centralized filesystem locations for glance
//!
//! Config files live under:
//! - Unix/macOS: `~/.config/glance/`
//! - Windows: `%APPDATA%\glance\`
//!
//! The highlight cache lives under the user cache directory so that every
//! glance process of the same user resolves the same path.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "glance";

/// Environment variable overriding the shared highlight cache directory
pub const CACHE_DIR_ENV: &str = "GLANCE_CACHE_DIR";

/// Base config directory for glance
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/glance`
///   - Else: `~/.config/glance`
///
/// Windows:
///   - `%APPDATA%\glance`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/glance/themes/`
pub fn themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

/// `~/.config/glance/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/glance/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Default shared highlight cache directory
///
/// Unix/macOS:
///   - If XDG_CACHE_HOME is set: `$XDG_CACHE_HOME/glance/highlights`
///   - Else: `~/.cache/glance/highlights`
///
/// Windows:
///   - `%LOCALAPPDATA%\glance\highlights`
pub fn default_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("LOCALAPPDATA")
            .ok()
            .map(|local| PathBuf::from(local).join(APP_DIR).join("highlights"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .map(|cache| cache.join(APP_DIR).join("highlights"))
    }
}

/// Resolve the highlight cache directory
///
/// `GLANCE_CACHE_DIR` wins over the configured override, which wins over the
/// default location.
pub fn cache_dir(configured: Option<&Path>) -> Option<PathBuf> {
    env::var_os(CACHE_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| configured.map(Path::to_path_buf))
        .or_else(default_cache_dir)
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let logs = config.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdirectories_hang_off_config_dir() {
        if let Some(base) = config_dir() {
            assert_eq!(themes_dir(), Some(base.join("themes")));
            assert_eq!(logs_dir(), Some(base.join("logs")));
            assert_eq!(config_file(), Some(base.join("config.yaml")));
        }
    }

    #[test]
    fn test_configured_cache_dir_used_without_env() {
        if env::var_os(CACHE_DIR_ENV).is_some() {
            return;
        }
        let configured = Path::new("/srv/glance-cache");
        assert_eq!(cache_dir(Some(configured)), Some(configured.to_path_buf()));
    }

    #[test]
    fn test_default_cache_dir_is_stable() {
        assert_eq!(default_cache_dir(), default_cache_dir());
        if let Some(dir) = default_cache_dir() {
            assert!(dir.ends_with(Path::new("glance").join("highlights")));
        }
    }
}
