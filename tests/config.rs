//! Configuration system tests
//!
//! Tests for config paths and config.yaml loading.

use std::path::{Path, PathBuf};

use glance::config::GlanceConfig;
use glance::config_paths;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_contains_glance() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.ends_with("glance"));
}

#[test]
fn test_files_live_under_config_dir() {
    let dir = config_paths::config_dir().unwrap();
    assert_eq!(config_paths::config_file().unwrap(), dir.join("config.yaml"));
    assert_eq!(config_paths::themes_dir().unwrap(), dir.join("themes"));
    assert_eq!(config_paths::logs_dir().unwrap(), dir.join("logs"));
}

#[test]
fn test_default_cache_dir_is_shared_location() {
    let dir = config_paths::default_cache_dir().unwrap();
    assert!(dir.ends_with(Path::new("glance").join("highlights")));
}

#[test]
fn test_configured_cache_dir_used_without_env_override() {
    if std::env::var_os(config_paths::CACHE_DIR_ENV).is_some() {
        return;
    }
    let configured = PathBuf::from("/srv/glance-cache");
    assert_eq!(
        config_paths::cache_dir(Some(&configured)),
        Some(configured.clone())
    );
    assert_eq!(
        config_paths::cache_dir(None),
        config_paths::default_cache_dir()
    );
}

// ========================================================================
// GlanceConfig Tests
// ========================================================================

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = GlanceConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(config, GlanceConfig::default());
}

#[test]
fn test_disk_settings_flow_into_cache_config() {
    if std::env::var_os(config_paths::CACHE_DIR_ENV).is_some() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let cache = dir.path().join("cache");
    std::fs::write(
        &path,
        format!(
            "theme: github-dark\ndeadline_ms: 75\ncache_dir: {}\ndisk:\n  max_entries: 12\n  max_bytes: 4096\n  cleanup_every: 3\n",
            cache.display()
        ),
    )
    .unwrap();

    let config = GlanceConfig::load_from(&path);
    assert_eq!(config.theme, "github-dark");
    assert_eq!(config.deadline_ms, 75);

    let disk = config.disk_cache_config().unwrap();
    assert_eq!(disk.dir, cache);
    assert_eq!(disk.max_entries, 12);
    assert_eq!(disk.max_bytes, 4096);
    assert_eq!(disk.cleanup_every, 3);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config: GlanceConfig = serde_yaml::from_str("theme: light\nfuture_option: 1\n").unwrap();
    assert_eq!(config.theme, "light");
}
