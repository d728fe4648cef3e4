//! Generic YAML configuration I/O
//!
//! Works with any serializable configuration type.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load configuration from a YAML file
///
/// A missing file yields the default config. An unreadable or invalid file
/// is logged and also yields the default config.
///
/// ```ignore
/// let config: AppConfig = load_config(Path::new("config.yaml"));
/// ```
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return T::default();
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("load_config: Failed to read {:?}: {}, using defaults", path, e);
            return T::default();
        }
    };

    match serde_yaml::from_str::<T>(&contents) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("load_config: Failed to parse {:?}: {}, using defaults", path, e);
            T::default()
        }
    }
}

/// Save configuration to a YAML file, creating parent directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrowserConfig;
    use crate::types::{PlayerNumber, SortMode};

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config: BrowserConfig = load_config(Path::new("/nonexistent/path/config.yaml"));
        assert_eq!(config, BrowserConfig::default());
    }

    #[test]
    fn test_invalid_yaml_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "default_sort: [not, a, sort]\n").unwrap();

        let config: BrowserConfig = load_config(&path);
        assert_eq!(config, BrowserConfig::default());
    }

    #[test]
    fn test_roundtrip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("browser.yaml");

        let config = BrowserConfig {
            default_sort: SortMode::Bpm,
            load_targets: vec![PlayerNumber(1), PlayerNumber(3)],
        };

        save_config(&config, &path).unwrap();
        let loaded: BrowserConfig = load_config(&path);

        assert_eq!(loaded, config);
    }
}
