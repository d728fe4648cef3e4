//! Standard locations for configuration files

use std::path::PathBuf;

const APP_DIR: &str = "cdj-browser";

/// Per-user config directory
///
/// Returns `{config_dir}/cdj-browser`, falling back to the working directory
/// when the platform has no config dir.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Default path of a config file (e.g. "config.yaml")
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_app_dir() {
        assert!(default_config_dir().ends_with(APP_DIR));
    }

    #[test]
    fn test_config_path_includes_filename() {
        let path = default_config_path("test.yaml");
        assert!(path.ends_with("test.yaml"));
        assert!(path.parent().is_some_and(|p| p.ends_with(APP_DIR)));
    }
}
