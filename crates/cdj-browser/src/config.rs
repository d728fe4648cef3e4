//! Configuration for the cdj-browser driver
//!
//! Stored as YAML in the user's config directory.
//! Default location: ~/.config/cdj-browser/config.yaml

use cdj_browser_core::config::{default_config_path, load_config, save_config, BrowserConfig};
use cdj_browser_core::PlayerNumber;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Player whose media is browsed on start-up
    /// Default: 1
    pub player: PlayerNumber,
    /// Catalog fixture answering queries in place of the network
    /// Default: ~/.config/cdj-browser/catalog.yaml
    pub catalog_fixture: PathBuf,
    /// Artificial latency of every catalog reply, in milliseconds
    /// Default: 0
    pub reply_delay_ms: u64,
    /// Navigation engine settings
    pub browser: BrowserConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player: PlayerNumber(1),
            catalog_fixture: default_config_path("catalog.yaml"),
            reply_delay_ms: 0,
            browser: BrowserConfig::default(),
        }
    }
}

/// Load the config, writing the defaults out on first run
///
/// Failing to write them is logged; the defaults are still returned.
pub fn load_or_create(path: &Path) -> AppConfig {
    if path.exists() {
        return load_config(path);
    }
    let config = AppConfig::default();
    match save_config(&config, path) {
        Ok(()) => log::info!("Config: Wrote defaults to {:?}", path),
        Err(e) => log::warn!("Config: Could not write defaults to {:?}: {:#}", path, e),
    }
    config
}

/// Command line overrides
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub player: Option<PlayerNumber>,
    pub fixture: Option<PathBuf>,
}

impl CliArgs {
    /// Parse `--config <path>`, `--player <n>` and `--fixture <path>`
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut cli = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow::anyhow!("{} needs a value", flag))
            };
            match arg.as_str() {
                "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
                "--fixture" => cli.fixture = Some(PathBuf::from(value("--fixture")?)),
                "--player" => cli.player = Some(value("--player")?.parse()?),
                other => anyhow::bail!("unknown argument '{}'", other),
            }
        }
        Ok(cli)
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| default_config_path(CONFIG_FILE))
    }

    /// Apply the overrides on top of the loaded config
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(player) = self.player {
            config.player = player;
        }
        if let Some(fixture) = &self.fixture {
            config.catalog_fixture = fixture.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdj_browser_core::SortMode;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_overrides() {
        let cli = CliArgs::parse(args("--player 3 --fixture demo.yaml")).unwrap();
        assert_eq!(cli.player, Some(PlayerNumber(3)));
        assert_eq!(cli.fixture, Some(PathBuf::from("demo.yaml")));
        assert_eq!(cli.config, None);

        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.player, PlayerNumber(3));
        assert_eq!(config.catalog_fixture, PathBuf::from("demo.yaml"));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(CliArgs::parse(args("--player")).is_err());
        assert!(CliArgs::parse(args("--player nine")).is_err());
        assert!(CliArgs::parse(args("--verbose")).is_err());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.player = PlayerNumber(2);
        config.reply_delay_ms = 150;
        config.browser.default_sort = SortMode::Bpm;
        save_config(&config, &path).unwrap();

        let loaded: AppConfig = load_config(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cdj-browser").join(CONFIG_FILE);

        let config = load_or_create(&path);
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());

        std::fs::write(&path, "player: 3\nreply_delay_ms: 20\n").unwrap();
        let edited = load_or_create(&path);
        assert_eq!(edited.player, PlayerNumber(3));
        assert_eq!(edited.reply_delay_ms, 20);
    }

    #[test]
    fn test_first_run_tolerates_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let config = load_or_create(&blocker.join(CONFIG_FILE));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = serde_yaml::from_str("player: 4\n").unwrap();
        assert_eq!(config.player, PlayerNumber(4));
        assert_eq!(config.reply_delay_ms, 0);
        assert_eq!(config.browser, BrowserConfig::default());
    }
}
