//! Configuration shared by browser front ends
//!
//! - Generic YAML config loading/saving
//! - Per-user config path lookup
//! - [`BrowserConfig`], the engine's own settings
//!
//! # Usage
//!
//! ```ignore
//! use cdj_browser_core::config::{default_config_path, load_config, save_config};
//!
//! let path = default_config_path("config.yaml");
//! let config: MyAppConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod browser;
mod io;
mod paths;

pub use browser::BrowserConfig;
pub use io::{load_config, save_config};
pub use paths::{default_config_dir, default_config_path};
