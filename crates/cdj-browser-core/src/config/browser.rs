//! Navigation engine settings

use crate::types::{PlayerNumber, SortMode, DEFAULT_LOAD_TARGETS};
use serde::{Deserialize, Serialize};

/// Settings read by [`NavigationEngine`](crate::browser::NavigationEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Sort mode used for the first title listing
    /// Default: default (catalog order)
    pub default_sort: SortMode,

    /// Players offered as "load into" targets
    /// Availability is re-checked against the client registry after each click.
    /// Default: players 1-4
    pub load_targets: Vec<PlayerNumber>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            default_sort: SortMode::Default,
            load_targets: DEFAULT_LOAD_TARGETS.iter().copied().map(PlayerNumber).collect(),
        }
    }
}
