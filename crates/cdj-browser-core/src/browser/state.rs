//! Where the browser currently is

use crate::types::{ItemId, MenuKind, PlayerNumber, Slot, SortMode};

/// Playlist folder id of the top level
pub const ROOT_FOLDER: ItemId = 0;

/// Ids captured while descending
///
/// Not a stack: each descent overwrites the field it owns, and the back
/// table reads whatever the current menu's branch last wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selectors {
    pub artist_id: Option<ItemId>,
    pub genre_id: Option<ItemId>,
    pub album_id: Option<ItemId>,
    pub playlist_folder_id: Option<ItemId>,
    pub playlist_id: Option<ItemId>,
    /// Folder whose contents the last playlist listing showed
    pub listed_folder_id: Option<ItemId>,
    /// Set by a metadata reply; required to load a track
    pub track_id: Option<ItemId>,
}

impl Selectors {
    /// Current playlist folder, the root folder if none was entered
    pub fn folder(&self) -> ItemId {
        self.playlist_folder_id.unwrap_or(ROOT_FOLDER)
    }

    /// Folder on screen, the root folder before any listing
    pub fn listed_folder(&self) -> ItemId {
        self.listed_folder_id.unwrap_or(ROOT_FOLDER)
    }

    /// Current playlist, the root sentinel if none was opened
    pub fn playlist(&self) -> ItemId {
        self.playlist_id.unwrap_or(ROOT_FOLDER)
    }
}

/// Navigation state of one browser instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Player whose catalog is browsed; switching players builds a new state
    pub player: PlayerNumber,
    /// Set once a slot's root menu has been shown
    pub slot: Option<Slot>,
    pub menu: MenuKind,
    pub sort: SortMode,
    pub selectors: Selectors,
}

impl NavigationState {
    pub fn new(player: PlayerNumber, sort: SortMode) -> Self {
        Self {
            player,
            slot: None,
            menu: MenuKind::MediaOverview,
            sort,
            selectors: Selectors::default(),
        }
    }

    /// Back to the media overview, forgetting slot and selectors
    pub fn reset_to_media_overview(&mut self) {
        self.menu = MenuKind::MediaOverview;
        self.slot = None;
        self.selectors = Selectors::default();
    }
}
