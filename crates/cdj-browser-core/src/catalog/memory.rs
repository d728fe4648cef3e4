//! In-memory catalog backed by a YAML fixture
//!
//! Stands in for a player's remote database. Each player number maps to up
//! to two slot catalogs; every [`CatalogQuery`] is answered from them with
//! the same record shapes a player returns (name/title first, ids last).
//!
//! Fixture layout:
//!
//! ```yaml
//! online: [1, 3]            # players without a catalog
//! players:
//!   - number: 2
//!     usb:
//!       info: { name: SANDISK, track_count: 2, ... }
//!       artists: [{ id: 1, name: Daft Punk }]
//!       albums:  [{ id: 10, name: Discovery }]
//!       genres:  [{ id: 5, name: House }]
//!       tracks:  [{ id: 100, title: One More Time, artist_id: 1, album_id: 10, genre_id: 5, bpm: 122.7 }]
//!       playlists:
//!         - { id: 10, name: Sets, folder: true }
//!         - { id: 30, name: Peak, parent: 10, tracks: [100] }
//! ```

use super::{
    CatalogError, CatalogQuery, CatalogRequest, Record, ReplyPayload, Value, MENU_NAME_CLOSE,
    MENU_NAME_OPEN,
};
use crate::clients::{ClientInfo, MediaInfo, SlotStatus, StaticRegistry};
use crate::types::{ItemId, PlayerNumber, Slot, SortMode};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Folder id of the top-level playlist folder
const ROOT_FOLDER: ItemId = 0;

/// Categories offered when a slot doesn't list its own
const DEFAULT_ROOT_MENU: [&str; 5] = ["TRACK", "ARTIST", "ALBUM", "GENRE", "PLAYLIST"];

/// Track fields in the order a metadata reply carries them
const TRACK_FIELDS: [&str; 9] = [
    "title", "artist", "album", "genre", "bpm", "key", "rating", "duration", "comment",
];

/// Errors loading a catalog fixture
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("failed to read catalog fixture {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog fixture: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("player {0} appears more than once")]
    DuplicatePlayer(PlayerNumber),

    #[error("player {player} {slot}: {what} {id} is referenced but not defined")]
    DanglingReference {
        player: PlayerNumber,
        slot: Slot,
        what: &'static str,
        id: ItemId,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFixture {
    players: Vec<PlayerFixture>,
    online: Vec<PlayerNumber>,
}

#[derive(Debug, Deserialize)]
struct PlayerFixture {
    number: PlayerNumber,
    #[serde(default)]
    usb: Option<SlotCatalog>,
    #[serde(default)]
    sd: Option<SlotCatalog>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SlotCatalog {
    info: MediaInfo,
    root_menu: Vec<String>,
    artists: Vec<NamedEntry>,
    albums: Vec<NamedEntry>,
    genres: Vec<NamedEntry>,
    tracks: Vec<TrackEntry>,
    playlists: Vec<PlaylistEntry>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    id: ItemId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TrackEntry {
    id: ItemId,
    title: String,
    artist_id: Option<ItemId>,
    album_id: Option<ItemId>,
    genre_id: Option<ItemId>,
    bpm: Option<f64>,
    key: Option<String>,
    rating: Option<u8>,
    duration: Option<u32>,
    comment: Option<String>,
}

/// Playlist tree node; folders and playlists share one id space
#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    id: ItemId,
    name: String,
    #[serde(default)]
    parent: ItemId,
    #[serde(default)]
    folder: bool,
    #[serde(default)]
    tracks: Vec<ItemId>,
}

/// Catalogs of every player in a fixture
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    slots: HashMap<(PlayerNumber, Slot), SlotCatalog>,
    players: Vec<PlayerNumber>,
    online: Vec<PlayerNumber>,
}

impl MemoryCatalog {
    /// Load a fixture file
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml(&yaml)?;
        log::info!(
            "MemoryCatalog: Loaded {} slot catalogs for {} players from {:?}",
            catalog.slots.len(),
            catalog.players.len(),
            path
        );
        Ok(catalog)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: CatalogFixture = serde_yaml::from_str(yaml)?;
        Self::from_fixture(fixture)
    }

    fn from_fixture(fixture: CatalogFixture) -> Result<Self, FixtureError> {
        let mut catalog = MemoryCatalog {
            online: fixture.online,
            ..Default::default()
        };

        for player in fixture.players {
            if catalog.players.contains(&player.number) {
                return Err(FixtureError::DuplicatePlayer(player.number));
            }
            catalog.players.push(player.number);

            for (slot, slot_catalog) in [(Slot::Usb, player.usb), (Slot::Sd, player.sd)] {
                if let Some(slot_catalog) = slot_catalog {
                    slot_catalog.validate(player.number, slot)?;
                    catalog.slots.insert((player.number, slot), slot_catalog);
                }
            }
        }

        Ok(catalog)
    }

    /// Players that expose a catalog
    pub fn players(&self) -> &[PlayerNumber] {
        &self.players
    }

    /// Registry snapshot of every player in the fixture
    ///
    /// Players listed under `online` appear with both slots empty.
    pub fn registry(&self) -> StaticRegistry {
        let registry = StaticRegistry::new();
        for &player in &self.online {
            registry.insert(player, ClientInfo::default());
        }
        for &player in &self.players {
            let mut info = ClientInfo::default();
            for slot in Slot::ALL {
                if let Some(slot_catalog) = self.slots.get(&(player, slot)) {
                    *info.slot_mut(slot) = SlotStatus::Loaded(slot_catalog.info.clone());
                }
            }
            registry.insert(player, info);
        }
        registry
    }

    /// Check that a request could be answered, without evaluating it
    pub fn check(&self, player: PlayerNumber, slot: Slot) -> Result<(), CatalogError> {
        self.slot_catalog(player, slot).map(|_| ())
    }

    fn slot_catalog(&self, player: PlayerNumber, slot: Slot) -> Result<&SlotCatalog, CatalogError> {
        if !self.players.contains(&player) {
            return Err(CatalogError::UnknownPlayer(player));
        }
        self.slots
            .get(&(player, slot))
            .ok_or(CatalogError::SlotNotLoaded { player, slot })
    }

    /// Evaluate a request against the fixture
    pub fn answer(&self, request: &CatalogRequest) -> Result<ReplyPayload, CatalogError> {
        let catalog = self.slot_catalog(request.player, request.slot)?;

        let listing = match request.query {
            CatalogQuery::RootMenu => catalog.root_menu(),
            CatalogQuery::Titles { sort } => catalog.titles(|_| true, sort),
            CatalogQuery::Artists { .. } => catalog.named(&catalog.artists, "artist_id", |_| true),
            CatalogQuery::AlbumsByArtist { artist_id, .. } => {
                catalog.require(&catalog.artists, "artist", artist_id)?;
                let albums = catalog.related(|t| t.artist_id == Some(artist_id), |t| t.album_id);
                catalog.named(&catalog.albums, "album_id", |a| albums.contains(&a.id))
            }
            CatalogQuery::TitlesByArtistAlbum {
                artist_id,
                album_id,
                sort,
            } => catalog.titles(
                |t| t.artist_id == Some(artist_id) && t.album_id == Some(album_id),
                sort,
            ),
            CatalogQuery::Albums { .. } => catalog.named(&catalog.albums, "album_id", |_| true),
            CatalogQuery::TitlesByAlbum { album_id, sort } => {
                catalog.require(&catalog.albums, "album", album_id)?;
                catalog.titles(|t| t.album_id == Some(album_id), sort)
            }
            CatalogQuery::Genres => catalog.named(&catalog.genres, "genre_id", |_| true),
            CatalogQuery::ArtistsByGenre { genre_id } => {
                catalog.require(&catalog.genres, "genre", genre_id)?;
                let artists = catalog.related(|t| t.genre_id == Some(genre_id), |t| t.artist_id);
                catalog.named(&catalog.artists, "artist_id", |a| artists.contains(&a.id))
            }
            CatalogQuery::AlbumsByGenreArtist {
                genre_id,
                artist_id,
            } => {
                let albums = catalog.related(
                    |t| t.genre_id == Some(genre_id) && t.artist_id == Some(artist_id),
                    |t| t.album_id,
                );
                catalog.named(&catalog.albums, "album_id", |a| albums.contains(&a.id))
            }
            CatalogQuery::TitlesByGenreArtistAlbum {
                genre_id,
                artist_id,
                album_id,
            } => catalog.titles(
                |t| {
                    t.genre_id == Some(genre_id)
                        && t.artist_id == Some(artist_id)
                        && t.album_id == Some(album_id)
                },
                SortMode::Default,
            ),
            CatalogQuery::Playlists { folder_id } => catalog.folder_contents(folder_id)?,
            CatalogQuery::Playlist { playlist_id, sort } => {
                catalog.playlist_tracks(playlist_id, sort)?
            }
            CatalogQuery::Metadata { track_id } => {
                return catalog.metadata(track_id).map(ReplyPayload::Metadata);
            }
        };

        Ok(ReplyPayload::Listing(listing))
    }
}

impl SlotCatalog {
    fn validate(&self, player: PlayerNumber, slot: Slot) -> Result<(), FixtureError> {
        let dangling = |what: &'static str, id: ItemId| FixtureError::DanglingReference {
            player,
            slot,
            what,
            id,
        };
        let ids = |entries: &[NamedEntry]| entries.iter().map(|e| e.id).collect::<HashSet<_>>();
        let artists = ids(self.artists.as_slice());
        let albums = ids(self.albums.as_slice());
        let genres = ids(self.genres.as_slice());
        let tracks: HashSet<_> = self.tracks.iter().map(|t| t.id).collect();
        let folders: HashSet<_> = self
            .playlists
            .iter()
            .filter(|p| p.folder)
            .map(|p| p.id)
            .collect();

        for track in &self.tracks {
            for (what, id, known) in [
                ("artist", track.artist_id, &artists),
                ("album", track.album_id, &albums),
                ("genre", track.genre_id, &genres),
            ] {
                if let Some(id) = id.filter(|id| !known.contains(id)) {
                    return Err(dangling(what, id));
                }
            }
        }

        for playlist in &self.playlists {
            if playlist.parent != ROOT_FOLDER && !folders.contains(&playlist.parent) {
                return Err(dangling("playlist folder", playlist.parent));
            }
            if let Some(&id) = playlist.tracks.iter().find(|&&id| !tracks.contains(&id)) {
                return Err(dangling("track", id));
            }
        }

        Ok(())
    }

    fn require(&self, entries: &[NamedEntry], kind: &'static str, id: ItemId) -> Result<(), CatalogError> {
        if entries.iter().any(|e| e.id == id) {
            Ok(())
        } else {
            Err(CatalogError::UnknownItem { kind, id })
        }
    }

    fn name_of<'a>(entries: &'a [NamedEntry], id: Option<ItemId>) -> Option<&'a str> {
        let id = id?;
        entries.iter().find(|e| e.id == id).map(|e| e.name.as_str())
    }

    fn track(&self, id: ItemId) -> Option<&TrackEntry> {
        self.tracks.iter().find(|t| t.id == id)
    }

    fn root_menu(&self) -> Vec<Record> {
        let names: Vec<&str> = if self.root_menu.is_empty() {
            DEFAULT_ROOT_MENU.to_vec()
        } else {
            self.root_menu.iter().map(String::as_str).collect()
        };
        names
            .into_iter()
            .zip(1u32..)
            .map(|(name, menu_id)| {
                Record::new()
                    .with("name", format!("{}{}{}", MENU_NAME_OPEN, name, MENU_NAME_CLOSE))
                    .with("menu_id", menu_id)
            })
            .collect()
    }

    /// Ids collected from the tracks matching `keep`
    fn related(
        &self,
        keep: impl Fn(&TrackEntry) -> bool,
        id: impl Fn(&TrackEntry) -> Option<ItemId>,
    ) -> HashSet<ItemId> {
        self.tracks.iter().filter(|&t| keep(t)).filter_map(id).collect()
    }

    /// Name listing sorted case-insensitively
    fn named(
        &self,
        entries: &[NamedEntry],
        id_key: &str,
        keep: impl Fn(&NamedEntry) -> bool,
    ) -> Vec<Record> {
        let mut kept: Vec<&NamedEntry> = entries.iter().filter(|&e| keep(e)).collect();
        kept.sort_by_cached_key(|e| e.name.to_lowercase());
        kept.into_iter()
            .map(|e| Record::new().with("name", e.name.as_str()).with(id_key, e.id))
            .collect()
    }

    fn field(&self, track: &TrackEntry, name: &str) -> Option<Value> {
        match name {
            "title" => Some(Value::from(track.title.as_str())),
            "artist" => Self::name_of(&self.artists, track.artist_id).map(Value::from),
            "album" => Self::name_of(&self.albums, track.album_id).map(Value::from),
            "genre" => Self::name_of(&self.genres, track.genre_id).map(Value::from),
            "bpm" => track.bpm.map(Value::from),
            "key" => track.key.as_deref().map(Value::from),
            "rating" => track.rating.map(|r| Value::Int(i64::from(r))),
            "duration" => track.duration.map(Value::from),
            "comment" => track.comment.as_deref().map(Value::from),
            _ => None,
        }
    }

    fn sort_tracks(&self, tracks: &mut [&TrackEntry], sort: SortMode) {
        match sort {
            SortMode::Title
            | SortMode::Artist
            | SortMode::Album
            | SortMode::Genre
            | SortMode::Key
            | SortMode::Comment => tracks.sort_by_cached_key(|t| {
                self.field(t, sort.name())
                    .map(|v| v.to_string().to_lowercase())
                    .unwrap_or_default()
            }),
            SortMode::Bpm => {
                tracks.sort_by(|a, b| a.bpm.unwrap_or(0.0).total_cmp(&b.bpm.unwrap_or(0.0)))
            }
            SortMode::Duration => tracks.sort_by_key(|t| t.duration.unwrap_or(0)),
            SortMode::Rating => tracks.sort_by_key(|t| Reverse(t.rating.unwrap_or(0))),
            // Not tracked by the fixture; catalog order
            SortMode::Default
            | SortMode::Remixer
            | SortMode::Label
            | SortMode::OriginalArtist
            | SortMode::Bitrate
            | SortMode::PlayCount => {}
        }
    }

    /// Extra column a player adds to title listings for the sorted field
    fn sort_column(sort: SortMode) -> Option<&'static str> {
        match sort {
            SortMode::Album
            | SortMode::Genre
            | SortMode::Bpm
            | SortMode::Rating
            | SortMode::Key
            | SortMode::Duration
            | SortMode::Comment => Some(sort.name()),
            _ => None,
        }
    }

    fn title_record(&self, track: &TrackEntry, sort: SortMode) -> Record {
        let mut record = Record::new()
            .with("title", track.title.as_str())
            .with("artist", self.field(track, "artist").unwrap_or(Value::from("")));
        if let Some(column) = Self::sort_column(sort) {
            record.insert(column, self.field(track, column).unwrap_or(Value::from("")));
        }
        record.with("track_id", track.id)
    }

    fn titles(&self, keep: impl Fn(&TrackEntry) -> bool, sort: SortMode) -> Vec<Record> {
        let mut tracks: Vec<&TrackEntry> = self.tracks.iter().filter(|&t| keep(t)).collect();
        self.sort_tracks(&mut tracks, sort);
        tracks.into_iter().map(|t| self.title_record(t, sort)).collect()
    }

    /// Parent of a playlist tree node; the root folder is its own parent
    fn parent_of(&self, id: ItemId, folder: bool) -> Result<ItemId, CatalogError> {
        if folder && id == ROOT_FOLDER {
            return Ok(ROOT_FOLDER);
        }
        self.playlists
            .iter()
            .find(|p| p.id == id && p.folder == folder)
            .map(|p| p.parent)
            .ok_or(CatalogError::UnknownItem {
                kind: if folder { "playlist folder" } else { "playlist" },
                id,
            })
    }

    /// Sub-folders and playlists of a folder
    ///
    /// Every entry carries `parent_id`: the folder one level above the
    /// listed one.
    fn folder_contents(&self, folder_id: ItemId) -> Result<Vec<Record>, CatalogError> {
        let parent = self.parent_of(folder_id, true)?;
        Ok(self
            .playlists
            .iter()
            .filter(|p| p.parent == folder_id)
            .map(|p| {
                let id_key = if p.folder { "folder_id" } else { "playlist_id" };
                Record::new()
                    .with("name", p.name.as_str())
                    .with(id_key, p.id)
                    .with("parent_id", parent)
            })
            .collect())
    }

    /// Tracks of a playlist, each carrying the folder holding the playlist
    fn playlist_tracks(&self, playlist_id: ItemId, sort: SortMode) -> Result<Vec<Record>, CatalogError> {
        let parent = self.parent_of(playlist_id, false)?;
        let mut tracks: Vec<&TrackEntry> = self
            .playlists
            .iter()
            .filter(|p| p.id == playlist_id && !p.folder)
            .flat_map(|p| p.tracks.iter().filter_map(|&id| self.track(id)))
            .collect();
        self.sort_tracks(&mut tracks, sort);
        Ok(tracks
            .into_iter()
            .map(|t| self.title_record(t, sort).with("parent_id", parent))
            .collect())
    }

    fn metadata(&self, track_id: ItemId) -> Result<Record, CatalogError> {
        let track = self.track(track_id).ok_or(CatalogError::UnknownItem {
            kind: "track",
            id: track_id,
        })?;
        let mut record = Record::new();
        for name in TRACK_FIELDS {
            if let Some(value) = self.field(track, name) {
                record.insert(name, value);
            }
        }
        Ok(record.with("track_id", track.id))
    }
}

/// Fixture shared by the catalog and engine tests
#[cfg(test)]
pub(crate) const TEST_FIXTURE: &str = r#"
online: [1, 3]
players:
  - number: 2
    usb:
      info:
        name: SANDISK
        track_count: 4
        playlist_count: 3
        bytes_total: 16106127360
        bytes_free: 8053063680
      artists:
        - { id: 1, name: Daft Punk }
        - { id: 2, name: Aphex Twin }
      albums:
        - { id: 10, name: Discovery }
        - { id: 11, name: Selected Ambient Works }
      genres:
        - { id: 5, name: House }
        - { id: 6, name: Ambient }
      tracks:
        - { id: 100, title: One More Time, artist_id: 1, album_id: 10, genre_id: 5, bpm: 122.7, key: "F#m", rating: 5, duration: 320 }
        - { id: 101, title: Aerodynamic, artist_id: 1, album_id: 10, genre_id: 5, bpm: 123.0, rating: 3, duration: 212 }
        - { id: 102, title: Xtal, artist_id: 2, album_id: 11, genre_id: 6, bpm: 96.0, duration: 291, comment: opener }
        - { id: 103, title: Ageispolis, artist_id: 2, album_id: 11, genre_id: 6, bpm: 101.5, rating: 4, duration: 322 }
      playlists:
        - { id: 10, name: Sets, folder: true }
        - { id: 20, name: Warmup, parent: 10, folder: true }
        - { id: 30, name: Peak, parent: 10, tracks: [100, 101] }
        - { id: 31, name: Early, parent: 20, tracks: [102] }
        - { id: 32, name: Favourites, tracks: [103, 100] }
"#;
