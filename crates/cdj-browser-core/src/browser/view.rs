//! What the engine hands to a renderer

use crate::catalog::Record;
use crate::types::{ItemId, MenuKind, PlayerNumber, Slot};
use std::fmt;

/// Semantic type of a row; decides what a click on it does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Media,
    Root,
    Title,
    Artist,
    Album,
    Genre,
    Folder,
    Playlist,
    AlbumByArtist,
    TitleByArtistAlbum,
    TitleByAlbum,
    ArtistByGenre,
    AlbumByGenreArtist,
    TitleByGenreArtistAlbum,
}

impl RowKind {
    /// Kind of the rows a menu listing produces
    pub fn for_menu(menu: MenuKind) -> RowKind {
        match menu {
            MenuKind::MediaOverview => RowKind::Media,
            MenuKind::Root => RowKind::Root,
            MenuKind::Title => RowKind::Title,
            MenuKind::Artist => RowKind::Artist,
            MenuKind::Album => RowKind::Album,
            MenuKind::Genre => RowKind::Genre,
            MenuKind::Playlist => RowKind::Playlist,
            MenuKind::AlbumByArtist => RowKind::AlbumByArtist,
            MenuKind::TitleByArtistAlbum => RowKind::TitleByArtistAlbum,
            MenuKind::TitleByAlbum => RowKind::TitleByAlbum,
            MenuKind::ArtistByGenre => RowKind::ArtistByGenre,
            MenuKind::AlbumByGenreArtist => RowKind::AlbumByGenreArtist,
            MenuKind::TitleByGenreArtistAlbum => RowKind::TitleByGenreArtistAlbum,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RowKind::Media => "media",
            RowKind::Root => "root",
            RowKind::Folder => "folder",
            RowKind::Title => "title",
            RowKind::Artist => "artist",
            RowKind::Album => "album",
            RowKind::Genre => "genre",
            RowKind::Playlist => "playlist",
            RowKind::AlbumByArtist => "album_by_artist",
            RowKind::TitleByArtistAlbum => "title_by_artist_album",
            RowKind::TitleByAlbum => "title_by_album",
            RowKind::ArtistByGenre => "artist_by_genre",
            RowKind::AlbumByGenreArtist => "album_by_genre_artist",
            RowKind::TitleByGenreArtistAlbum => "title_by_genre_artist_album",
        }
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row payload fed back to the engine when the row is selected
#[derive(Debug, Clone, PartialEq)]
pub struct RowTag {
    pub kind: RowKind,
    /// Every field of the catalog record, ids included
    pub fields: Record,
}

impl RowTag {
    pub fn new(kind: RowKind, fields: Record) -> Self {
        Self { kind, fields }
    }

    pub fn id(&self, key: &str) -> Option<ItemId> {
        self.fields.id(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(|v| v.as_text())
    }

    /// Slot named by a media row
    pub fn slot(&self) -> Option<Slot> {
        self.name().and_then(|name| name.parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub cells: Vec<String>,
    /// `None` for placeholder rows that do nothing when clicked
    pub tag: Option<RowTag>,
}

impl ViewRow {
    pub fn tagged(cells: Vec<String>, tag: RowTag) -> Self {
        Self {
            cells,
            tag: Some(tag),
        }
    }

    pub fn inert(text: &str) -> Self {
        Self {
            cells: vec![text.to_string()],
            tag: None,
        }
    }
}

/// Renderer-agnostic description of a list view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewDescriptor {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<ViewRow>,
}

impl ViewDescriptor {
    /// Tag of the row at `index`, if the row exists and is clickable
    pub fn row_tag(&self, index: usize) -> Option<&RowTag> {
        self.rows.get(index).and_then(|row| row.tag.as_ref())
    }
}

/// One line of the metadata side view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataField {
    pub label: String,
    pub value: String,
}

/// Output of the engine, consumed by the UI glue
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserEvent {
    RenderView(ViewDescriptor),
    RenderMetadata(Vec<MetadataField>),
    /// Whether each configured load target is currently reachable
    ButtonAvailability(Vec<(PlayerNumber, bool)>),
}
