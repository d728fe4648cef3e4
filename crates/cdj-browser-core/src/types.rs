//! Common types for the catalog browser
//!
//! Player numbers, media slots, sort modes and the fixed set of menu kinds
//! the navigation engine moves between.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Player numbers offered as load targets when nothing else is configured
pub const DEFAULT_LOAD_TARGETS: [u8; 4] = [1, 2, 3, 4];

/// Catalog item identifier (artist, album, genre, folder, playlist, track)
///
/// Zero is the root sentinel used by playlist folders.
pub type ItemId = u32;

/// A name that doesn't match any known variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownName {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Identity of a player on the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerNumber(pub u8);

impl fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerNumber {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map(PlayerNumber)
            .map_err(|_| UnknownName::new("player number", s))
    }
}

/// Physical media source attached to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Usb,
    Sd,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Usb, Slot::Sd];

    /// Lower-case protocol name ("usb", "sd")
    pub fn name(&self) -> &'static str {
        match self {
            Slot::Usb => "usb",
            Slot::Sd => "sd",
        }
    }

    /// Human readable label used in the media overview
    pub fn label(&self) -> &'static str {
        match self {
            Slot::Usb => "USB",
            Slot::Sd => "SD Card",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slot {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usb" => Ok(Slot::Usb),
            "sd" => Ok(Slot::Sd),
            _ => Err(UnknownName::new("slot", s)),
        }
    }
}

/// Sort order requested from the catalog
///
/// Only title listings honour a sort change made while browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Default,
    Title,
    Artist,
    Album,
    Bpm,
    Rating,
    Genre,
    Comment,
    Duration,
    Remixer,
    Label,
    OriginalArtist,
    Key,
    Bitrate,
    PlayCount,
}

impl SortMode {
    pub const ALL: [SortMode; 15] = [
        SortMode::Default,
        SortMode::Title,
        SortMode::Artist,
        SortMode::Album,
        SortMode::Bpm,
        SortMode::Rating,
        SortMode::Genre,
        SortMode::Comment,
        SortMode::Duration,
        SortMode::Remixer,
        SortMode::Label,
        SortMode::OriginalArtist,
        SortMode::Key,
        SortMode::Bitrate,
        SortMode::PlayCount,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortMode::Default => "default",
            SortMode::Title => "title",
            SortMode::Artist => "artist",
            SortMode::Album => "album",
            SortMode::Bpm => "bpm",
            SortMode::Rating => "rating",
            SortMode::Genre => "genre",
            SortMode::Comment => "comment",
            SortMode::Duration => "duration",
            SortMode::Remixer => "remixer",
            SortMode::Label => "label",
            SortMode::OriginalArtist => "original_artist",
            SortMode::Key => "key",
            SortMode::Bitrate => "bitrate",
            SortMode::PlayCount => "play_count",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortMode {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(|c: char| c == ' ' || c == '-', "_");
        SortMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| UnknownName::new("sort mode", s))
    }
}

/// The kind of view currently shown
///
/// Determines which selectors are meaningful and which parent the back
/// action returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    MediaOverview,
    Root,
    Title,
    Artist,
    Album,
    Genre,
    Playlist,
    AlbumByArtist,
    TitleByArtistAlbum,
    TitleByAlbum,
    ArtistByGenre,
    AlbumByGenreArtist,
    TitleByGenreArtistAlbum,
}

impl MenuKind {
    /// Protocol request name ("album_by_artist")
    pub fn name(&self) -> &'static str {
        match self {
            MenuKind::MediaOverview => "media",
            MenuKind::Root => "root_menu",
            MenuKind::Title => "title",
            MenuKind::Artist => "artist",
            MenuKind::Album => "album",
            MenuKind::Genre => "genre",
            MenuKind::Playlist => "playlist",
            MenuKind::AlbumByArtist => "album_by_artist",
            MenuKind::TitleByArtistAlbum => "title_by_artist_album",
            MenuKind::TitleByAlbum => "title_by_album",
            MenuKind::ArtistByGenre => "artist_by_genre",
            MenuKind::AlbumByGenreArtist => "album_by_genre_artist",
            MenuKind::TitleByGenreArtistAlbum => "title_by_genre_artist_album",
        }
    }

    /// Title-cased name used in view headings ("Album By Artist")
    pub fn display_name(&self) -> String {
        title_case(self.name())
    }
}

impl fmt::Display for MenuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Title-case a snake_case field name ("track_count" -> "Track Count")
pub fn title_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c == ' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_parse_is_case_insensitive() {
        assert_eq!("USB".parse::<Slot>(), Ok(Slot::Usb));
        assert_eq!("sd".parse::<Slot>(), Ok(Slot::Sd));
        assert!("cd".parse::<Slot>().is_err());
    }

    #[test]
    fn test_sort_mode_names() {
        assert_eq!(SortMode::default(), SortMode::Default);
        assert_eq!("original artist".parse::<SortMode>(), Ok(SortMode::OriginalArtist));
        assert_eq!("play_count".parse::<SortMode>(), Ok(SortMode::PlayCount));
        for mode in SortMode::ALL {
            assert_eq!(mode.name().parse::<SortMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_menu_display_name() {
        assert_eq!(MenuKind::AlbumByArtist.display_name(), "Album By Artist");
        assert_eq!(MenuKind::Title.display_name(), "Title");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("name"), "Name");
        assert_eq!(title_case("track_count"), "Track Count");
        assert_eq!(title_case("BPM"), "Bpm");
    }
}
