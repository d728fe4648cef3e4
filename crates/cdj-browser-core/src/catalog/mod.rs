//! Catalog gateway contract
//!
//! The browser never talks to a player's database directly. It submits a
//! [`CatalogRequest`] through a [`CatalogGateway`] together with a completion
//! callback; the gateway answers later, on whatever thread it likes, with a
//! [`CatalogReply`] that echoes the request it answers.
//!
//! ```text
//! ┌──────────────┐   submit(request, on_reply)   ┌────────────────┐
//! │ Owning       │ ─────────────────────────────► │ CatalogGateway │
//! │ context      │                                │ (any thread)   │
//! │              │ ◄─ mailbox ◄─ on_reply(reply) ─│                │
//! └──────────────┘                                └────────────────┘
//! ```
//!
//! [`MemoryCatalog`] and [`CatalogService`] provide an in-process gateway
//! backed by a YAML fixture.

mod memory;
mod record;
mod service;

pub use memory::{FixtureError, MemoryCatalog};
pub use record::{Record, Value, ID_SUFFIX};
pub use service::{CatalogClient, CatalogCommand, CatalogService};

#[cfg(test)]
pub(crate) use memory::TEST_FIXTURE;

use crate::types::{ItemId, MenuKind, PlayerNumber, Slot, SortMode};
use thiserror::Error;

/// Delimiters players wrap around root menu category names
pub const MENU_NAME_OPEN: char = '\u{fffa}';
pub const MENU_NAME_CLOSE: char = '\u{fffb}';

/// A single catalog query, without the player/slot it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    RootMenu,
    Titles {
        sort: SortMode,
    },
    Artists {
        sort: SortMode,
    },
    AlbumsByArtist {
        artist_id: ItemId,
        sort: SortMode,
    },
    TitlesByArtistAlbum {
        artist_id: ItemId,
        album_id: ItemId,
        sort: SortMode,
    },
    Albums {
        sort: SortMode,
    },
    TitlesByAlbum {
        album_id: ItemId,
        sort: SortMode,
    },
    Genres,
    ArtistsByGenre {
        genre_id: ItemId,
    },
    AlbumsByGenreArtist {
        genre_id: ItemId,
        artist_id: ItemId,
    },
    TitlesByGenreArtistAlbum {
        genre_id: ItemId,
        artist_id: ItemId,
        album_id: ItemId,
    },
    /// Contents of a playlist folder (0 = top level)
    Playlists {
        folder_id: ItemId,
    },
    /// Tracks of a single playlist
    Playlist {
        playlist_id: ItemId,
        sort: SortMode,
    },
    Metadata {
        track_id: ItemId,
    },
}

impl CatalogQuery {
    /// Menu the reply to this query is shown as
    ///
    /// Metadata replies don't change the current menu and return `None`.
    /// Both playlist queries answer as [`MenuKind::Playlist`].
    pub fn menu(&self) -> Option<MenuKind> {
        match self {
            CatalogQuery::RootMenu => Some(MenuKind::Root),
            CatalogQuery::Titles { .. } => Some(MenuKind::Title),
            CatalogQuery::Artists { .. } => Some(MenuKind::Artist),
            CatalogQuery::AlbumsByArtist { .. } => Some(MenuKind::AlbumByArtist),
            CatalogQuery::TitlesByArtistAlbum { .. } => Some(MenuKind::TitleByArtistAlbum),
            CatalogQuery::Albums { .. } => Some(MenuKind::Album),
            CatalogQuery::TitlesByAlbum { .. } => Some(MenuKind::TitleByAlbum),
            CatalogQuery::Genres => Some(MenuKind::Genre),
            CatalogQuery::ArtistsByGenre { .. } => Some(MenuKind::ArtistByGenre),
            CatalogQuery::AlbumsByGenreArtist { .. } => Some(MenuKind::AlbumByGenreArtist),
            CatalogQuery::TitlesByGenreArtistAlbum { .. } => {
                Some(MenuKind::TitleByGenreArtistAlbum)
            }
            CatalogQuery::Playlists { .. } | CatalogQuery::Playlist { .. } => {
                Some(MenuKind::Playlist)
            }
            CatalogQuery::Metadata { .. } => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            CatalogQuery::Metadata { .. } => "metadata",
            CatalogQuery::Playlist { .. } => "playlist_tracks",
            other => other.menu().map(|m| m.name()).unwrap_or("unknown"),
        }
    }
}

/// A query addressed to one slot of one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub player: PlayerNumber,
    pub slot: Slot,
    pub query: CatalogQuery,
}

impl CatalogRequest {
    pub fn new(player: PlayerNumber, slot: Slot, query: CatalogQuery) -> Self {
        Self {
            player,
            slot,
            query,
        }
    }
}

/// Body of a catalog reply
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPayload {
    /// Rows of a menu listing (root menu, titles, artists, ...)
    Listing(Vec<Record>),
    /// Field set of a single track
    Metadata(Record),
}

/// A reply together with the request it answers
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReply {
    pub request: CatalogRequest,
    pub payload: ReplyPayload,
}

/// Completion callback handed to the gateway
///
/// May be invoked on any thread, at most once.
pub type ReplyCallback = Box<dyn FnOnce(CatalogReply) + Send + 'static>;

/// Errors a gateway reports while accepting a request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No catalog is known for this player
    #[error("no catalog available for player {0}")]
    UnknownPlayer(PlayerNumber),

    /// The player is known but the slot holds no media
    #[error("slot {slot} of player {player} is not loaded")]
    SlotNotLoaded { player: PlayerNumber, slot: Slot },

    /// The request names an id the catalog doesn't contain
    #[error("unknown {kind} id {id}")]
    UnknownItem { kind: &'static str, id: ItemId },

    /// The service behind the gateway has stopped
    #[error("catalog service is not running")]
    ServiceUnavailable,
}

/// Issues hierarchical catalog queries and reports replies asynchronously
///
/// Implementations decide where `on_reply` runs. Returning `Ok` only means
/// the request was accepted; a reply may still never arrive.
pub trait CatalogGateway: Send + Sync {
    /// Submit a request; `on_reply` is called with the reply, if any
    fn submit(&self, request: CatalogRequest, on_reply: ReplyCallback) -> Result<(), CatalogError>;

    fn get_root_menu(
        &self,
        player: PlayerNumber,
        slot: Slot,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(CatalogRequest::new(player, slot, CatalogQuery::RootMenu), on_reply)
    }

    fn get_titles(
        &self,
        player: PlayerNumber,
        slot: Slot,
        sort: SortMode,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::Titles { sort }),
            on_reply,
        )
    }

    fn get_artists(
        &self,
        player: PlayerNumber,
        slot: Slot,
        sort: SortMode,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::Artists { sort }),
            on_reply,
        )
    }

    fn get_albums_by_artist(
        &self,
        player: PlayerNumber,
        slot: Slot,
        artist_id: ItemId,
        sort: SortMode,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::AlbumsByArtist { artist_id, sort }),
            on_reply,
        )
    }

    fn get_titles_by_artist_album(
        &self,
        player: PlayerNumber,
        slot: Slot,
        artist_id: ItemId,
        album_id: ItemId,
        sort: SortMode,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(
                player,
                slot,
                CatalogQuery::TitlesByArtistAlbum {
                    artist_id,
                    album_id,
                    sort,
                },
            ),
            on_reply,
        )
    }

    fn get_albums(
        &self,
        player: PlayerNumber,
        slot: Slot,
        sort: SortMode,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::Albums { sort }),
            on_reply,
        )
    }

    fn get_titles_by_album(
        &self,
        player: PlayerNumber,
        slot: Slot,
        album_id: ItemId,
        sort: SortMode,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::TitlesByAlbum { album_id, sort }),
            on_reply,
        )
    }

    fn get_genres(
        &self,
        player: PlayerNumber,
        slot: Slot,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(CatalogRequest::new(player, slot, CatalogQuery::Genres), on_reply)
    }

    fn get_artists_by_genre(
        &self,
        player: PlayerNumber,
        slot: Slot,
        genre_id: ItemId,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::ArtistsByGenre { genre_id }),
            on_reply,
        )
    }

    fn get_albums_by_genre_artist(
        &self,
        player: PlayerNumber,
        slot: Slot,
        genre_id: ItemId,
        artist_id: ItemId,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(
                player,
                slot,
                CatalogQuery::AlbumsByGenreArtist {
                    genre_id,
                    artist_id,
                },
            ),
            on_reply,
        )
    }

    fn get_titles_by_genre_artist_album(
        &self,
        player: PlayerNumber,
        slot: Slot,
        genre_id: ItemId,
        artist_id: ItemId,
        album_id: ItemId,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(
                player,
                slot,
                CatalogQuery::TitlesByGenreArtistAlbum {
                    genre_id,
                    artist_id,
                    album_id,
                },
            ),
            on_reply,
        )
    }

    fn get_playlists(
        &self,
        player: PlayerNumber,
        slot: Slot,
        folder_id: ItemId,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::Playlists { folder_id }),
            on_reply,
        )
    }

    fn get_playlist(
        &self,
        player: PlayerNumber,
        slot: Slot,
        playlist_id: ItemId,
        sort: SortMode,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::Playlist { playlist_id, sort }),
            on_reply,
        )
    }

    fn get_metadata(
        &self,
        player: PlayerNumber,
        slot: Slot,
        track_id: ItemId,
        on_reply: ReplyCallback,
    ) -> Result<(), CatalogError> {
        self.submit(
            CatalogRequest::new(player, slot, CatalogQuery::Metadata { track_id }),
            on_reply,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_queries_answer_as_playlist_menu() {
        assert_eq!(
            CatalogQuery::Playlists { folder_id: 0 }.menu(),
            Some(MenuKind::Playlist)
        );
        assert_eq!(
            CatalogQuery::Playlist {
                playlist_id: 3,
                sort: SortMode::Default
            }
            .menu(),
            Some(MenuKind::Playlist)
        );
    }

    #[test]
    fn test_metadata_query_has_no_menu() {
        assert_eq!(CatalogQuery::Metadata { track_id: 1 }.menu(), None);
        assert_eq!(CatalogQuery::Metadata { track_id: 1 }.name(), "metadata");
    }

    #[test]
    fn test_query_names_follow_menu() {
        assert_eq!(CatalogQuery::RootMenu.name(), "root_menu");
        assert_eq!(
            CatalogQuery::AlbumsByGenreArtist {
                genre_id: 1,
                artist_id: 2
            }
            .name(),
            "album_by_genre_artist"
        );
    }
}
