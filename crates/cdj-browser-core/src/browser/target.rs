//! Navigation targets
//!
//! A [`NavTarget`] names a view to move to together with the ids needed to
//! query it. Row clicks and the back table both produce targets; the engine
//! turns them into catalog requests.

use super::state::{Selectors, ROOT_FOLDER};
use crate::catalog::CatalogQuery;
use crate::types::{ItemId, Slot, SortMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// Built locally from the client registry
    MediaOverview,
    RootMenu {
        slot: Slot,
    },
    Titles,
    Artists,
    Albums,
    Genres,
    AlbumsByArtist {
        artist_id: ItemId,
    },
    TitlesByArtistAlbum {
        artist_id: ItemId,
        album_id: ItemId,
    },
    TitlesByAlbum {
        album_id: ItemId,
    },
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
    /// Folder contents; the root folder lists the top level
    ///
    /// `parent_id` is where back leads when the listing names no parent.
    Playlists {
        folder_id: ItemId,
        parent_id: ItemId,
    },
    /// Tracks of a playlist held by `folder_id`
    PlaylistTracks {
        playlist_id: ItemId,
        folder_id: ItemId,
    },
    /// Side view: doesn't change the current menu
    Metadata {
        track_id: ItemId,
    },
}

impl NavTarget {
    /// Catalog query for this target; `None` for the media overview
    pub fn query(&self, sort: SortMode) -> Option<CatalogQuery> {
        let query = match *self {
            NavTarget::MediaOverview => return None,
            NavTarget::RootMenu { .. } => CatalogQuery::RootMenu,
            NavTarget::Titles => CatalogQuery::Titles { sort },
            NavTarget::Artists => CatalogQuery::Artists { sort },
            NavTarget::Albums => CatalogQuery::Albums { sort },
            NavTarget::Genres => CatalogQuery::Genres,
            NavTarget::AlbumsByArtist { artist_id } => CatalogQuery::AlbumsByArtist { artist_id, sort },
            NavTarget::TitlesByArtistAlbum {
                artist_id,
                album_id,
            } => CatalogQuery::TitlesByArtistAlbum {
                artist_id,
                album_id,
                sort,
            },
            NavTarget::TitlesByAlbum { album_id } => CatalogQuery::TitlesByAlbum { album_id, sort },
            NavTarget::ArtistsByGenre { genre_id } => CatalogQuery::ArtistsByGenre { genre_id },
            NavTarget::AlbumsByGenreArtist {
                genre_id,
                artist_id,
            } => CatalogQuery::AlbumsByGenreArtist {
                genre_id,
                artist_id,
            },
            NavTarget::TitlesByGenreArtistAlbum {
                genre_id,
                artist_id,
                album_id,
            } => CatalogQuery::TitlesByGenreArtistAlbum {
                genre_id,
                artist_id,
                album_id,
            },
            NavTarget::Playlists { folder_id, .. } => CatalogQuery::Playlists { folder_id },
            NavTarget::PlaylistTracks { playlist_id, .. } => {
                CatalogQuery::Playlist { playlist_id, sort }
            }
            NavTarget::Metadata { track_id } => CatalogQuery::Metadata { track_id },
        };
        Some(query)
    }

    /// Slot the query goes to: the root menu names its own, the rest stay
    /// on the current slot
    pub fn slot(&self, current: Option<Slot>) -> Option<Slot> {
        match *self {
            NavTarget::RootMenu { slot } => Some(slot),
            NavTarget::MediaOverview => None,
            _ => current,
        }
    }

    /// Write the selectors this descent owns
    ///
    /// Applied only once the query has been accepted.
    pub fn record_selectors(&self, selectors: &mut Selectors) {
        match *self {
            NavTarget::AlbumsByArtist { artist_id } => selectors.artist_id = Some(artist_id),
            NavTarget::TitlesByArtistAlbum { album_id, .. } => selectors.album_id = Some(album_id),
            NavTarget::ArtistsByGenre { genre_id } => selectors.genre_id = Some(genre_id),
            NavTarget::AlbumsByGenreArtist { artist_id, .. } => selectors.artist_id = Some(artist_id),
            NavTarget::TitlesByGenreArtistAlbum { album_id, .. } => {
                selectors.album_id = Some(album_id)
            }
            // A reply carrying parent_id overrides the folder written here
            NavTarget::Playlists { parent_id, .. } => {
                selectors.playlist_folder_id = Some(parent_id);
                selectors.playlist_id = Some(ROOT_FOLDER);
            }
            NavTarget::PlaylistTracks {
                playlist_id,
                folder_id,
            } => {
                selectors.playlist_folder_id = Some(folder_id);
                selectors.playlist_id = Some(playlist_id);
            }
            NavTarget::MediaOverview
            | NavTarget::RootMenu { .. }
            | NavTarget::Titles
            | NavTarget::Artists
            | NavTarget::Albums
            | NavTarget::Genres
            | NavTarget::TitlesByAlbum { .. }
            | NavTarget::Metadata { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entering_folder_resets_playlist() {
        let mut selectors = Selectors {
            playlist_id: Some(31),
            ..Default::default()
        };
        NavTarget::Playlists {
            folder_id: 20,
            parent_id: 10,
        }
        .record_selectors(&mut selectors);
        assert_eq!(selectors.playlist_folder_id, Some(10));
        assert_eq!(selectors.playlist_id, Some(0));
    }

    #[test]
    fn test_opening_playlist_records_its_folder() {
        let mut selectors = Selectors::default();
        let target = NavTarget::PlaylistTracks {
            playlist_id: 30,
            folder_id: 10,
        };
        target.record_selectors(&mut selectors);
        assert_eq!(selectors.playlist_folder_id, Some(10));
        assert_eq!(selectors.playlist_id, Some(30));
        assert_eq!(
            target.query(SortMode::Default),
            Some(CatalogQuery::Playlist {
                playlist_id: 30,
                sort: SortMode::Default
            })
        );
    }

    #[test]
    fn test_sort_only_reaches_sortable_queries() {
        assert_eq!(
            NavTarget::Titles.query(SortMode::Bpm),
            Some(CatalogQuery::Titles { sort: SortMode::Bpm })
        );
        assert_eq!(
            NavTarget::ArtistsByGenre { genre_id: 3 }.query(SortMode::Bpm),
            Some(CatalogQuery::ArtistsByGenre { genre_id: 3 })
        );
        assert_eq!(NavTarget::MediaOverview.query(SortMode::Bpm), None);
    }

    #[test]
    fn test_root_menu_names_its_slot() {
        let target = NavTarget::RootMenu { slot: Slot::Sd };
        assert_eq!(target.slot(Some(Slot::Usb)), Some(Slot::Sd));
        assert_eq!(NavTarget::Titles.slot(Some(Slot::Usb)), Some(Slot::Usb));
        assert_eq!(NavTarget::Titles.slot(None), None);
    }
}
