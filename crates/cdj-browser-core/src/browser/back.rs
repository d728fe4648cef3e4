//! Back navigation
//!
//! No history is kept. The parent of the current view is looked up from
//! the current menu and whatever selectors its branch last wrote:
//!
//! ```text
//! title | artist | album | genre   -> root menu (slot)
//! album_by_artist                 -> artist
//! title_by_artist_album           -> album_by_artist (artist)
//! title_by_album                  -> album
//! artist_by_genre                 -> genre
//! album_by_genre_artist           -> artist_by_genre (genre)
//! title_by_genre_artist_album     -> album_by_genre_artist (genre, artist)
//! playlist                        -> root menu if folder == 0 and playlist == 0
//!                                    else playlist folder (folder)
//! root_menu                       -> media overview
//! media                           -> nothing
//! ```
//!
//! Opening a folder or playlist records the folder it was listed in. A
//! non-empty folder listing then overwrites that with the parent it names,
//! so going back walks up one level at a time, empty listings included.

use super::error::BrowseError;
use super::state::{NavigationState, ROOT_FOLDER};
use super::target::NavTarget;
use crate::types::{ItemId, MenuKind};

/// Parent of the current view
///
/// `Ok(None)` at the media overview. Errors when a selector the table
/// needs was never recorded.
pub fn compute_parent(state: &NavigationState) -> Result<Option<NavTarget>, BrowseError> {
    let selectors = &state.selectors;
    let require = |id: Option<ItemId>, what: &str| {
        id.ok_or_else(|| {
            BrowseError::UnrecognizedMenuOrRowType(format!(
                "back from {} without a {} id",
                state.menu, what
            ))
        })
    };

    let parent = match state.menu {
        MenuKind::MediaOverview => return Ok(None),
        MenuKind::Root => NavTarget::MediaOverview,
        MenuKind::Title | MenuKind::Artist | MenuKind::Album | MenuKind::Genre => {
            root_menu(state)?
        }
        MenuKind::AlbumByArtist => NavTarget::Artists,
        MenuKind::TitleByArtistAlbum => NavTarget::AlbumsByArtist {
            artist_id: require(selectors.artist_id, "artist")?,
        },
        MenuKind::TitleByAlbum => NavTarget::Albums,
        MenuKind::ArtistByGenre => NavTarget::Genres,
        MenuKind::AlbumByGenreArtist => NavTarget::ArtistsByGenre {
            genre_id: require(selectors.genre_id, "genre")?,
        },
        MenuKind::TitleByGenreArtistAlbum => NavTarget::AlbumsByGenreArtist {
            genre_id: require(selectors.genre_id, "genre")?,
            artist_id: require(selectors.artist_id, "artist")?,
        },
        MenuKind::Playlist => {
            let folder_id = selectors.folder();
            if folder_id == ROOT_FOLDER && selectors.playlist() == ROOT_FOLDER {
                root_menu(state)?
            } else {
                // The folder's own listing names its parent
                NavTarget::Playlists {
                    folder_id,
                    parent_id: ROOT_FOLDER,
                }
            }
        }
    };

    Ok(Some(parent))
}

fn root_menu(state: &NavigationState) -> Result<NavTarget, BrowseError> {
    state
        .slot
        .map(|slot| NavTarget::RootMenu { slot })
        .ok_or_else(|| {
            BrowseError::UnrecognizedMenuOrRowType(format!("back from {} without a slot", state.menu))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayerNumber, Slot, SortMode};

    fn state_at(menu: MenuKind) -> NavigationState {
        let mut state = NavigationState::new(PlayerNumber(2), SortMode::Default);
        state.slot = Some(Slot::Usb);
        state.menu = menu;
        state
    }

    #[test]
    fn test_media_overview_has_no_parent() {
        let state = NavigationState::new(PlayerNumber(2), SortMode::Default);
        assert_eq!(compute_parent(&state), Ok(None));
    }

    #[test]
    fn test_categories_return_to_root_menu() {
        for menu in [MenuKind::Title, MenuKind::Artist, MenuKind::Album, MenuKind::Genre] {
            assert_eq!(
                compute_parent(&state_at(menu)),
                Ok(Some(NavTarget::RootMenu { slot: Slot::Usb }))
            );
        }
        assert_eq!(
            compute_parent(&state_at(MenuKind::Root)),
            Ok(Some(NavTarget::MediaOverview))
        );
    }

    #[test]
    fn test_compound_menus_use_recorded_selectors() {
        let mut state = state_at(MenuKind::TitleByGenreArtistAlbum);
        state.selectors.genre_id = Some(3);
        state.selectors.artist_id = Some(4);
        state.selectors.album_id = Some(9);
        assert_eq!(
            compute_parent(&state),
            Ok(Some(NavTarget::AlbumsByGenreArtist {
                genre_id: 3,
                artist_id: 4
            }))
        );

        state.menu = MenuKind::AlbumByGenreArtist;
        assert_eq!(
            compute_parent(&state),
            Ok(Some(NavTarget::ArtistsByGenre { genre_id: 3 }))
        );

        state.menu = MenuKind::TitleByArtistAlbum;
        assert_eq!(
            compute_parent(&state),
            Ok(Some(NavTarget::AlbumsByArtist { artist_id: 4 }))
        );

        state.menu = MenuKind::TitleByAlbum;
        assert_eq!(compute_parent(&state), Ok(Some(NavTarget::Albums)));
    }

    #[test]
    fn test_playlist_back_depends_on_sentinels() {
        let mut state = state_at(MenuKind::Playlist);
        assert_eq!(
            compute_parent(&state),
            Ok(Some(NavTarget::RootMenu { slot: Slot::Usb }))
        );

        state.selectors.playlist_folder_id = Some(0);
        state.selectors.playlist_id = Some(32);
        assert_eq!(
            compute_parent(&state),
            Ok(Some(NavTarget::Playlists {
                folder_id: 0,
                parent_id: 0
            }))
        );

        state.selectors.playlist_folder_id = Some(10);
        state.selectors.playlist_id = Some(0);
        assert_eq!(
            compute_parent(&state),
            Ok(Some(NavTarget::Playlists {
                folder_id: 10,
                parent_id: 0
            }))
        );
    }

    #[test]
    fn test_missing_selector_is_an_error() {
        let state = state_at(MenuKind::AlbumByGenreArtist);
        assert!(matches!(
            compute_parent(&state),
            Err(BrowseError::UnrecognizedMenuOrRowType(_))
        ));

        let mut no_slot = state_at(MenuKind::Title);
        no_slot.slot = None;
        assert!(compute_parent(&no_slot).is_err());
    }
}
