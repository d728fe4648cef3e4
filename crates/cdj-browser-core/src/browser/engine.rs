//! Navigation engine
//!
//! Owns the [`NavigationState`] and turns user actions into catalog
//! requests and catalog replies into view events. Exactly one query is
//! pending at a time: every request is stamped with a fresh [`RequestId`]
//! and a reply is applied only if it carries the pending id. Issuing a new
//! query therefore cancels the effect of the previous one.
//!
//! State changes happen in two places:
//! - when a query is accepted, the selectors the descent owns are written
//! - when its reply is applied, `menu` and `slot` move to the new view
//!
//! A reply is applied all-or-nothing. Errors never reach the caller; they
//! are logged through [`BrowseError::report`].

use super::back::compute_parent;
use super::error::BrowseError;
use super::mailbox::RequestMailbox;
use super::projection;
use super::state::{NavigationState, ROOT_FOLDER};
use super::target::NavTarget;
use super::view::{BrowserEvent, RowKind, RowTag};
use crate::catalog::{
    CatalogGateway, CatalogQuery, CatalogReply, CatalogRequest, ReplyCallback, ReplyPayload,
};
use crate::clients::{ClientRegistry, PlaybackDispatcher};
use crate::config::BrowserConfig;
use crate::types::{MenuKind, PlayerNumber, Slot, SortMode};
use std::sync::Arc;

/// Stamp identifying one issued query
pub type RequestId = u64;

/// What the completion callback deposits into the mailbox
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyEnvelope {
    pub request_id: RequestId,
    pub reply: CatalogReply,
}

/// External services the engine talks to
#[derive(Clone)]
pub struct Collaborators {
    pub gateway: Arc<dyn CatalogGateway>,
    pub registry: Arc<dyn ClientRegistry>,
    pub dispatcher: Arc<dyn PlaybackDispatcher>,
}

/// Input from the UI glue
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    SelectRow(RowTag),
    Back,
    SetSort(SortMode),
    ShowMediaOverview,
    /// A slot of the browsed player was mounted or ejected
    MediaChanged(Slot),
    /// Browse a different player
    Retarget(PlayerNumber),
    /// Load the selected track into a player
    LoadInto(PlayerNumber),
}

#[derive(Debug)]
struct PendingQuery {
    id: RequestId,
    request: CatalogRequest,
}

pub struct NavigationEngine {
    state: NavigationState,
    config: BrowserConfig,
    collaborators: Collaborators,
    mailbox: Arc<RequestMailbox<ReplyEnvelope>>,
    pending: Option<PendingQuery>,
    next_request_id: RequestId,
}

impl NavigationEngine {
    pub fn new(
        player: PlayerNumber,
        config: BrowserConfig,
        collaborators: Collaborators,
        mailbox: Arc<RequestMailbox<ReplyEnvelope>>,
    ) -> Self {
        Self {
            state: NavigationState::new(player, config.default_sort),
            config,
            collaborators,
            mailbox,
            pending: None,
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Request whose reply would currently be applied
    pub fn pending_request(&self) -> Option<&CatalogRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    /// Initial media overview and button states
    pub fn start(&mut self) -> Vec<BrowserEvent> {
        let mut events = self.show_media_overview();
        events.push(self.button_availability());
        events
    }

    pub fn handle(&mut self, action: UserAction) -> Vec<BrowserEvent> {
        match action {
            UserAction::SelectRow(tag) => self.select_row(&tag),
            UserAction::Back => self.back(),
            UserAction::SetSort(sort) => self.set_sort(sort),
            UserAction::ShowMediaOverview => self.show_media_overview(),
            UserAction::MediaChanged(slot) => self.media_changed(slot),
            UserAction::Retarget(player) => self.retarget(player),
            UserAction::LoadInto(target) => {
                self.load_into_player(target);
                Vec::new()
            }
        }
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// Act on a clicked row, then refresh button availability
    pub fn select_row(&mut self, tag: &RowTag) -> Vec<BrowserEvent> {
        log::debug!("Browser: Clicked {} row {:?}", tag.kind, tag.fields);
        let mut events = match self.descend_target(tag) {
            Ok(target) => self.navigate(target),
            Err(e) => {
                e.report();
                Vec::new()
            }
        };
        events.push(self.button_availability());
        events
    }

    pub fn back(&mut self) -> Vec<BrowserEvent> {
        match compute_parent(&self.state) {
            Ok(Some(target)) => self.navigate(target),
            Ok(None) => {
                log::debug!("Browser: Already at the media overview");
                Vec::new()
            }
            Err(e) => {
                e.report();
                Vec::new()
            }
        }
    }

    /// Change the sort mode; only the title listing is re-queried
    pub fn set_sort(&mut self, sort: SortMode) -> Vec<BrowserEvent> {
        self.state.sort = sort;
        if self.state.menu == MenuKind::Title {
            self.navigate(NavTarget::Titles)
        } else {
            Vec::new()
        }
    }

    /// Rebuild the media overview from the client registry
    ///
    /// Drops any pending query. Leaves state untouched if the registry
    /// doesn't know the player.
    pub fn show_media_overview(&mut self) -> Vec<BrowserEvent> {
        let player = self.state.player;
        let Some(info) = self.collaborators.registry.client(player) else {
            BrowseError::MissingCollaborator {
                player,
                reason: "not in client registry".to_string(),
            }
            .report();
            return Vec::new();
        };

        if let Some(pending) = self.pending.take() {
            log::debug!(
                "Browser: Dropping pending {} query (request {})",
                pending.request.query.name(),
                pending.id
            );
        }
        self.state.reset_to_media_overview();
        vec![BrowserEvent::RenderView(projection::media_overview(&info))]
    }

    /// React to a slot of the browsed player changing contents
    pub fn media_changed(&mut self, slot: Slot) -> Vec<BrowserEvent> {
        if self.state.slot == Some(slot) || self.state.menu == MenuKind::MediaOverview {
            self.show_media_overview()
        } else {
            log::debug!("Browser: Ignoring media change in unrelated slot {}", slot);
            Vec::new()
        }
    }

    /// Start browsing another player from its media overview
    pub fn retarget(&mut self, player: PlayerNumber) -> Vec<BrowserEvent> {
        log::info!("Browser: Switching from player {} to {}", self.state.player, player);
        self.state = NavigationState::new(player, self.state.sort);
        self.pending = None;
        self.start()
    }

    /// Ask `target` to load the track whose metadata is shown
    ///
    /// Returns false (and does nothing) until a slot is open and a metadata
    /// reply has recorded a track.
    pub fn load_into_player(&self, target: PlayerNumber) -> bool {
        let (Some(slot), Some(track_id)) = (self.state.slot, self.state.selectors.track_id) else {
            BrowseError::PreconditionUnmet("load needs a selected slot and track").report();
            return false;
        };
        log::info!(
            "Browser: Loading track {} from player {} {} into player {}",
            track_id,
            self.state.player,
            slot,
            target
        );
        self.collaborators
            .dispatcher
            .load_track(target, self.state.player, slot, track_id);
        true
    }

    /// Reachability of every configured load target
    pub fn button_availability(&self) -> BrowserEvent {
        let targets = self
            .config
            .load_targets
            .iter()
            .map(|&target| (target, self.collaborators.registry.client(target).is_some()))
            .collect();
        BrowserEvent::ButtonAvailability(targets)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Target a row click leads to
    fn descend_target(&self, tag: &RowTag) -> Result<NavTarget, BrowseError> {
        let selectors = &self.state.selectors;
        let row_id = |key: &str| {
            tag.id(key).ok_or_else(|| {
                BrowseError::UnrecognizedMenuOrRowType(format!("{} row without {}", tag.kind, key))
            })
        };
        let selected = |id: Option<_>, what: &str| {
            id.ok_or_else(|| {
                BrowseError::UnrecognizedMenuOrRowType(format!(
                    "{} row clicked without a {} selected",
                    tag.kind, what
                ))
            })
        };

        let target = match tag.kind {
            RowKind::Media => NavTarget::RootMenu {
                slot: tag.slot().ok_or_else(|| {
                    BrowseError::UnrecognizedMenuOrRowType(format!("media row {:?}", tag.name()))
                })?,
            },
            RowKind::Root => match tag.name() {
                Some("TRACK") => NavTarget::Titles,
                Some("ARTIST") => NavTarget::Artists,
                Some("ALBUM") => NavTarget::Albums,
                Some("GENRE") => NavTarget::Genres,
                Some("PLAYLIST") => NavTarget::Playlists {
                    folder_id: ROOT_FOLDER,
                    parent_id: ROOT_FOLDER,
                },
                other => {
                    return Err(BrowseError::UnrecognizedMenuOrRowType(format!(
                        "root menu category {:?}",
                        other.unwrap_or_default()
                    )))
                }
            },
            RowKind::Artist => NavTarget::AlbumsByArtist {
                artist_id: row_id("artist_id")?,
            },
            RowKind::AlbumByArtist => NavTarget::TitlesByArtistAlbum {
                artist_id: selected(selectors.artist_id, "artist")?,
                album_id: row_id("album_id")?,
            },
            RowKind::Album => NavTarget::TitlesByAlbum {
                album_id: row_id("album_id")?,
            },
            RowKind::Genre => NavTarget::ArtistsByGenre {
                genre_id: row_id("genre_id")?,
            },
            RowKind::ArtistByGenre => NavTarget::AlbumsByGenreArtist {
                genre_id: selected(selectors.genre_id, "genre")?,
                artist_id: row_id("artist_id")?,
            },
            RowKind::AlbumByGenreArtist => NavTarget::TitlesByGenreArtistAlbum {
                genre_id: selected(selectors.genre_id, "genre")?,
                artist_id: selected(selectors.artist_id, "artist")?,
                album_id: row_id("album_id")?,
            },
            // Folder and playlist rows live in the folder on screen
            RowKind::Folder => NavTarget::Playlists {
                folder_id: row_id("folder_id")?,
                parent_id: selectors.listed_folder(),
            },
            RowKind::Playlist => NavTarget::PlaylistTracks {
                playlist_id: row_id("playlist_id")?,
                folder_id: selectors.listed_folder(),
            },
            RowKind::Title
            | RowKind::TitleByArtistAlbum
            | RowKind::TitleByAlbum
            | RowKind::TitleByGenreArtistAlbum => NavTarget::Metadata {
                track_id: row_id("track_id")?,
            },
        };
        Ok(target)
    }

    fn navigate(&mut self, target: NavTarget) -> Vec<BrowserEvent> {
        if target == NavTarget::MediaOverview {
            return self.show_media_overview();
        }
        if let Err(e) = self.issue(target) {
            e.report();
        }
        Vec::new()
    }

    /// Submit the query for `target` and record its selectors
    fn issue(&mut self, target: NavTarget) -> Result<(), BrowseError> {
        let slot = target.slot(self.state.slot).ok_or_else(|| {
            BrowseError::UnrecognizedMenuOrRowType(format!("{:?} without a slot", target))
        })?;
        let query = target.query(self.state.sort).ok_or_else(|| {
            BrowseError::UnrecognizedMenuOrRowType(format!("{:?} has no catalog query", target))
        })?;

        self.submit(CatalogRequest::new(self.state.player, slot, query))?;
        target.record_selectors(&mut self.state.selectors);
        Ok(())
    }

    /// Hand a request to the gateway, making it the pending one
    ///
    /// On refusal the previously pending query stays pending.
    fn submit(&mut self, request: CatalogRequest) -> Result<(), BrowseError> {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);

        log::debug!(
            "Browser: Requesting {} from player {} {} (request {})",
            request.query.name(),
            request.player,
            request.slot,
            request_id
        );

        let mailbox = Arc::clone(&self.mailbox);
        let on_reply: ReplyCallback = Box::new(move |reply| {
            if mailbox.deposit(ReplyEnvelope { request_id, reply }) {
                log::debug!("Browser: Reply {} replaced an undrained reply", request_id);
            }
        });

        let previous = self.pending.replace(PendingQuery {
            id: request_id,
            request: request.clone(),
        });
        if let Err(e) = self.collaborators.gateway.submit(request, on_reply) {
            self.pending = previous;
            return Err(BrowseError::from_catalog(self.state.player, e));
        }
        Ok(())
    }

    // =========================================================================
    // Replies
    // =========================================================================

    /// Apply whatever reply the mailbox holds
    ///
    /// Called by the owning context after a wake-up; cheap when empty.
    pub fn drain(&mut self) -> Vec<BrowserEvent> {
        let Some(envelope) = self.mailbox.drain() else {
            return Vec::new();
        };
        match self.apply_reply(envelope) {
            Ok(events) => events,
            Err(e) => {
                e.report();
                Vec::new()
            }
        }
    }

    fn stale(request: &CatalogRequest, reason: &'static str) -> BrowseError {
        BrowseError::StaleReply {
            player: request.player,
            query: request.query.name(),
            reason,
        }
    }

    /// Validate a reply against the pending query and apply it
    pub fn apply_reply(&mut self, envelope: ReplyEnvelope) -> Result<Vec<BrowserEvent>, BrowseError> {
        let ReplyEnvelope { request_id, reply } = envelope;

        let pending = match &self.pending {
            Some(pending) if pending.id == request_id => pending,
            Some(_) => return Err(Self::stale(&reply.request, "superseded by a newer query")),
            None => return Err(Self::stale(&reply.request, "no query pending")),
        };
        if reply.request.player != self.state.player {
            return Err(Self::stale(&reply.request, "browsing another player"));
        }
        if pending.request != reply.request {
            return Err(Self::stale(&reply.request, "echo doesn't match the pending query"));
        }
        self.pending = None;

        let CatalogReply { request, payload } = reply;
        let query_name = request.query.name();
        match (request.query, payload) {
            (CatalogQuery::RootMenu, ReplyPayload::Listing(records)) => {
                let view = projection::root_menu_view(request.slot, &records)?;
                self.state.menu = MenuKind::Root;
                self.state.slot = Some(request.slot);
                Ok(vec![BrowserEvent::RenderView(view)])
            }
            (CatalogQuery::Metadata { track_id }, ReplyPayload::Metadata(record)) => {
                let fields = projection::metadata_fields(&record);
                self.state.selectors.track_id = Some(track_id);
                Ok(vec![BrowserEvent::RenderMetadata(fields)])
            }
            (query, ReplyPayload::Listing(records)) => {
                let menu = query.menu().ok_or(BrowseError::MalformedReply {
                    query: query_name,
                    reason: "listing for a metadata query",
                })?;
                let projection = projection::list_view(menu, request.slot, &records);
                self.state.menu = menu;
                self.state.slot = Some(request.slot);
                if let CatalogQuery::Playlists { folder_id } = query {
                    self.state.selectors.listed_folder_id = Some(folder_id);
                }
                if let Some(parent_id) = projection.playlist_folder {
                    self.state.selectors.playlist_folder_id = Some(parent_id);
                }
                Ok(vec![BrowserEvent::RenderView(projection.view)])
            }
            (_, ReplyPayload::Metadata(_)) => Err(BrowseError::MalformedReply {
                query: query_name,
                reason: "metadata for a listing query",
            }),
        }
    }
}
