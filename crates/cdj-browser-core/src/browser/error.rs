//! Browse errors
//!
//! None of these reach the caller of a UI action. The engine reports them
//! to the log and leaves navigation state as it was.

use crate::catalog::CatalogError;
use crate::types::PlayerNumber;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrowseError {
    /// Reply for a query that is no longer the pending one
    #[error("stale {query} reply for player {player}: {reason}")]
    StaleReply {
        player: PlayerNumber,
        query: &'static str,
        reason: &'static str,
    },

    /// Catalog or client registry couldn't resolve the player
    #[error("player {player} unavailable: {reason}")]
    MissingCollaborator { player: PlayerNumber, reason: String },

    #[error("precondition unmet: {0}")]
    PreconditionUnmet(&'static str),

    #[error("unrecognized menu or row type: {0}")]
    UnrecognizedMenuOrRowType(String),

    /// Reply whose payload doesn't fit its query
    #[error("malformed {query} reply: {reason}")]
    MalformedReply {
        query: &'static str,
        reason: &'static str,
    },
}

impl BrowseError {
    pub fn from_catalog(player: PlayerNumber, err: CatalogError) -> Self {
        BrowseError::MissingCollaborator {
            player,
            reason: err.to_string(),
        }
    }

    /// Log at the level this kind of error deserves
    pub fn report(&self) {
        match self {
            BrowseError::StaleReply { .. } => log::debug!("Browser: Discarding {}", self),
            _ => log::warn!("Browser: {}", self),
        }
    }
}
