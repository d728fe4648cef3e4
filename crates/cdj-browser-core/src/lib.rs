//! CDJ Browser Core - navigation engine for a networked player's media catalog

pub mod browser;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod types;

pub use browser::{BrowserEvent, Collaborators, NavigationEngine, RequestMailbox, UserAction};
pub use catalog::{CatalogGateway, CatalogQuery, CatalogReply, CatalogRequest};
pub use clients::{ClientRegistry, PlaybackDispatcher};
pub use types::*;
