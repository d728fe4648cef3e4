//! Catalog browser navigation
//!
//! ```text
//! ┌──────────┐  UserAction   ┌──────────────────┐  submit  ┌────────────────┐
//! │ UI glue  │ ────────────► │ NavigationEngine │ ───────► │ CatalogGateway │
//! │          │ ◄──────────── │ (NavigationState)│          └───────┬────────┘
//! └──────────┘  BrowserEvent └────────▲─────────┘                  │ on_reply
//!                                     │ drain                      │ (any thread)
//!                            ┌────────┴───────┐      deposit       │
//!                            │ RequestMailbox │ ◄──────────────────┘
//!                            └────────────────┘
//! ```
//!
//! The engine and its state belong to one owning context. The mailbox is
//! the only structure shared with the reply-delivery context; its wake-up
//! tells the owner to call [`NavigationEngine::drain`].

mod back;
mod engine;
mod error;
mod mailbox;
mod projection;
mod state;
mod target;
mod view;

pub use back::compute_parent;
pub use engine::{Collaborators, NavigationEngine, ReplyEnvelope, RequestId, UserAction};
pub use error::BrowseError;
pub use mailbox::{drain_wakeups, RequestMailbox};
pub use projection::{
    infer_columns, media_info_text, unwrap_menu_name, METADATA_FIELDS, MEDIA_OVERVIEW_TITLE,
};
pub use state::{NavigationState, Selectors, ROOT_FOLDER};
pub use target::NavTarget;
pub use view::{BrowserEvent, MetadataField, RowKind, RowTag, ViewDescriptor, ViewRow};
