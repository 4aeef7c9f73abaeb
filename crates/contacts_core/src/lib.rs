//! Core domain logic for the contact list and recipient search.
//! This crate is the single source of truth for contact invariants.

pub mod compose;
pub mod db;
pub mod grouping;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use compose::mailto_uri;
pub use grouping::sections::{build_sections, section_index_titles, Section};
pub use grouping::selection::{
    ContactSelection, ContactSelectionObserver, RowPath, SelectionError, SelectionState,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{section_index_for, Contact, ContactId, ContactValidationError};
pub use model::email::{detect_links, is_valid_email, LinkMatch};
pub use repo::contact_repo::{
    ContactFilter, ContactQuery, ContactSortKey, ContactStore, RepoError, RepoResult,
    SqliteContactStore,
};
pub use repo::memory::MemoryContactStore;
pub use search::suggest::suggest;
pub use search::token::{resolve_token, TokenResolution};
pub use search::token_field::{
    AppliedEdits, EditDecision, EditRange, TokenField, TokenFieldEdit, DEFAULT_MAX_TOKEN_COUNT,
    TOKEN_SEPARATORS,
};
pub use service::contact_service::ContactService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
