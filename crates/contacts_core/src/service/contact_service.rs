//! Contact use-case service.
//!
//! # Responsibility
//! - Provide validated add/delete entry points for core callers.
//! - Feed grouping and token search from the store.
//!
//! # Invariants
//! - Contacts are validated before they reach the store.
//! - Read paths used by grouping and search never fail: store query errors
//!   are logged and surfaced as empty results.
//! - Service layer remains storage-agnostic.

use crate::grouping::sections::{build_sections, Section};
use crate::grouping::selection::ContactSelection;
use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{ContactQuery, ContactStore, RepoResult};
use crate::search::suggest::suggest;
use crate::search::token::{resolve_token, TokenResolution};
use crate::search::token_field::TokenField;
use log::{info, warn};

/// Use-case service wrapper over a contact store.
pub struct ContactService<S: ContactStore> {
    store: S,
}

impl<S: ContactStore> ContactService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and stores a new contact.
    ///
    /// # Errors
    /// - `RepoError::Validation` for an empty name or invalid email; nothing
    ///   is stored.
    /// - Store errors unchanged.
    pub fn add_contact(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<Contact> {
        let contact = Contact::new(name, email)?;
        self.store.insert_contact(&contact)?;
        info!(
            "event=contact_add module=service status=ok contact_id={}",
            contact.uuid
        );
        Ok(contact)
    }

    /// Deletes a contact by ID.
    pub fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        self.store.delete_contact(id)?;
        info!("event=contact_delete module=service status=ok contact_id={id}");
        Ok(())
    }

    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        self.store.get_contact(id)
    }

    /// Lists every contact sorted by name.
    pub fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        self.store.query_contacts(&ContactQuery::default())
    }

    /// Builds the indexed sections for the current contact set.
    pub fn sections(&self) -> Vec<Section> {
        let contacts = self.query_or_empty(&ContactQuery::default(), "sections");
        build_sections(&contacts)
    }

    /// Presents the current contact set on `selection`.
    pub fn present_selection(
        &self,
        selection: &mut ContactSelection,
        current_selection: Option<&Contact>,
    ) {
        let contacts = self.query_or_empty(&ContactQuery::default(), "selection");
        selection.present(&contacts, current_selection);
    }

    /// Suggests emails matching `query` that are not yet tokens.
    pub fn suggest(&self, query: &str, existing_tokens: &[String]) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        let contacts = self.query_or_empty(&ContactQuery::containing(query), "suggest");
        suggest(query, &contacts, existing_tokens)
    }

    /// Suggestions for the field's current text and tokens.
    pub fn suggest_for(&self, field: &TokenField) -> Vec<String> {
        self.suggest(field.text(), field.tokens())
    }

    /// Resolves a confirmed token for display.
    pub fn resolve_token(&self, text: &str) -> TokenResolution {
        let contacts = self.query_or_empty(&ContactQuery::exact(text), "resolve_token");
        resolve_token(text, &contacts)
    }

    fn query_or_empty(&self, query: &ContactQuery, event: &str) -> Vec<Contact> {
        match self.store.query_contacts(query) {
            Ok(contacts) => contacts,
            Err(err) => {
                warn!(
                    "event={event} module=service status=degraded error_code=store_query_failed error={err}"
                );
                Vec::new()
            }
        }
    }
}
