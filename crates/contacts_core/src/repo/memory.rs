//! In-memory contact store.
//!
//! Uses `RefCell` for interior mutability since the contact core is
//! single-threaded; this keeps `ContactStore` on `&self` like the SQLite store.

use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{ContactQuery, ContactStore, RepoError, RepoResult};
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: RefCell<Vec<Contact>>,
    simulate_query_error: Cell<bool>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent query fail with `RepoError::Unavailable`.
    pub fn set_simulate_query_error(&self, simulate: bool) {
        self.simulate_query_error.set(simulate);
    }

    pub fn len(&self) -> usize {
        self.contacts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.borrow().is_empty()
    }
}

impl ContactStore for MemoryContactStore {
    fn insert_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;
        self.contacts.borrow_mut().push(contact.clone());
        Ok(contact.uuid)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let mut contacts = self.contacts.borrow_mut();
        let position = contacts
            .iter()
            .position(|contact| contact.uuid == id)
            .ok_or(RepoError::NotFound(id))?;
        contacts.remove(position);
        Ok(())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        Ok(self
            .contacts
            .borrow()
            .iter()
            .find(|contact| contact.uuid == id)
            .cloned())
    }

    fn query_contacts(&self, query: &ContactQuery) -> RepoResult<Vec<Contact>> {
        if self.simulate_query_error.get() {
            return Err(RepoError::Unavailable("simulated query failure".to_string()));
        }

        let mut matched = self
            .contacts
            .borrow()
            .iter()
            .filter(|contact| query.filter.matches(contact))
            .cloned()
            .collect::<Vec<_>>();
        matched.sort_by(|left, right| query.sort.compare(left, right));

        if let Some(limit) = query.limit {
            matched.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(matched)
    }
}
