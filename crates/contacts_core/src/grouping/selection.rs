//! Pick-one-contact selection over grouped sections.
//!
//! # Responsibility
//! - Present grouped contacts and report a single pick to one observer.
//! - Track the caller's current selection as an advisory row marker.
//!
//! # Invariants
//! - A pick notifies the observer exactly once and returns to `Idle`.
//! - Cancel returns to `Idle` without notifying.
//! - The observer is held weakly; its lifetime is owned by the caller.

use crate::grouping::sections::{build_sections, Section};
use crate::model::contact::{Contact, ContactId};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

/// Receiver of selection results.
pub trait ContactSelectionObserver {
    fn contact_selected(&self, contact: &Contact);
}

/// Lifecycle state of a [`ContactSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Nothing displayed, no pick pending.
    Idle,
    /// Sections displayed, waiting for a pick or cancel.
    Presenting,
}

/// Address of one row inside the section list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPath {
    pub section: usize,
    pub row: usize,
}

impl RowPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// `pick` was called while no list is presented.
    NotPresenting,
    /// The row path does not address a contact in the presented sections.
    RowOutOfRange(RowPath),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPresenting => write!(f, "no contact list is being presented"),
            Self::RowOutOfRange(path) => write!(
                f,
                "row {} in section {} does not exist",
                path.row, path.section
            ),
        }
    }
}

impl Error for SelectionError {}

/// Selection controller for the indexed contact list.
pub struct ContactSelection {
    state: SelectionState,
    sections: Vec<Section>,
    current_selection: Option<ContactId>,
    observer: Option<Weak<dyn ContactSelectionObserver>>,
}

impl Default for ContactSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactSelection {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
            sections: Vec::new(),
            current_selection: None,
            observer: None,
        }
    }

    /// Registers the single observer, replacing any previous one.
    ///
    /// Only a weak reference is kept.
    pub fn set_observer<O>(&mut self, observer: &Rc<O>)
    where
        O: ContactSelectionObserver + 'static,
    {
        let weak: Weak<O> = Rc::downgrade(observer);
        self.observer = Some(weak);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Sections shown while presenting; empty when idle.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Builds sections from `contacts` and enters `Presenting`.
    ///
    /// Presenting again while already presenting rebuilds the sections.
    pub fn present(&mut self, contacts: &[Contact], current_selection: Option<&Contact>) {
        self.sections = build_sections(contacts);
        self.current_selection = current_selection.map(|contact| contact.uuid);
        self.state = SelectionState::Presenting;
        debug!(
            "event=selection_present module=grouping status=ok sections={}",
            self.sections.len()
        );
    }

    pub fn contact_at(&self, path: RowPath) -> Option<&Contact> {
        self.sections
            .get(path.section)
            .and_then(|section| section.members.get(path.row))
    }

    /// Returns whether the row shows the caller's current selection.
    pub fn is_current_selection(&self, path: RowPath) -> bool {
        match (self.contact_at(path), self.current_selection) {
            (Some(contact), Some(selected)) => contact.uuid == selected,
            _ => false,
        }
    }

    /// Picks the contact at `path`, notifies the observer and returns to `Idle`.
    ///
    /// # Errors
    /// - `NotPresenting` when called while idle.
    /// - `RowOutOfRange` when `path` does not address a presented contact.
    ///
    /// Errors leave the state unchanged and notify nobody.
    pub fn pick(&mut self, path: RowPath) -> Result<Contact, SelectionError> {
        if self.state != SelectionState::Presenting {
            return Err(SelectionError::NotPresenting);
        }

        let picked = self
            .contact_at(path)
            .cloned()
            .ok_or(SelectionError::RowOutOfRange(path))?;

        self.dismiss();
        match self.observer.as_ref().and_then(Weak::upgrade) {
            Some(observer) => observer.contact_selected(&picked),
            None => debug!("event=selection_pick module=grouping status=ok observer=none"),
        }

        info!("event=selection_pick module=grouping status=ok");
        Ok(picked)
    }

    /// Dismisses the list without reporting a pick.
    pub fn cancel(&mut self) {
        if self.state == SelectionState::Presenting {
            debug!("event=selection_cancel module=grouping status=ok");
        }
        self.dismiss();
    }

    fn dismiss(&mut self) {
        self.state = SelectionState::Idle;
        self.sections.clear();
        self.current_selection = None;
    }
}
