//! Section building for the indexed contact list.
//!
//! # Invariants
//! - Sections are sorted by `key` ascending (ordinal string order).
//! - Members are sorted by `name` ascending; equal names keep input order.
//! - Every input contact appears in exactly one section.

use crate::model::contact::{section_index_for, Contact};
use log::debug;
use std::collections::BTreeMap;

/// One group of contacts sharing a name initial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Uppercased first character shared by every member's name.
    pub key: String,
    /// Header text. Same as `key`.
    pub title: String,
    pub members: Vec<Contact>,
}

/// Groups contacts into sections keyed by the uppercased name initial.
///
/// A contact with an empty name trips a debug assertion; release builds
/// place it in a section with an empty key.
pub fn build_sections<'a, I>(contacts: I) -> Vec<Section>
where
    I: IntoIterator<Item = &'a Contact>,
{
    let mut partitions: BTreeMap<String, Vec<Contact>> = BTreeMap::new();
    let mut total = 0usize;

    for contact in contacts {
        debug_assert!(
            !contact.name.is_empty(),
            "contact {} has an empty name and cannot be grouped",
            contact.uuid
        );
        partitions
            .entry(section_index_for(&contact.name))
            .or_default()
            .push(contact.clone());
        total += 1;
    }

    let sections = partitions
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by(|left, right| left.name.cmp(&right.name));
            Section {
                title: key.clone(),
                key,
                members,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "event=sections_build module=grouping status=ok contacts={total} sections={}",
        sections.len()
    );
    sections
}

/// Returns the sidebar index titles, one per section, in section order.
pub fn section_index_titles(sections: &[Section]) -> Vec<String> {
    sections.iter().map(|section| section.key.clone()).collect()
}
