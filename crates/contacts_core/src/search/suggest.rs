//! Suggestion list for the recipient search field.
//!
//! # Invariants
//! - Matching is case-sensitive substring containment on `email` or `name`.
//! - Output is sorted ascending by ordinal string order.
//! - Emails already confirmed as tokens are never suggested.
//! - Every call is a fresh full scan; no index is kept between calls.

use crate::model::contact::Contact;
use crate::repo::contact_repo::ContactFilter;

/// Returns candidate emails for `query`, excluding `existing_tokens`.
///
/// Returns an empty list for an empty query.
pub fn suggest<'a, I>(query: &str, contacts: I, existing_tokens: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = &'a Contact>,
{
    if query.is_empty() {
        return Vec::new();
    }

    let filter = ContactFilter::Containing(query.to_string());
    let mut candidates = contacts
        .into_iter()
        .filter(|contact| filter.matches(contact))
        .map(|contact| contact.email.clone())
        .collect::<Vec<_>>();

    candidates.sort();
    candidates.retain(|email| !existing_tokens.contains(email));
    candidates
}
