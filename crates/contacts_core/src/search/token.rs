//! Display resolution for confirmed tokens.

use crate::model::contact::Contact;
use crate::repo::contact_repo::{ContactFilter, ContactSortKey};

/// What a confirmed token resolves to when displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenResolution {
    /// Token text matched a contact's email or name.
    Contact { email: String },
    /// No contact matched; shown as an invalid recipient.
    Invalid,
}

impl TokenResolution {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Contact { .. })
    }

    /// Resolved email, if any.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Contact { email } => Some(email.as_str()),
            Self::Invalid => None,
        }
    }
}

/// Resolves `text` against `contacts` by exact email or name.
///
/// When several contacts match, the first by name order wins.
pub fn resolve_token<'a, I>(text: &str, contacts: I) -> TokenResolution
where
    I: IntoIterator<Item = &'a Contact>,
{
    let filter = ContactFilter::Exact(text.to_string());
    contacts
        .into_iter()
        .filter(|contact| filter.matches(contact))
        .min_by(|left, right| ContactSortKey::Name.compare(left, right))
        .map_or(TokenResolution::Invalid, |contact| TokenResolution::Contact {
            email: contact.email.clone(),
        })
}
