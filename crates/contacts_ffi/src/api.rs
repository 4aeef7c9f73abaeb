//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose contact add/delete, indexed sections and recipient search to
//!   Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Read APIs degrade to empty results instead of returning errors.

use contacts_core::db::open_db;
use contacts_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    is_valid_email as is_valid_email_inner, mailto_uri, ping as ping_inner, Contact,
    ContactService, EditDecision, EditRange, RepoResult, Section, SqliteContactStore, TokenField,
    TokenResolution,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const CONTACTS_DB_FILE_NAME: &str = "contacts.sqlite3";
const CONTACTS_DB_PATH_ENV: &str = "CONTACTS_DB_PATH";
static CONTACTS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Contact row shown in lists and sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    /// Stable contact ID in string form.
    pub contact_id: String,
    pub name: String,
    pub email: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// One indexed section of the selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSectionItem {
    pub key: String,
    pub title: String,
    pub members: Vec<ContactItem>,
}

/// Generic action response envelope for contact mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected contact ID, when known.
    pub contact_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: String) -> Self {
        Self {
            ok: true,
            contact_id: Some(contact_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// Display form of one confirmed recipient token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDisplayItem {
    /// Resolved email, or the token text as given when unresolved.
    pub text: String,
    pub valid: bool,
}

/// Returns whether `text` is a bare email address acceptable for a contact.
#[flutter_rust_bridge::frb(sync)]
pub fn is_valid_email(text: String) -> bool {
    is_valid_email_inner(&text)
}

/// Adds a contact after validating name and email.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns created contact ID on success; validation failures return
///   `ok=false` and store nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_add(name: String, email: String) -> ContactActionResponse {
    match with_contact_service(|service| service.add_contact(name, email)) {
        Ok(contact) => ContactActionResponse::success("Contact added.", contact.uuid.to_string()),
        Err(err) => ContactActionResponse::failure(format!("contact_add failed: {err}")),
    }
}

/// Deletes a contact by ID.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(contact_id: String) -> ContactActionResponse {
    let Ok(id) = Uuid::parse_str(contact_id.trim()) else {
        return ContactActionResponse::failure(format!(
            "contact_delete failed: invalid contact id `{contact_id}`"
        ));
    };

    match with_contact_service(|service| service.delete_contact(id)) {
        Ok(()) => ContactActionResponse::success("Contact deleted.", id.to_string()),
        Err(err) => ContactActionResponse::failure(format!("contact_delete failed: {err}")),
    }
}

/// Returns indexed sections for the selection list.
///
/// # FFI contract
/// - Never fails; store errors yield an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_sections() -> Vec<ContactSectionItem> {
    read_with_contact_service(|service| service.sections())
        .into_iter()
        .map(to_section_item)
        .collect()
}

/// Returns email suggestions for the live search query.
///
/// # FFI contract
/// - Call on every query change; each call is a fresh scan.
/// - Emails present in `tokens` are never returned.
/// - Never fails; store errors yield an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn search_suggest(query: String, tokens: Vec<String>) -> Vec<String> {
    read_with_contact_service(|service| service.suggest(&query, &tokens))
}

/// Resolves confirmed tokens to their display form, in input order.
#[flutter_rust_bridge::frb(sync)]
pub fn search_resolve_tokens(tokens: Vec<String>) -> Vec<TokenDisplayItem> {
    let resolutions = read_with_contact_service(|service| {
        tokens
            .iter()
            .map(|token| service.resolve_token(token))
            .collect::<Vec<_>>()
    });

    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| match resolutions.get(index) {
            Some(TokenResolution::Contact { email }) => TokenDisplayItem {
                text: email.clone(),
                valid: true,
            },
            _ => TokenDisplayItem {
                text: token.clone(),
                valid: false,
            },
        })
        .collect()
}

/// Builds the `mailto:` URI for the confirmed tokens.
///
/// Returns `None` when there are no tokens.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_mailto(tokens: Vec<String>) -> Option<String> {
    mailto_uri(&tokens)
}

/// One input event from the host's recipient field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenFieldEvent {
    /// Live text changed; a trailing separator confirms a token.
    TextChanged { text: String },
    Return { text: String },
    EndEditing { text: String },
    /// Clear button: drops every token and the text.
    Clear,
    SuggestionSelected { suggestion: String },
    /// Replacement request. Negative `location` addresses tokens from the end.
    Replace {
        location: i64,
        length: u32,
        replacement: String,
    },
}

/// Field state after one event has been handled and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFieldStateItem {
    pub tokens: Vec<String>,
    pub text: String,
    /// `allow`, `removal_scheduled` or `not_permitted` for `Replace`; `allow`
    /// for every other event.
    pub decision: String,
    pub tokens_changed: bool,
    /// The search query changed; call `search_suggest` again.
    pub text_changed: bool,
    pub mailto: Option<String>,
}

/// Runs one field event through the token confirm/remove/capacity policy.
///
/// # FFI contract
/// - Stateless: the host passes current `tokens` + `text` and stores the result.
/// - `max_token_count = None` means no limit.
/// - On `Replace` with `allow` the host applies the replacement text itself.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn token_field_apply(
    tokens: Vec<String>,
    text: String,
    max_token_count: Option<u32>,
    event: TokenFieldEvent,
) -> TokenFieldStateItem {
    let max = max_token_count.map(|max| max as usize);
    let mut field = TokenField::with_state(tokens, text, max);

    let decision = match event {
        TokenFieldEvent::TextChanged { text } => {
            field.handle_text_change(&text);
            EditDecision::Allow
        }
        TokenFieldEvent::Return { text } => {
            field.handle_return(&text);
            EditDecision::Allow
        }
        TokenFieldEvent::EndEditing { text } => {
            field.handle_end_editing(&text);
            EditDecision::Allow
        }
        TokenFieldEvent::Clear => {
            field.handle_clear();
            EditDecision::Allow
        }
        TokenFieldEvent::SuggestionSelected { suggestion } => {
            field.handle_suggestion_selected(&suggestion);
            EditDecision::Allow
        }
        TokenFieldEvent::Replace {
            location,
            length,
            replacement,
        } => match isize::try_from(location) {
            Ok(location) => {
                field.handle_replace(EditRange::new(location, length as usize), &replacement)
            }
            Err(_) => EditDecision::NotPermitted,
        },
    };

    let applied = field.apply_pending();
    TokenFieldStateItem {
        mailto: field.mailto_uri(),
        tokens: field.tokens().to_vec(),
        text: field.text().to_string(),
        decision: decision_label(decision).to_string(),
        tokens_changed: applied.tokens_changed,
        text_changed: applied.text_changed,
    }
}

fn decision_label(decision: EditDecision) -> &'static str {
    match decision {
        EditDecision::Allow => "allow",
        EditDecision::RemovalScheduled => "removal_scheduled",
        EditDecision::NotPermitted => "not_permitted",
    }
}

fn resolve_contacts_db_path() -> PathBuf {
    CONTACTS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(CONTACTS_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(CONTACTS_DB_FILE_NAME)
        })
        .clone()
}

fn with_contact_service<T>(
    f: impl FnOnce(&ContactService<SqliteContactStore<'_>>) -> RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_contacts_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("contacts DB open failed: {err}"))?;
    let service = ContactService::new(SqliteContactStore::new(&conn));
    f(&service).map_err(|err| err.to_string())
}

fn read_with_contact_service<T: Default>(
    f: impl FnOnce(&ContactService<SqliteContactStore<'_>>) -> T,
) -> T {
    let db_path = resolve_contacts_db_path();
    match open_db(&db_path) {
        Ok(conn) => f(&ContactService::new(SqliteContactStore::new(&conn))),
        Err(err) => {
            warn!("event=ffi_read module=ffi status=degraded error_code=db_open_failed error={err}");
            T::default()
        }
    }
}

fn to_section_item(section: Section) -> ContactSectionItem {
    ContactSectionItem {
        key: section.key,
        title: section.title,
        members: section.members.into_iter().map(to_contact_item).collect(),
    }
}

fn to_contact_item(contact: Contact) -> ContactItem {
    ContactItem {
        contact_id: contact.uuid.to_string(),
        name: contact.name,
        email: contact.email,
        created_at: contact.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        compose_mailto, contact_add, contact_delete, contact_sections, core_version,
        init_logging, is_valid_email, ping, search_resolve_tokens, search_suggest,
        token_field_apply, TokenFieldEvent,
    };
    use contacts_core::db::open_db;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn is_valid_email_follows_core_predicate() {
        assert!(is_valid_email("user@example.com".to_string()));
        assert!(!is_valid_email("mailto:user@example.com".to_string()));
    }

    #[test]
    fn contact_add_rejects_invalid_email() {
        let response = contact_add("Ada".to_string(), "not-an-email".to_string());
        assert!(!response.ok);
        assert!(response.contact_id.is_none());
        assert!(response.message.contains("invalid email"));
    }

    #[test]
    fn contact_add_then_suggest_then_delete() {
        let local = unique_token("ffi");
        let email = format!("{local}@example.com");
        let created = contact_add(format!("Zz {local}"), email.clone());
        assert!(created.ok, "{}", created.message);
        let contact_id = created.contact_id.expect("created contact should return id");

        assert_eq!(search_suggest(local.clone(), Vec::new()), vec![email.clone()]);
        assert!(search_suggest(local.clone(), vec![email.clone()]).is_empty());

        let sections = contact_sections();
        let section = sections
            .iter()
            .find(|section| section.key == "Z")
            .expect("section Z should exist");
        assert!(section
            .members
            .iter()
            .any(|member| member.contact_id == contact_id));

        let resolved = search_resolve_tokens(vec![email.clone(), "nobody".to_string()]);
        assert!(resolved[0].valid);
        assert_eq!(resolved[0].text, email);
        assert!(!resolved[1].valid);

        let deleted = contact_delete(contact_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(search_suggest(local, Vec::new()).is_empty());

        let missing = contact_delete(contact_id);
        assert!(!missing.ok);
    }

    #[test]
    fn contact_add_persists_section_index() {
        let local = unique_token("ffi-section");
        let created = contact_add(format!("émile {local}"), format!("{local}@example.com"));
        assert!(created.ok, "{}", created.message);
        let contact_id = created.contact_id.expect("created contact should return id");

        let conn = open_db(super::resolve_contacts_db_path()).expect("open db");
        let section_index: rusqlite::Result<String> = conn.query_row(
            "SELECT section_index FROM contacts WHERE uuid = ?1",
            [contact_id.as_str()],
            |row| row.get(0),
        );
        assert_eq!(section_index.expect("query contact row"), "É");

        assert!(contact_delete(contact_id).ok);
    }

    #[test]
    fn contact_delete_rejects_malformed_id() {
        let response = contact_delete("not-a-uuid".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("invalid contact id"));
    }

    #[test]
    fn compose_mailto_joins_tokens() {
        assert_eq!(compose_mailto(Vec::new()), None);
        assert_eq!(
            compose_mailto(vec!["a@x.com".to_string(), "b@x.com".to_string()]).as_deref(),
            Some("mailto:a@x.com,b@x.com")
        );
    }

    #[test]
    fn token_field_separator_confirms_and_trims() {
        let state = token_field_apply(
            Vec::new(),
            String::new(),
            Some(3),
            TokenFieldEvent::TextChanged {
                text: "  a@x.com ;".to_string(),
            },
        );
        assert_eq!(state.tokens, vec!["a@x.com".to_string()]);
        assert_eq!(state.text, "");
        assert!(state.tokens_changed);
        assert_eq!(state.mailto.as_deref(), Some("mailto:a@x.com"));
    }

    #[test]
    fn token_field_rejects_text_at_capacity() {
        let tokens = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let state = token_field_apply(
            tokens.clone(),
            String::new(),
            Some(2),
            TokenFieldEvent::Replace {
                location: 0,
                length: 0,
                replacement: "c".to_string(),
            },
        );
        assert_eq!(state.decision, "not_permitted");
        assert_eq!(state.tokens, tokens);
        assert!(!state.tokens_changed);
    }

    #[test]
    fn token_field_removes_trailing_range() {
        let tokens = vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "c@x.com".to_string(),
        ];
        let state = token_field_apply(
            tokens.clone(),
            String::new(),
            None,
            TokenFieldEvent::Replace {
                location: -2,
                length: 2,
                replacement: String::new(),
            },
        );
        assert_eq!(state.decision, "removal_scheduled");
        assert_eq!(state.tokens, vec!["a@x.com".to_string()]);

        let rejected = token_field_apply(
            tokens.clone(),
            String::new(),
            None,
            TokenFieldEvent::Replace {
                location: -4,
                length: 2,
                replacement: String::new(),
            },
        );
        assert_eq!(rejected.decision, "not_permitted");
        assert_eq!(rejected.tokens, tokens);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}{nanos}")
    }
}
