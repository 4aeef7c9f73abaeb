//! Contact store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/delete/query APIs over the `contacts` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Contact::validate()` before SQL mutations.
//! - Query ordering is total: sort key, then `created_at`, then `uuid`.
//! - Text matching is case-sensitive (`instr`, `=`), never `LIKE`.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, ContactValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    email,
    section_index,
    created_at
FROM contacts";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ContactValidationError),
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
    /// Store cannot serve requests right now.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::Unavailable(message) => write!(f, "contact store unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<ContactValidationError> for RepoError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Row predicate for contact queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContactFilter {
    /// Every stored contact.
    #[default]
    All,
    /// `email` or `name` contains the text (case-sensitive).
    Containing(String),
    /// `email` or `name` equals the text.
    Exact(String),
}

impl ContactFilter {
    /// Evaluates the predicate against one contact.
    pub fn matches(&self, contact: &Contact) -> bool {
        match self {
            Self::All => true,
            Self::Containing(text) => {
                contact.email.contains(text.as_str()) || contact.name.contains(text.as_str())
            }
            Self::Exact(text) => contact.email == *text || contact.name == *text,
        }
    }
}

/// Primary sort key for contact queries. Always ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContactSortKey {
    #[default]
    Name,
    Email,
    CreatedAt,
}

impl ContactSortKey {
    /// Total ordering matching the SQL `ORDER BY` produced for this key.
    pub fn compare(self, left: &Contact, right: &Contact) -> Ordering {
        let primary = match self {
            Self::Name => left.name.cmp(&right.name),
            Self::Email => left.email.cmp(&right.email),
            Self::CreatedAt => Ordering::Equal,
        };
        primary
            .then(left.created_at.cmp(&right.created_at))
            .then(left.uuid.cmp(&right.uuid))
    }

    fn order_by_sql(self) -> &'static str {
        match self {
            Self::Name => " ORDER BY name ASC, created_at ASC, uuid ASC",
            Self::Email => " ORDER BY email ASC, created_at ASC, uuid ASC",
            Self::CreatedAt => " ORDER BY created_at ASC, uuid ASC",
        }
    }
}

/// Query options for listing contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub filter: ContactFilter,
    pub sort: ContactSortKey,
    pub limit: Option<u32>,
}

impl ContactQuery {
    /// Contacts whose email or name contains `text`, sorted by name.
    pub fn containing(text: impl Into<String>) -> Self {
        Self {
            filter: ContactFilter::Containing(text.into()),
            ..Self::default()
        }
    }

    /// Contacts whose email or name equals `text`, sorted by name.
    pub fn exact(text: impl Into<String>) -> Self {
        Self {
            filter: ContactFilter::Exact(text.into()),
            ..Self::default()
        }
    }
}

/// Store interface consumed by contact services.
pub trait ContactStore {
    fn insert_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    fn delete_contact(&self, id: ContactId) -> RepoResult<()>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn query_contacts(&self, query: &ContactQuery) -> RepoResult<Vec<Contact>>;
}

/// SQLite-backed contact store.
pub struct SqliteContactStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactStore for SqliteContactStore<'_> {
    fn insert_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (
                uuid,
                name,
                email,
                section_index,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                contact.uuid.to_string(),
                contact.name.as_str(),
                contact.email.as_str(),
                contact.section_index.as_str(),
                contact.created_at,
            ],
        )?;

        Ok(contact.uuid)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn query_contacts(&self, query: &ContactQuery) -> RepoResult<Vec<Contact>> {
        let mut sql = format!("{CONTACT_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        match &query.filter {
            ContactFilter::All => {}
            ContactFilter::Containing(text) => {
                sql.push_str(" AND (instr(email, ?) > 0 OR instr(name, ?) > 0)");
                bind_values.push(Value::Text(text.clone()));
                bind_values.push(Value::Text(text.clone()));
            }
            ContactFilter::Exact(text) => {
                sql.push_str(" AND (email = ? OR name = ?)");
                bind_values.push(Value::Text(text.clone()));
                bind_values.push(Value::Text(text.clone()));
            }
        }

        sql.push_str(query.sort.order_by_sql());

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in contacts.uuid"))
    })?;

    let contact = Contact {
        uuid,
        name: row.get("name")?,
        email: row.get("email")?,
        section_index: row.get("section_index")?,
        created_at: row.get("created_at")?,
    };
    contact
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("contact {uuid}: {err}")))?;
    Ok(contact)
}
