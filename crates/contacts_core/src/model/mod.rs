//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record shared by grouping and search.
//! - Own the email-validity predicate used to gate contact creation.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - A contact with an empty name or invalid email is never constructed.
//! - Contacts are never mutated in place; they are created and deleted.

pub mod contact;
pub mod email;
