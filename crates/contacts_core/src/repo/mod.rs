//! Contact store contracts and implementations.
//!
//! # Responsibility
//! - Define the `ContactStore` contract consumed by services.
//! - Isolate SQLite query details from grouping and search.
//!
//! # Invariants
//! - Store writes validate the contact before persistence.
//! - Store reads reject invalid persisted state instead of masking it.
//! - SQLite and in-memory stores share one filter/sort definition.

pub mod contact_repo;
pub mod memory;
