//! Token search over contacts.
//!
//! # Responsibility
//! - Produce email suggestions for a live query.
//! - Own the token field editing policy (confirm, remove, capacity).
//! - Resolve confirmed token text back to a contact email.

pub mod suggest;
pub mod token;
pub mod token_field;
