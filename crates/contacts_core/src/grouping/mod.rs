//! Indexed grouping of contacts by name initial.
//!
//! # Responsibility
//! - Partition contacts into alphabetically ordered sections.
//! - Drive the pick-one-contact selection protocol over those sections.
//!
//! # Invariants
//! - Sections are rebuilt from scratch on every call; nothing is cached.
//! - Grouping never mutates its input.

pub mod sections;
pub mod selection;
