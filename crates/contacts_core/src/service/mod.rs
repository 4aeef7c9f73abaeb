//! Contact use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into add/delete/group/search use cases.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod contact_service;
