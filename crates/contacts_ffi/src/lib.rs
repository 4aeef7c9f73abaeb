//! Flutter-facing FFI surface for the contact core.

pub mod api;
