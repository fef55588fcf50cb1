//! Tech-Hub Core - Shared types library.
//!
//! This crate provides common types used across the Tech-Hub API:
//! type-safe entity IDs, the validated [`Email`] type, and the status
//! enums derived from catalog and payment state.
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
