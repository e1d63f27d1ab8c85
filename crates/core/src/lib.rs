//! SimCard Core - Shared types library.
//!
//! This crate provides common types used across all SimCard inventory components:
//! - `server` - HTTP/JSON API for shops, SIM cards and statistics
//! - `cli` - Command-line tools for schema setup and user management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and lifecycle statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
