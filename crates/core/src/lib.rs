//! NexusSphere Core - Shared types library.
//!
//! This crate provides the types shared by every NexusSphere component:
//! - `site` - Public website, item CRUD pages and the JSON API
//! - `cli` - Command-line tools for migrations, accounts and content
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The ownership rule lives here so that the HTML pages and the
//! JSON API evaluate exactly the same code.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, usernames, slugs and catalogs
//! - [`permissions`] - The "owner or staff may mutate" rule
//! - [`validation`] - Field-keyed validation error collection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod permissions;
pub mod types;
pub mod validation;

pub use permissions::{Actor, Owned, can_mutate};
pub use types::*;
pub use validation::FieldErrors;
