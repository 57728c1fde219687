//! Core types for NexusSphere.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod email;
pub mod id;
pub mod slug;
pub mod username;

pub use catalog::{BlogCategory, CatalogError, Expertise};
pub use email::{Email, EmailError};
pub use id::*;
pub use slug::{Slug, SlugError};
pub use username::{Username, UsernameError};
