//! NexusSphere site library.
//!
//! This crate provides the public website, the item pages and the JSON API
//! as a library, allowing the integration tests to drive the full router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
