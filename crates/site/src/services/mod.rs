//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `contact` - Contact form validation and capture
//! - `brochure` - Company brochure document and its renderers
//! - `sitemap` - `sitemap.xml` entry assembly

pub mod auth;
pub mod brochure;
pub mod contact;
pub mod sitemap;
