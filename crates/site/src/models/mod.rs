//! Domain models for the site.
//!
//! These types represent validated domain objects separate from database row
//! types; the repositories in [`crate::db`] convert rows into them.

pub mod contact;
pub mod content;
pub mod item;
pub mod pagination;
pub mod session;
pub mod user;

pub use contact::{Contact, NewContact};
pub use content::{
    BlogPost, NewBlogPost, NewProject, NewService, NewTeamMember, PortfolioProject,
    ProjectFilter, Service, TeamMember,
};
pub use item::{Item, ItemChanges, ItemOwner, NewItem};
pub use pagination::{Page, PageError};
pub use user::{Account, NewAccount};
