//! User directory domain module.
//!
//! Registered accounts, login lookup and per-user order history.

pub mod directory;
pub mod user;

pub use directory::UserDirectory;
pub use user::{Password, ProfileUpdate, User};
