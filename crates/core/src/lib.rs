//! `gridpass-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog,
//! account and booking crates (no IO, no clock, no storage).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod event;
pub mod id;
pub mod value_object;

pub use aggregate::Aggregate;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{OrderId, TicketId, UserId};
pub use value_object::ValueObject;
