//! Ticket catalog domain module.
//!
//! Purchasable ticket products and their remaining availability, implemented
//! purely as deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod ticket;

pub use catalog::TicketCatalog;
pub use ticket::{CustomCategory, Ticket, TicketCategory};
