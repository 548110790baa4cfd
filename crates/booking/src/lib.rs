//! Booking domain module: order ledger and booking engine.
//!
//! `BookingSystem` is the whole in-memory snapshot (catalog, directory,
//! ledger). Purchases and cancellations are decided purely in `handle` and
//! applied in `apply`, so each one lands completely or not at all.

pub mod discount;
pub mod ledger;
pub mod order;
pub mod report;
pub mod system;

pub use discount::{DiscountRate, discounted_price};
pub use ledger::OrderLedger;
pub use order::Order;
pub use report::sales_per_day;
pub use system::{
    BookingCommand, BookingEvent, BookingSystem, CancelOrder, OrderCancelled, PurchaseTicket,
    TicketPurchased,
};
