//! Domain event contract.

use chrono::{DateTime, NaiveDate, Utc};

/// A fact emitted by an aggregate decision.
///
/// Events are immutable and versioned; `event_type` is a stable dotted name
/// such as `"booking.ticket.purchased"`.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// Business time of the event.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Calendar date (UTC) of the event.
    fn occurred_on(&self) -> NaiveDate {
        self.occurred_at().date_naive()
    }
}
