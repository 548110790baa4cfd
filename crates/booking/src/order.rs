use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use gridpass_core::{Entity, OrderId, TicketId, UserId};

/// A single ticket purchase.
///
/// Immutable once created; it only ever disappears (cancellation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    ticket_id: TicketId,
    purchased_at: DateTime<Utc>,
    payment_method: String,
}

impl Order {
    pub fn new(
        id: OrderId,
        user_id: UserId,
        ticket_id: TicketId,
        purchased_at: DateTime<Utc>,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            ticket_id,
            purchased_at,
            payment_method: payment_method.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    pub fn purchased_at(&self) -> DateTime<Utc> {
        self.purchased_at
    }

    /// Calendar date (UTC) of the purchase.
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date_naive()
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}
