//! Versioned JSON schema for persisted snapshots.
//!
//! Field names here are the stable on-disk contract. Bump [`SCHEMA_VERSION`]
//! whenever a field changes meaning or shape.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gridpass_accounts::{Password, User, UserDirectory};
use gridpass_booking::{BookingSystem, Order, OrderLedger};
use gridpass_catalog::{Ticket, TicketCatalog};
use gridpass_core::{Aggregate, DomainError, Entity, OrderId, TicketId, UserId};

use super::r#trait::StorageError;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: u64,
    pub category: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub validity: String,
    pub features: String,
    pub availability: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub order_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: u64,
    pub user_id: u64,
    pub ticket_id: u64,
    pub purchased_at: DateTime<Utc>,
    pub payment_method: String,
}

/// The whole system as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub schema_version: u32,
    pub revision: u64,
    pub next_order_id: u64,
    pub tickets: Vec<TicketRecord>,
    pub users: Vec<UserRecord>,
    pub orders: Vec<OrderRecord>,
}

impl SnapshotRecord {
    pub fn capture(system: &BookingSystem) -> Self {
        let tickets = system
            .catalog()
            .tickets()
            .iter()
            .map(|t| TicketRecord {
                id: t.id().get(),
                category: t.category().as_str().to_string(),
                price: t.price(),
                validity: t.validity().to_string(),
                features: t.features().to_string(),
                availability: t.availability(),
            })
            .collect();

        let users = system
            .directory()
            .users()
            .iter()
            .map(|u| UserRecord {
                id: u.id().get(),
                name: u.name().to_string(),
                email: u.email().to_string(),
                password: u.password().expose().to_string(),
                order_ids: u.orders().iter().map(|id| id.get()).collect(),
            })
            .collect();

        let orders = system
            .ledger()
            .iter()
            .map(|o| OrderRecord {
                id: o.id().get(),
                user_id: o.user_id().get(),
                ticket_id: o.ticket_id().get(),
                purchased_at: o.purchased_at(),
                payment_method: o.payment_method().to_string(),
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            revision: system.version(),
            next_order_id: system.ledger().next_order_id().get(),
            tickets,
            users,
            orders,
        }
    }

    /// Rebuild a live system, re-linking users, tickets and orders.
    pub fn restore(self) -> Result<BookingSystem, StorageError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(StorageError::corrupt(format!(
                "unsupported schema version {} (expected {SCHEMA_VERSION})",
                self.schema_version
            )));
        }

        let tickets = self
            .tickets
            .into_iter()
            .map(|t| {
                Ticket::new(
                    TicketId::new(t.id),
                    t.category,
                    t.price,
                    t.validity,
                    t.features,
                    t.availability,
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;
        let catalog = TicketCatalog::from_tickets(tickets).map_err(corrupt)?;

        let users = self.users.into_iter().map(|u| {
            User::new(UserId::new(u.id), u.name, u.email, Password::new(u.password))
                .with_orders(u.order_ids.into_iter().map(OrderId::new).collect())
        });
        let directory = UserDirectory::from_users(users).map_err(corrupt)?;

        let orders = self.orders.into_iter().map(|o| {
            Order::new(
                OrderId::new(o.id),
                UserId::new(o.user_id),
                TicketId::new(o.ticket_id),
                o.purchased_at,
                o.payment_method,
            )
        });
        let ledger =
            OrderLedger::from_parts(orders, OrderId::new(self.next_order_id)).map_err(corrupt)?;

        BookingSystem::from_parts(catalog, directory, ledger, self.revision).map_err(corrupt)
    }
}

fn corrupt(err: DomainError) -> StorageError {
    StorageError::corrupt(err.to_string())
}

/// Serialize a system to the on-disk representation.
pub fn encode(system: &BookingSystem) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec_pretty(&SnapshotRecord::capture(system))
        .map_err(|e| StorageError::corrupt(format!("failed to encode snapshot: {e}")))
}

/// Parse and re-link a system from the on-disk representation.
pub fn decode(bytes: &[u8]) -> Result<BookingSystem, StorageError> {
    let record: SnapshotRecord = serde_json::from_slice(bytes)
        .map_err(|e| StorageError::corrupt(format!("failed to parse snapshot: {e}")))?;
    record.restore()
}
