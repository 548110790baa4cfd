//! Booking service: the single entry point for a presentation layer.
//!
//! The service owns the snapshot behind one exclusive lock, so purchases,
//! cancellations, account edits, saves and loads never interleave. A save
//! always observes a consistent snapshot.
//!
//! ```text
//! caller ─► BookingService ─► Mutex<BookingSystem> ─► handle/apply
//!                  │
//!                  └─► SnapshotStore (save / load, whole snapshot only)
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, RwLock};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use gridpass_accounts::{ProfileUpdate, User};
use gridpass_booking::{BookingSystem, DiscountRate, Order};
use gridpass_catalog::{Ticket, TicketCatalog};
use gridpass_core::{DomainError, OrderId, TicketId, UserId};

use crate::config::BookingConfig;
use crate::snapshot_store::{JsonFileSnapshotStore, SnapshotStore, StorageError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("booking state lock poisoned")]
    LockPoisoned,
}

impl ServiceError {
    /// The domain failure, if this is one.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Thread-safe facade over one booking system and its snapshot store.
#[derive(Debug)]
pub struct BookingService<S> {
    system: Mutex<BookingSystem>,
    discount_rate: RwLock<DiscountRate>,
    store: S,
}

impl BookingService<JsonFileSnapshotStore> {
    /// Open the configured data file, or start fresh when none exists yet.
    pub fn open(config: &BookingConfig) -> anyhow::Result<Self> {
        let store = JsonFileSnapshotStore::new(&config.data_file);

        let system = if store.exists() {
            store.load().with_context(|| {
                format!("failed to load snapshot from {}", config.data_file.display())
            })?
        } else if config.seed_catalog {
            tracing::info!(path = %config.data_file.display(), "no snapshot found; seeding catalog");
            BookingSystem::seeded().context("failed to seed ticket catalog")?
        } else {
            tracing::info!(path = %config.data_file.display(), "no snapshot found; starting empty");
            BookingSystem::new(TicketCatalog::new())
        };

        Ok(Self::new(system, store, config.discount_rate))
    }
}

impl<S> BookingService<S>
where
    S: SnapshotStore,
{
    pub fn new(system: BookingSystem, store: S, discount_rate: DiscountRate) -> Self {
        Self {
            system: Mutex::new(system),
            discount_rate: RwLock::new(discount_rate),
            store,
        }
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, BookingSystem>> {
        self.system.lock().map_err(|_| ServiceError::LockPoisoned)
    }

    // ── accounts ────────────────────────────────────────────────────────────

    pub fn register(&self, name: &str, email: &str, password: &str) -> ServiceResult<User> {
        let mut system = self.lock()?;
        Ok(system.register(name, email, password)?.clone())
    }

    pub fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let system = self.lock()?;
        Ok(system.authenticate(email, password)?.clone())
    }

    pub fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> ServiceResult<User> {
        let mut system = self.lock()?;
        Ok(system.update_profile(user_id, update)?.clone())
    }

    // ── booking ─────────────────────────────────────────────────────────────

    pub fn purchase(
        &self,
        user_id: UserId,
        ticket_id: TicketId,
        payment_method: &str,
    ) -> ServiceResult<Order> {
        let mut system = self.lock()?;
        Ok(system.purchase(user_id, ticket_id, payment_method, Utc::now())?)
    }

    pub fn cancel(&self, user_id: UserId, order_id: OrderId) -> ServiceResult<Order> {
        let mut system = self.lock()?;
        Ok(system.cancel(user_id, order_id, Utc::now())?)
    }

    pub fn list_tickets(&self) -> ServiceResult<Vec<Ticket>> {
        let system = self.lock()?;
        Ok(system.list_tickets().to_vec())
    }

    pub fn list_orders_for_user(&self, user_id: UserId) -> ServiceResult<Vec<Order>> {
        let system = self.lock()?;
        Ok(system
            .orders_for_user(user_id)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Price of one of `user_id`'s orders at the discount rate in force now.
    pub fn discounted_price(&self, user_id: UserId, order_id: OrderId) -> ServiceResult<Decimal> {
        let rate = self.discount_rate()?;
        let system = self.lock()?;
        let order = system.get_order(user_id, order_id)?;
        Ok(system.discounted_price(order, rate)?)
    }

    pub fn sales_per_day(&self) -> ServiceResult<BTreeMap<NaiveDate, usize>> {
        let system = self.lock()?;
        Ok(system.sales_per_day())
    }

    // ── administration ──────────────────────────────────────────────────────

    pub fn discount_rate(&self) -> ServiceResult<DiscountRate> {
        self.discount_rate
            .read()
            .map(|r| *r)
            .map_err(|_| ServiceError::LockPoisoned)
    }

    /// Change the group discount rate. Rates outside (0, 1) are rejected and
    /// leave the current rate in place.
    pub fn set_discount_rate(&self, rate: Decimal) -> ServiceResult<DiscountRate> {
        let rate = DiscountRate::new(rate).inspect_err(|err| {
            tracing::warn!(error = %err, "discount rate change rejected");
        })?;

        let mut current = self
            .discount_rate
            .write()
            .map_err(|_| ServiceError::LockPoisoned)?;
        *current = rate;
        tracing::info!(rate = %rate, percent_off = %rate.percent_off(), "discount rate updated");
        Ok(rate)
    }

    // ── persistence ─────────────────────────────────────────────────────────

    /// Persist the current snapshot.
    pub fn save(&self) -> ServiceResult<()> {
        let system = self.lock()?;
        self.store.save(&system)?;
        Ok(())
    }

    /// Replace the in-memory snapshot with the last saved one. On failure the
    /// current snapshot is kept.
    pub fn load(&self) -> ServiceResult<()> {
        let mut system = self.lock()?;
        *system = self.store.load()?;
        Ok(())
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> ServiceResult<BookingSystem> {
        Ok(self.lock()?.clone())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
