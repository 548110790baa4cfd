//! The booking engine: the whole system snapshot as one aggregate.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gridpass_accounts::{ProfileUpdate, User, UserDirectory};
use gridpass_catalog::{Ticket, TicketCatalog};
use gridpass_core::{
    Aggregate, DomainError, DomainResult, Entity, Event, OrderId, TicketId, UserId,
};

use crate::discount::{DiscountRate, discounted_price};
use crate::ledger::OrderLedger;
use crate::order::Order;
use crate::report;

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command: PurchaseTicket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseTicket {
    pub user_id: UserId,
    pub ticket_id: TicketId,
    pub payment_method: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub user_id: UserId,
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingCommand {
    PurchaseTicket(PurchaseTicket),
    CancelOrder(CancelOrder),
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event: TicketPurchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPurchased {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub ticket_id: TicketId,
    pub payment_method: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub ticket_id: TicketId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEvent {
    TicketPurchased(TicketPurchased),
    OrderCancelled(OrderCancelled),
}

impl Event for BookingEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BookingEvent::TicketPurchased(_) => "booking.ticket.purchased",
            BookingEvent::OrderCancelled(_) => "booking.order.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            BookingEvent::TicketPurchased(e) => e.occurred_at,
            BookingEvent::OrderCancelled(e) => e.occurred_at,
        }
    }
}

impl From<&TicketPurchased> for Order {
    fn from(e: &TicketPurchased) -> Self {
        Order::new(
            e.order_id,
            e.user_id,
            e.ticket_id,
            e.occurred_at,
            e.payment_method.clone(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Booking system
// ─────────────────────────────────────────────────────────────────────────────

/// The complete in-memory state: ticket catalog, user directory and order
/// ledger. This is the unit of persistence.
///
/// # Invariants
/// - Ticket availability never goes negative.
/// - Every ledger order is listed exactly once, by its owner, and every id in
///   a user's list resolves to a ledger order owned by that user.
/// - Every order references an existing ticket.
/// - Order ids are strictly increasing and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSystem {
    catalog: TicketCatalog,
    directory: UserDirectory,
    ledger: OrderLedger,
    version: u64,
}

impl BookingSystem {
    /// Fresh system over `catalog`, with no users and no orders.
    pub fn new(catalog: TicketCatalog) -> Self {
        Self {
            catalog,
            directory: UserDirectory::new(),
            ledger: OrderLedger::new(),
            version: 0,
        }
    }

    /// Fresh system over the default Grand Prix catalog.
    pub fn seeded() -> DomainResult<Self> {
        Ok(Self::new(TicketCatalog::grand_prix()?))
    }

    /// Reassemble a system from its stores, verifying every cross-reference.
    pub fn from_parts(
        catalog: TicketCatalog,
        directory: UserDirectory,
        ledger: OrderLedger,
        version: u64,
    ) -> DomainResult<Self> {
        for ticket in catalog.tickets() {
            if ticket.availability() < 0 {
                return Err(DomainError::invariant(format!(
                    "ticket {} has negative availability",
                    ticket.id()
                )));
            }
        }

        for order in ledger.iter() {
            if catalog.find_ticket(order.ticket_id()).is_none() {
                return Err(DomainError::invariant(format!(
                    "order {} references unknown ticket {}",
                    order.id(),
                    order.ticket_id()
                )));
            }
            let owner = directory.find(order.user_id()).ok_or_else(|| {
                DomainError::invariant(format!(
                    "order {} references unknown user {}",
                    order.id(),
                    order.user_id()
                ))
            })?;
            if !owner.owns_order(order.id()) {
                return Err(DomainError::invariant(format!(
                    "order {} is missing from user {}'s history",
                    order.id(),
                    owner.id()
                )));
            }
        }

        let mut listed = HashSet::new();
        for user in directory.users() {
            for &order_id in user.orders() {
                if !listed.insert(order_id) {
                    return Err(DomainError::invariant(format!(
                        "order {order_id} is listed more than once"
                    )));
                }
                match ledger.get(order_id) {
                    Some(order) if order.user_id() == user.id() => {}
                    Some(_) => {
                        return Err(DomainError::invariant(format!(
                            "user {} lists order {order_id} owned by someone else",
                            user.id()
                        )));
                    }
                    None => {
                        return Err(DomainError::invariant(format!(
                            "user {} lists unknown order {order_id}",
                            user.id()
                        )));
                    }
                }
            }
        }

        Ok(Self {
            catalog,
            directory,
            ledger,
            version,
        })
    }

    pub fn catalog(&self) -> &TicketCatalog {
        &self.catalog
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    // ── accounts ────────────────────────────────────────────────────────────

    pub fn register(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> DomainResult<&User> {
        self.directory.register(name, email, password)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> DomainResult<&User> {
        self.directory.authenticate(email, password)
    }

    pub fn update_profile(&mut self, user_id: UserId, update: &ProfileUpdate) -> DomainResult<&User> {
        self.directory.update_profile(user_id, update)
    }

    // ── booking ─────────────────────────────────────────────────────────────

    /// Buy one unit of `ticket_id` for `user_id`.
    pub fn purchase(
        &mut self,
        user_id: UserId,
        ticket_id: TicketId,
        payment_method: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Order> {
        let command = BookingCommand::PurchaseTicket(PurchaseTicket {
            user_id,
            ticket_id,
            payment_method: payment_method.into(),
            occurred_at,
        });

        let events = self.execute(&command).inspect_err(|err| {
            tracing::warn!(user_id = %user_id, ticket_id = %ticket_id, error = %err, "purchase rejected");
        })?;

        match events.as_slice() {
            [BookingEvent::TicketPurchased(e)] => {
                tracing::info!(
                    order_id = %e.order_id,
                    user_id = %user_id,
                    ticket_id = %ticket_id,
                    "ticket purchased"
                );
                Ok(Order::from(e))
            }
            _ => Err(DomainError::invariant("purchase did not produce an order")),
        }
    }

    /// Cancel one of `user_id`'s own orders, restoring the ticket unit.
    pub fn cancel(
        &mut self,
        user_id: UserId,
        order_id: OrderId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Order> {
        let order = self.get_order(user_id, order_id).cloned();
        let command = BookingCommand::CancelOrder(CancelOrder {
            user_id,
            order_id,
            occurred_at,
        });

        self.execute(&command).inspect_err(|err| {
            tracing::warn!(user_id = %user_id, order_id = %order_id, error = %err, "cancellation rejected");
        })?;
        tracing::info!(user_id = %user_id, order_id = %order_id, "order cancelled");

        order
    }

    // ── queries ─────────────────────────────────────────────────────────────

    pub fn find_ticket(&self, ticket_id: TicketId) -> DomainResult<&Ticket> {
        self.catalog.get(ticket_id)
    }

    pub fn list_tickets(&self) -> &[Ticket] {
        self.catalog.tickets()
    }

    /// A user's orders in purchase order.
    pub fn orders_for_user(&self, user_id: UserId) -> DomainResult<Vec<&Order>> {
        let user = self.directory.get(user_id)?;
        user.orders()
            .iter()
            .map(|&id| {
                self.ledger
                    .get(id)
                    .ok_or(DomainError::OrderNotFound(id))
            })
            .collect()
    }

    /// Look up an order within `user_id`'s own history.
    pub fn get_order(&self, user_id: UserId, order_id: OrderId) -> DomainResult<&Order> {
        let user = self.directory.get(user_id)?;
        if !user.owns_order(order_id) {
            return Err(DomainError::OrderNotFound(order_id));
        }
        self.ledger
            .get(order_id)
            .ok_or(DomainError::OrderNotFound(order_id))
    }

    /// Price of `order` under the discount rate in force right now.
    pub fn discounted_price(&self, order: &Order, rate: DiscountRate) -> DomainResult<Decimal> {
        let ticket = self.catalog.get(order.ticket_id())?;
        Ok(discounted_price(ticket, rate))
    }

    pub fn sales_per_day(&self) -> BTreeMap<NaiveDate, usize> {
        report::sales_per_day(&self.ledger)
    }

    // ── decisions ───────────────────────────────────────────────────────────

    fn handle_purchase(&self, cmd: &PurchaseTicket) -> DomainResult<Vec<BookingEvent>> {
        self.directory.get(cmd.user_id)?;
        let ticket = self.catalog.get(cmd.ticket_id)?;
        if ticket.is_sold_out() {
            return Err(DomainError::SoldOut(cmd.ticket_id));
        }

        let order_id = self.ledger.issue_order_id()?;

        Ok(vec![BookingEvent::TicketPurchased(TicketPurchased {
            order_id,
            user_id: cmd.user_id,
            ticket_id: cmd.ticket_id,
            payment_method: cmd.payment_method.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelOrder) -> DomainResult<Vec<BookingEvent>> {
        let order = self.get_order(cmd.user_id, cmd.order_id)?;
        self.catalog.get(order.ticket_id())?;

        Ok(vec![BookingEvent::OrderCancelled(OrderCancelled {
            order_id: cmd.order_id,
            user_id: cmd.user_id,
            ticket_id: order.ticket_id(),
            occurred_at: cmd.occurred_at,
        })])
    }

    // ── state evolution ─────────────────────────────────────────────────────

    /// Returns false, leaving state untouched, when the event does not fit the
    /// current state.
    fn apply_purchased(&mut self, e: &TicketPurchased) -> bool {
        let fits = self.directory.find(e.user_id).is_some()
            && self
                .catalog
                .find_ticket(e.ticket_id)
                .is_some_and(|t| !t.is_sold_out())
            && e.order_id >= self.ledger.next_order_id()
            && e.order_id.next().is_some();
        if !fits {
            tracing::error!(order_id = %e.order_id, "purchase event does not fit current state");
            return false;
        }

        self.ledger.insert(Order::from(e));
        log_if_inconsistent(self.directory.attach_order(e.user_id, e.order_id));
        log_if_inconsistent(self.catalog.adjust_availability(e.ticket_id, -1));
        true
    }

    fn apply_cancelled(&mut self, e: &OrderCancelled) -> bool {
        let fits = self
            .ledger
            .get(e.order_id)
            .is_some_and(|o| o.user_id() == e.user_id && o.ticket_id() == e.ticket_id)
            && self.catalog.find_ticket(e.ticket_id).is_some()
            && self
                .directory
                .find(e.user_id)
                .is_some_and(|u| u.owns_order(e.order_id));
        if !fits {
            tracing::error!(order_id = %e.order_id, "cancel event does not fit current state");
            return false;
        }

        log_if_inconsistent(self.catalog.adjust_availability(e.ticket_id, 1));
        log_if_inconsistent(self.directory.detach_order(e.user_id, e.order_id));
        self.ledger.remove(e.order_id);
        true
    }
}

fn log_if_inconsistent(result: DomainResult<()>) {
    if let Err(err) = result {
        tracing::error!(error = %err, "booking event applied against inconsistent state");
    }
}

impl Aggregate for BookingSystem {
    type Command = BookingCommand;
    type Event = BookingEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        let applied = match event {
            BookingEvent::TicketPurchased(e) => self.apply_purchased(e),
            BookingEvent::OrderCancelled(e) => self.apply_cancelled(e),
        };

        // +1 per event that changed state.
        if applied {
            self.version += 1;
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            BookingCommand::PurchaseTicket(cmd) => self.handle_purchase(cmd),
            BookingCommand::CancelOrder(cmd) => self.handle_cancel(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 6, 14, 0, 0).unwrap()
    }

    fn group_ticket() -> TicketId {
        TicketId::new(3)
    }

    /// Seeded system with two registered users (ids 1 and 2).
    fn setup() -> BookingSystem {
        let mut system = BookingSystem::seeded().unwrap();
        system.register("Alice", "alice@example.com", "a").unwrap();
        system.register("Bob", "bob@example.com", "b").unwrap();
        system
    }

    fn availability(system: &BookingSystem, ticket_id: TicketId) -> i64 {
        system.find_ticket(ticket_id).unwrap().availability()
    }

    #[test]
    fn purchase_creates_order_and_decrements_availability() {
        let mut system = setup();
        let alice = UserId::new(1);

        let order = system
            .purchase(alice, group_ticket(), "wallet", test_time())
            .unwrap();

        assert_eq!(order.id(), OrderId::new(1));
        assert_eq!(order.user_id(), alice);
        assert_eq!(order.ticket_id(), group_ticket());
        assert_eq!(order.payment_method(), "wallet");
        assert_eq!(order.purchased_at(), test_time());
        assert_eq!(availability(&system, group_ticket()), 99);
        assert_eq!(system.ledger().get(order.id()), Some(&order));
        assert_eq!(system.directory().get(alice).unwrap().orders(), &[order.id()]);
        assert_eq!(
            system.discounted_price(&order, DiscountRate::DEFAULT).unwrap(),
            Decimal::new(162, 0)
        );
    }

    #[test]
    fn cancel_restores_availability_and_removes_everywhere() {
        let mut system = setup();
        let alice = UserId::new(1);
        let order = system
            .purchase(alice, group_ticket(), "wallet", test_time())
            .unwrap();
        assert_eq!(system.sales_per_day().values().sum::<usize>(), 1);

        let cancelled = system.cancel(alice, order.id(), test_time()).unwrap();

        assert_eq!(cancelled, order);
        assert_eq!(availability(&system, group_ticket()), 100);
        assert!(system.ledger().get(order.id()).is_none());
        assert!(system.directory().get(alice).unwrap().orders().is_empty());
        assert!(system.sales_per_day().is_empty());
    }

    #[test]
    fn sold_out_purchase_changes_nothing() {
        let catalog = TicketCatalog::from_tickets([Ticket::new(
            TicketId::new(1),
            "single",
            Decimal::new(200, 0),
            "1 Day",
            "Race access",
            0,
        )
        .unwrap()])
        .unwrap();
        let mut system = BookingSystem::new(catalog);
        system.register("Alice", "alice@example.com", "a").unwrap();
        let before = system.clone();

        let err = system
            .purchase(UserId::new(1), TicketId::new(1), "credit", test_time())
            .unwrap_err();

        assert_eq!(err, DomainError::SoldOut(TicketId::new(1)));
        assert_eq!(system, before);
        assert_eq!(system.version(), 0);
    }

    #[test]
    fn unknown_ticket_is_rejected() {
        let mut system = setup();
        let before = system.clone();
        let err = system
            .purchase(UserId::new(1), TicketId::new(42), "credit", test_time())
            .unwrap_err();
        assert_eq!(err, DomainError::TicketNotFound(TicketId::new(42)));
        assert_eq!(system, before);
    }

    #[test]
    fn unknown_user_cannot_purchase() {
        let mut system = setup();
        let err = system
            .purchase(UserId::new(9), TicketId::new(1), "credit", test_time())
            .unwrap_err();
        assert_eq!(err, DomainError::UserNotFound(UserId::new(9)));
        assert!(system.ledger().is_empty());
    }

    #[test]
    fn cancelling_another_users_order_is_not_found() {
        let mut system = setup();
        let alice = UserId::new(1);
        let bob = UserId::new(2);
        let order = system
            .purchase(alice, TicketId::new(2), "debit", test_time())
            .unwrap();
        let before = system.clone();

        let err = system.cancel(bob, order.id(), test_time()).unwrap_err();

        assert_eq!(err, DomainError::OrderNotFound(order.id()));
        assert_eq!(system, before);
        assert_eq!(system.get_order(alice, order.id()).unwrap(), &order);
    }

    #[test]
    fn order_ids_are_not_reused_after_cancel() {
        let mut system = setup();
        let alice = UserId::new(1);
        let first = system.purchase(alice, TicketId::new(1), "credit", test_time()).unwrap();
        let second = system.purchase(alice, TicketId::new(1), "credit", test_time()).unwrap();
        system.cancel(alice, first.id(), test_time()).unwrap();
        let third = system.purchase(alice, TicketId::new(1), "credit", test_time()).unwrap();

        assert_eq!(second.id(), OrderId::new(2));
        assert_eq!(third.id(), OrderId::new(3));
        let ids: Vec<OrderId> = system
            .orders_for_user(alice)
            .unwrap()
            .iter()
            .map(|o| o.id())
            .collect();
        assert_eq!(ids, vec![OrderId::new(2), OrderId::new(3)]);
    }

    #[test]
    fn discount_is_evaluated_at_query_time() {
        let mut system = setup();
        let order = system
            .purchase(UserId::new(1), group_ticket(), "wallet", test_time())
            .unwrap();

        let rate: DiscountRate = "0.8".parse().unwrap();
        assert_eq!(system.discounted_price(&order, rate).unwrap(), Decimal::new(144, 0));
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let system = setup();
        let before = system.clone();
        let command = BookingCommand::PurchaseTicket(PurchaseTicket {
            user_id: UserId::new(1),
            ticket_id: TicketId::new(1),
            payment_method: "credit".to_string(),
            occurred_at: test_time(),
        });

        let events1 = system.handle(&command).unwrap();
        let events2 = system.handle(&command).unwrap();

        assert_eq!(system, before);
        assert_eq!(events1, events2);
        assert_eq!(events1[0].event_type(), "booking.ticket.purchased");
        assert_eq!(events1[0].occurred_on(), test_time().date_naive());
    }

    #[test]
    fn version_increments_per_applied_event() {
        let mut system = setup();
        let alice = UserId::new(1);
        let order = system.purchase(alice, TicketId::new(1), "credit", test_time()).unwrap();
        assert_eq!(system.version(), 1);
        system.cancel(alice, order.id(), test_time()).unwrap();
        assert_eq!(system.version(), 2);
    }

    fn purchased(order_id: u64, user_id: u64, ticket_id: u64) -> BookingEvent {
        BookingEvent::TicketPurchased(TicketPurchased {
            order_id: OrderId::new(order_id),
            user_id: UserId::new(user_id),
            ticket_id: TicketId::new(ticket_id),
            payment_method: "credit".to_string(),
            occurred_at: test_time(),
        })
    }

    #[test]
    fn apply_ignores_purchase_of_sold_out_ticket() {
        let catalog = TicketCatalog::from_tickets([Ticket::new(
            TicketId::new(1),
            "single",
            Decimal::new(200, 0),
            "1 Day",
            "Race access",
            0,
        )
        .unwrap()])
        .unwrap();
        let mut system = BookingSystem::new(catalog);
        system.register("Alice", "alice@example.com", "a").unwrap();
        let before = system.clone();

        system.apply(&purchased(1, 1, 1));

        assert_eq!(system, before);
        assert_eq!(availability(&system, TicketId::new(1)), 0);
        assert_eq!(system.version(), 0);
    }

    #[test]
    fn apply_ignores_purchase_reusing_an_order_id() {
        let mut system = setup();
        let order = system.purchase(UserId::new(1), TicketId::new(1), "credit", test_time()).unwrap();
        let before = system.clone();

        system.apply(&purchased(order.id().get(), 2, 2));

        assert_eq!(system, before);
        assert_eq!(system.ledger().get(order.id()), Some(&order));
        assert_eq!(system.directory().get(UserId::new(1)).unwrap().orders(), &[order.id()]);
        assert_eq!(system.version(), 1);
    }

    #[test]
    fn apply_ignores_cancel_by_someone_else() {
        let mut system = setup();
        let order = system.purchase(UserId::new(1), TicketId::new(1), "credit", test_time()).unwrap();
        let before = system.clone();

        system.apply(&BookingEvent::OrderCancelled(OrderCancelled {
            order_id: order.id(),
            user_id: UserId::new(2),
            ticket_id: TicketId::new(1),
            occurred_at: test_time(),
        }));

        assert_eq!(system, before);
    }

    #[test]
    fn from_parts_rejects_orphaned_order() {
        let system = setup();
        let ledger = OrderLedger::from_parts(
            vec![Order::new(
                OrderId::new(1),
                UserId::new(1),
                TicketId::new(1),
                test_time(),
                "credit",
            )],
            OrderId::new(2),
        )
        .unwrap();

        // Alice's history does not list order 1.
        let err = BookingSystem::from_parts(
            system.catalog().clone(),
            system.directory().clone(),
            ledger,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn from_parts_accepts_consistent_state() {
        let mut system = setup();
        system.purchase(UserId::new(2), TicketId::new(2), "debit", test_time()).unwrap();

        let rebuilt = BookingSystem::from_parts(
            system.catalog().clone(),
            system.directory().clone(),
            system.ledger().clone(),
            system.version(),
        )
        .unwrap();
        assert_eq!(rebuilt, system);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Purchase { user: u64, ticket: u64 },
            Cancel { user: u64, nth: usize },
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1u64..=3, 1u64..=4).prop_map(|(user, ticket)| Op::Purchase { user, ticket }),
                (1u64..=3, 0usize..4).prop_map(|(user, nth)| Op::Cancel { user, nth }),
            ]
        }

        /// Small catalog so sell-outs actually happen.
        fn tight_system() -> BookingSystem {
            let catalog = TicketCatalog::from_tickets([
                Ticket::new(TicketId::new(1), "single", Decimal::new(200, 0), "1 Day", "", 2).unwrap(),
                Ticket::new(TicketId::new(2), "weekend", Decimal::new(500, 0), "3 Days", "", 1).unwrap(),
                Ticket::new(TicketId::new(3), "group", Decimal::new(180, 0), "1 Day", "", 3).unwrap(),
            ])
            .unwrap();
            let mut system = BookingSystem::new(catalog);
            for (name, email) in [("A", "a@x"), ("B", "b@x"), ("C", "c@x")] {
                system.register(name, email, "pw").unwrap();
            }
            system
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: availability never goes negative and units are conserved.
            #[test]
            fn inventory_is_conserved(ops in proptest::collection::vec(op(), 0..60)) {
                let mut system = tight_system();
                let initial: i64 = system.list_tickets().iter().map(|t| t.availability()).sum();
                let mut last_order_id = 0u64;

                for op in ops {
                    match op {
                        Op::Purchase { user, ticket } => {
                            if let Ok(order) = system.purchase(UserId::new(user), TicketId::new(ticket), "credit", test_time()) {
                                prop_assert!(order.id().get() > last_order_id);
                                last_order_id = order.id().get();
                            }
                        }
                        Op::Cancel { user, nth } => {
                            let user_id = UserId::new(user);
                            let target = system.directory().get(user_id).unwrap().orders().get(nth).copied();
                            if let Some(order_id) = target {
                                system.cancel(user_id, order_id, test_time()).unwrap();
                            }
                        }
                    }

                    for ticket in system.list_tickets() {
                        prop_assert!(ticket.availability() >= 0);
                    }
                    let remaining: i64 = system.list_tickets().iter().map(|t| t.availability()).sum();
                    prop_assert_eq!(remaining + system.ledger().len() as i64, initial);
                    let listed: usize = system.directory().users().iter().map(|u| u.orders().len()).sum();
                    prop_assert_eq!(listed, system.ledger().len());
                }
            }

            /// Property: purchase then cancel is a round trip for availability and ledger.
            #[test]
            fn purchase_cancel_round_trip(user in 1u64..=3, ticket in 1u64..=3) {
                let mut system = tight_system();
                let before = system.clone();
                let user_id = UserId::new(user);

                let order = system.purchase(user_id, TicketId::new(ticket), "wallet", test_time()).unwrap();
                system.cancel(user_id, order.id(), test_time()).unwrap();

                prop_assert_eq!(system.catalog(), before.catalog());
                prop_assert_eq!(system.directory(), before.directory());
                prop_assert!(system.ledger().is_empty());
            }
        }
    }
}
