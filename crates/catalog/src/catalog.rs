use rust_decimal::Decimal;

use gridpass_core::{DomainError, DomainResult, Entity, TicketId};

use crate::ticket::Ticket;

/// The set of purchasable ticket products, in catalog order.
///
/// Ticket ids are assigned externally (by the seed or by whoever builds the
/// catalog) and must be unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketCatalog {
    tickets: Vec<Ticket>,
}

impl TicketCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from existing tickets, rejecting duplicate ids.
    pub fn from_tickets(tickets: impl IntoIterator<Item = Ticket>) -> DomainResult<Self> {
        let mut catalog = Self::new();
        for ticket in tickets {
            catalog.insert(ticket)?;
        }
        Ok(catalog)
    }

    /// The Grand Prix catalog every fresh installation starts with.
    pub fn grand_prix() -> DomainResult<Self> {
        Self::from_tickets([
            Ticket::new(
                TicketId::new(1),
                "single",
                Decimal::new(200, 0),
                "1 Day",
                "Race access",
                50,
            )?,
            Ticket::new(
                TicketId::new(2),
                "weekend",
                Decimal::new(500, 0),
                "3 Days",
                "Full weekend",
                30,
            )?,
            Ticket::new(
                TicketId::new(3),
                "group",
                Decimal::new(180, 0),
                "1 Day",
                "Group discount",
                100,
            )?,
        ])
    }

    pub fn insert(&mut self, ticket: Ticket) -> DomainResult<()> {
        if self.find_ticket(ticket.id()).is_some() {
            return Err(DomainError::validation(format!(
                "duplicate ticket id {}",
                ticket.id()
            )));
        }
        self.tickets.push(ticket);
        Ok(())
    }

    pub fn find_ticket(&self, ticket_id: TicketId) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id() == ticket_id)
    }

    /// Look up a ticket, failing with `TicketNotFound`.
    pub fn get(&self, ticket_id: TicketId) -> DomainResult<&Ticket> {
        self.find_ticket(ticket_id)
            .ok_or(DomainError::TicketNotFound(ticket_id))
    }

    /// Apply `delta` to a ticket's availability.
    ///
    /// No bounds check is performed: the booking engine guarantees the result
    /// stays non-negative. Do not call this outside a booking update.
    pub fn adjust_availability(&mut self, ticket_id: TicketId, delta: i64) -> DomainResult<()> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id() == ticket_id)
            .ok_or(DomainError::TicketNotFound(ticket_id))?;
        ticket.adjust_availability(delta);
        tracing::debug!(
            ticket_id = %ticket_id,
            delta,
            availability = ticket.availability(),
            "ticket availability adjusted"
        );
        Ok(())
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
