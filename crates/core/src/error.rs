//! Domain error model.

use thiserror::Error;

use crate::id::{OrderId, TicketId, UserId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is an expected, recoverable outcome reported to the caller.
/// Storage failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced ticket does not exist in the catalog.
    #[error("ticket {0} not found")]
    TicketNotFound(TicketId),

    /// The ticket exists but has no remaining availability.
    #[error("ticket {0} is sold out")]
    SoldOut(TicketId),

    /// The order is not in the acting user's own order list.
    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    /// The referenced user is not registered.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No registered user matches the supplied email/password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A discount rate outside the open interval (0, 1).
    #[error("invalid discount rate: {0}")]
    InvalidDiscountRate(String),

    /// Another user already registered this email.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// Every identifier of this kind has been handed out.
    #[error("no {0} ids left")]
    IdsExhausted(&'static str),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_discount_rate(msg: impl Into<String>) -> Self {
        Self::InvalidDiscountRate(msg.into())
    }

    /// True for the "something referenced does not exist" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TicketNotFound(_) | Self::OrderNotFound(_) | Self::UserNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_id() {
        assert_eq!(
            DomainError::SoldOut(TicketId::new(1)).to_string(),
            "ticket 1 is sold out"
        );
        assert_eq!(
            DomainError::OrderNotFound(OrderId::new(7)).to_string(),
            "order 7 not found"
        );
    }

    #[test]
    fn exhausted_ids_name_the_kind() {
        assert_eq!(DomainError::IdsExhausted("order").to_string(), "no order ids left");
    }

    #[test]
    fn not_found_family() {
        assert!(DomainError::TicketNotFound(TicketId::new(3)).is_not_found());
        assert!(DomainError::UserNotFound(UserId::new(3)).is_not_found());
        assert!(!DomainError::InvalidCredentials.is_not_found());
    }
}
