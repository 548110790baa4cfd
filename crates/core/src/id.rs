//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are small sequential integers assigned by the owning store
//! (ticket ids by the catalog seed, user and order ids at creation time).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a ticket product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

/// Identifier of a registered user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

/// Identifier of an order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

macro_rules! impl_numeric_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }

            /// The identifier following this one, or `None` once the id space is used up.
            pub const fn next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(value) => Some(Self(value)),
                    None => None,
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::validation(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_numeric_newtype!(TicketId, "TicketId");
impl_numeric_newtype!(UserId, "UserId");
impl_numeric_newtype!(OrderId, "OrderId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_trimmed_text() {
        assert_eq!(" 42 ".parse::<OrderId>().unwrap(), OrderId::new(42));
    }

    #[test]
    fn rejects_non_numeric_text() {
        let err = "abc".parse::<TicketId>().unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.starts_with("TicketId") => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn next_is_strictly_greater() {
        let id = UserId::new(9);
        assert!(id.next().unwrap() > id);
        assert_eq!(id.next().unwrap().get(), 10);
    }

    #[test]
    fn next_stops_at_the_last_id() {
        assert_eq!(OrderId::new(u64::MAX).next(), None);
        assert_eq!(OrderId::new(u64::MAX - 1).next(), Some(OrderId::new(u64::MAX)));
    }
}
