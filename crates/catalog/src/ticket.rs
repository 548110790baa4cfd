use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gridpass_core::{DomainError, DomainResult, Entity, TicketId, ValueObject};

/// Ticket product category.
///
/// The well-known categories get their own variants; anything else is kept
/// verbatim so persisted catalogs round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketCategory {
    Single,
    Weekend,
    Group,
    Other(CustomCategory),
}

/// A category name outside the well-known set.
///
/// Only built by converting a string into [`TicketCategory`], so it never
/// holds `single`, `weekend` or `group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomCategory(String);

impl CustomCategory {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TicketCategory {
    pub fn as_str(&self) -> &str {
        match self {
            TicketCategory::Single => "single",
            TicketCategory::Weekend => "weekend",
            TicketCategory::Group => "group",
            TicketCategory::Other(custom) => custom.as_str(),
        }
    }

    /// Group tickets are the only category eligible for the admin discount.
    pub fn is_group(&self) -> bool {
        matches!(self, TicketCategory::Group)
    }
}

impl ValueObject for TicketCategory {}

impl From<&str> for TicketCategory {
    fn from(value: &str) -> Self {
        match value {
            "single" => TicketCategory::Single,
            "weekend" => TicketCategory::Weekend,
            "group" => TicketCategory::Group,
            other => TicketCategory::Other(CustomCategory(other.to_string())),
        }
    }
}

impl From<String> for TicketCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "single" | "weekend" | "group" => TicketCategory::from(value.as_str()),
            _ => TicketCategory::Other(CustomCategory(value)),
        }
    }
}

impl From<TicketCategory> for String {
    fn from(value: TicketCategory) -> Self {
        match value {
            TicketCategory::Other(custom) => custom.0,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable ticket product.
///
/// # Invariants
/// - `price` is non-negative.
/// - `availability` is never negative outside a single booking update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: TicketId,
    category: TicketCategory,
    price: Decimal,
    validity: String,
    features: String,
    availability: i64,
}

impl Ticket {
    pub fn new(
        id: TicketId,
        category: impl Into<TicketCategory>,
        price: Decimal,
        validity: impl Into<String>,
        features: impl Into<String>,
        availability: i64,
    ) -> DomainResult<Self> {
        if price.is_sign_negative() {
            return Err(DomainError::validation(format!(
                "ticket {id}: price cannot be negative"
            )));
        }
        if availability < 0 {
            return Err(DomainError::validation(format!(
                "ticket {id}: availability cannot be negative"
            )));
        }

        Ok(Self {
            id,
            category: category.into(),
            price,
            validity: validity.into(),
            features: features.into(),
            availability,
        })
    }

    pub fn category(&self) -> &TicketCategory {
        &self.category
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn validity(&self) -> &str {
        &self.validity
    }

    pub fn features(&self) -> &str {
        &self.features
    }

    pub fn availability(&self) -> i64 {
        self.availability
    }

    pub fn is_sold_out(&self) -> bool {
        self.availability <= 0
    }

    pub(crate) fn adjust_availability(&mut self, delta: i64) {
        self.availability += delta;
    }
}

impl Entity for Ticket {
    type Id = TicketId;

    fn id(&self) -> TicketId {
        self.id
    }
}
