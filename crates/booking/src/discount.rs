use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gridpass_catalog::Ticket;
use gridpass_core::{DomainError, DomainResult, ValueObject};

/// Multiplier applied to group ticket prices, strictly between 0 and 1.
///
/// Owned by the administrative context and supplied at query time; orders do
/// not store it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountRate(Decimal);

impl DiscountRate {
    /// 0.9, i.e. 10% off.
    pub const DEFAULT: DiscountRate = DiscountRate(Decimal::from_parts(9, 0, 0, false, 1));

    pub fn new(rate: Decimal) -> DomainResult<Self> {
        if rate <= Decimal::ZERO || rate >= Decimal::ONE {
            return Err(DomainError::invalid_discount_rate(format!(
                "{rate} is outside (0, 1)"
            )));
        }
        Ok(Self(rate))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// Percentage taken off the list price, e.g. 15 for a rate of 0.85.
    pub fn percent_off(self) -> Decimal {
        (Decimal::ONE - self.0) * Decimal::ONE_HUNDRED
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ValueObject for DiscountRate {}

impl TryFrom<Decimal> for DiscountRate {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountRate> for Decimal {
    fn from(value: DiscountRate) -> Self {
        value.0
    }
}

impl FromStr for DiscountRate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::invalid_discount_rate(format!("{s:?}: {e}")))?;
        Self::new(rate)
    }
}

impl core::fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Price of `ticket` under `rate`: discounted for group tickets, list price
/// otherwise.
pub fn discounted_price(ticket: &Ticket, rate: DiscountRate) -> Decimal {
    if ticket.category().is_group() {
        ticket.price() * rate.value()
    } else {
        ticket.price()
    }
}
