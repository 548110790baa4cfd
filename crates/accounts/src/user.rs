//! User account entity.

use serde::{Deserialize, Serialize};

use gridpass_core::{Entity, OrderId, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Password
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque login credential, compared by exact match.
///
/// Never printed: `Debug` is redacted so accounts can be logged safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    /// Raw credential, for persistence only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Password(***)")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// A registered account.
///
/// # Invariants
/// - `orders` is in purchase order and every id in it refers to an order in
///   the global ledger owned by this user (maintained by the booking engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    password: Password,
    orders: Vec<OrderId>,
}

impl User {
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password: Password,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password,
            orders: Vec::new(),
        }
    }

    /// Rebuild a user with an existing order history (snapshot restore).
    pub fn with_orders(mut self, orders: Vec<OrderId>) -> Self {
        self.orders = orders;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Owned order ids in purchase order.
    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    pub fn owns_order(&self, order_id: OrderId) -> bool {
        self.orders.contains(&order_id)
    }

    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.matches(password)
    }

    pub(crate) fn add_order(&mut self, order_id: OrderId) {
        self.orders.push(order_id);
    }

    pub(crate) fn remove_order(&mut self, order_id: OrderId) -> bool {
        let before = self.orders.len();
        self.orders.retain(|id| *id != order_id);
        self.orders.len() != before
    }

    pub(crate) fn apply_update(&mut self, update: &ProfileUpdate) {
        if let Some(name) = update.name() {
            self.name = name.to_string();
        }
        if let Some(email) = update.email() {
            self.email = email.to_string();
        }
        if let Some(password) = update.password() {
            self.password = Password::new(password);
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile update
// ─────────────────────────────────────────────────────────────────────────────

/// Partial account edit. Empty values count as "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    pub fn password(&self) -> Option<&str> {
        non_empty(&self.password)
    }

    pub fn is_empty(&self) -> bool {
        self.name().is_none() && self.email().is_none() && self.password().is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::new(UserId::new(1), "Alice", "alice@example.com", Password::new("pw"))
    }

    #[test]
    fn password_debug_is_redacted() {
        let rendered = format!("{:?}", alice());
        assert!(!rendered.contains("\"pw\""));
        assert!(rendered.contains("Password(***)"));
    }

    #[test]
    fn credentials_are_case_sensitive() {
        let user = alice();
        assert!(user.credentials_match("alice@example.com", "pw"));
        assert!(!user.credentials_match("Alice@example.com", "pw"));
        assert!(!user.credentials_match("alice@example.com", "PW"));
    }

    #[test]
    fn update_replaces_only_supplied_fields() {
        let mut user = alice();
        user.apply_update(&ProfileUpdate::new().with_name("Alicia").with_email(""));
        assert_eq!(user.name(), "Alicia");
        assert_eq!(user.email(), "alice@example.com");
        assert!(user.password().matches("pw"));
    }

    #[test]
    fn order_list_keeps_purchase_order() {
        let mut user = alice();
        user.add_order(OrderId::new(3));
        user.add_order(OrderId::new(1));
        assert_eq!(user.orders(), &[OrderId::new(3), OrderId::new(1)]);

        assert!(user.remove_order(OrderId::new(3)));
        assert!(!user.remove_order(OrderId::new(3)));
        assert_eq!(user.orders(), &[OrderId::new(1)]);
    }

    #[test]
    fn blank_update_is_empty() {
        let update = ProfileUpdate::new().with_name("").with_password("");
        assert!(update.is_empty());
    }
}
