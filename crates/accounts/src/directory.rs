use gridpass_core::{DomainError, DomainResult, Entity, OrderId, UserId};

use crate::user::{Password, ProfileUpdate, User};

/// Registered accounts, in registration order.
///
/// # Invariants
/// - User ids are sequential, starting at 1.
/// - Emails are unique across the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a directory from existing users, rejecting duplicate ids or emails.
    pub fn from_users(users: impl IntoIterator<Item = User>) -> DomainResult<Self> {
        let mut directory = Self::new();
        for user in users {
            if directory.find(user.id()).is_some() {
                return Err(DomainError::validation(format!(
                    "duplicate user id {}",
                    user.id()
                )));
            }
            directory.ensure_email_free(user.email(), None)?;
            directory.users.push(user);
        }
        Ok(directory)
    }

    /// Register a new account with the next sequential id.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> DomainResult<&User> {
        let email = email.into();
        let password = password.into();

        if email.is_empty() {
            return Err(DomainError::validation("email cannot be empty"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        self.ensure_email_free(&email, None)?;

        let id = self.next_id()?;
        self.users
            .push(User::new(id, name, email, Password::new(password)));
        tracing::info!(user_id = %id, "user registered");

        let idx = self.users.len() - 1;
        Ok(&self.users[idx])
    }

    /// First user whose email and password both match exactly.
    pub fn authenticate(&self, email: &str, password: &str) -> DomainResult<&User> {
        match self
            .users
            .iter()
            .find(|u| u.credentials_match(email, password))
        {
            Some(user) => {
                tracing::debug!(user_id = %user.id(), "user authenticated");
                Ok(user)
            }
            None => {
                tracing::warn!("authentication failed");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    /// Apply a partial profile edit. Blank fields are left unchanged.
    pub fn update_profile(&mut self, user_id: UserId, update: &ProfileUpdate) -> DomainResult<&User> {
        if let Some(email) = update.email() {
            self.ensure_email_free(email, Some(user_id))?;
        }

        let user = self.get_mut(user_id)?;
        user.apply_update(update);
        tracing::info!(user_id = %user_id, "user profile updated");
        Ok(&*user)
    }

    pub fn find(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id() == user_id)
    }

    pub fn get(&self, user_id: UserId) -> DomainResult<&User> {
        self.find(user_id).ok_or(DomainError::UserNotFound(user_id))
    }

    /// Append an order to a user's history.
    pub fn attach_order(&mut self, user_id: UserId, order_id: OrderId) -> DomainResult<()> {
        self.get_mut(user_id)?.add_order(order_id);
        Ok(())
    }

    /// Remove an order from a user's history.
    pub fn detach_order(&mut self, user_id: UserId, order_id: OrderId) -> DomainResult<()> {
        if self.get_mut(user_id)?.remove_order(order_id) {
            Ok(())
        } else {
            Err(DomainError::OrderNotFound(order_id))
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    // Users are never removed, so max + 1 equals count + 1 for any valid directory.
    fn next_id(&self) -> DomainResult<UserId> {
        match self.users.iter().map(|u| u.id()).max() {
            None => Ok(UserId::new(1)),
            Some(last) => last.next().ok_or(DomainError::IdsExhausted("user")),
        }
    }

    fn get_mut(&mut self, user_id: UserId) -> DomainResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id() == user_id)
            .ok_or(DomainError::UserNotFound(user_id))
    }

    fn ensure_email_free(&self, email: &str, except: Option<UserId>) -> DomainResult<()> {
        let taken = self
            .users
            .iter()
            .any(|u| u.email() == email && Some(u.id()) != except);
        if taken {
            return Err(DomainError::EmailTaken(email.to_string()));
        }
        Ok(())
    }
}
