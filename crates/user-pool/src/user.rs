//! Generated user record types.
//!
//! A [`User`] is immutable once produced by the builder. A [`UserPool`] keeps
//! records in generation order and serializes as a plain JSON array.

use serde::{Deserialize, Serialize};

use crate::email::UsedEmails;

/// A generated user record.
///
/// # Example
///
/// ```
/// use user_pool::User;
///
/// let user = User::new("0a1b", "Ada Lovelace", "adalovelace@example.com");
///
/// assert_eq!(user.name(), "Ada Lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    id: String,
    name: String,
    email: String,
}

impl User {
    /// Creates a record from its three fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns the hexadecimal identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the generated name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// An ordered pool of generated users.
///
/// Insertion order matches generation order. Pools built by
/// [`UserPoolBuilder`](crate::UserPoolBuilder) never contain two records with
/// the same email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPool {
    users: Vec<User>,
}

impl UserPool {
    /// Creates an empty pool with room for `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            users: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` when the pool holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Returns the records in generation order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Builds the used-email index for the records currently in the pool.
    #[must_use]
    pub fn used_emails(&self) -> UsedEmails {
        self.users.iter().map(|user| user.email.clone()).collect()
    }

    /// Consumes the pool and returns its records.
    #[must_use]
    pub fn into_users(self) -> Vec<User> {
        self.users
    }

    pub(crate) fn push(&mut self, user: User) {
        self.users.push(user);
    }
}

impl From<Vec<User>> for UserPool {
    fn from(users: Vec<User>) -> Self {
        Self { users }
    }
}
