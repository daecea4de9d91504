//! In-memory user directory.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use waymark_core::User;

#[derive(Debug, Default)]
struct Entries {
    users: Vec<Arc<User>>,
    by_name: HashMap<String, usize>,
}

/// Users known to the service, keyed by user name.
///
/// Users are listed in registration order. The registry never removes
/// users.
#[derive(Debug, Default)]
pub struct UserRegistry {
    entries: RwLock<Entries>,
}

impl UserRegistry {
    /// Build a registry from `users`, skipping duplicate names.
    pub fn from_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = User>,
    {
        let registry = Self::default();
        for user in users {
            registry.add_user(user);
        }
        registry
    }

    /// Register `user` unless a user with the same name exists.
    ///
    /// Returns the registered user, which is the existing one on a
    /// duplicate name.
    pub fn add_user(&self, user: User) -> Arc<User> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = entries
            .by_name
            .get(user.user_name())
            .and_then(|&index| entries.users.get(index))
        {
            debug!("user {} already registered", user.user_name());
            return Arc::clone(existing);
        }
        let index = entries.users.len();
        entries.by_name.insert(user.user_name().to_owned(), index);
        let user = Arc::new(user);
        entries.users.push(Arc::clone(&user));
        user
    }

    /// Look a user up by name.
    #[must_use]
    pub fn user(&self, user_name: &str) -> Option<Arc<User>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .by_name
            .get(user_name)
            .and_then(|&index| entries.users.get(index))
            .cloned()
    }

    /// Every registered user, in registration order.
    #[must_use]
    pub fn all_users(&self) -> Vec<Arc<User>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .clone()
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .users
            .len()
    }

    /// Whether no user is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
