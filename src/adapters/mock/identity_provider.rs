use crate::domain::UserId;
use crate::ports::identity_provider::{IdentityProvider as IdentityProviderTrait, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Mock implementation of IdentityProvider
///
/// Supports stateful testing by storing registered user IDs.
pub struct IdentityProvider {
    users: Mutex<HashSet<UserId>>,
}

impl IdentityProvider {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashSet::new()),
        }
    }

    /// Register a new user and return its id
    pub fn register(&self) -> UserId {
        let user_id = UserId::new();
        self.add_user(user_id);
        user_id
    }

    /// Add a known user id
    pub fn add_user(&self, user_id: UserId) {
        self.users.lock().insert(user_id);
    }
}

impl Default for IdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProviderTrait for IdentityProvider {
    async fn exists(&self, user_id: UserId) -> Result<bool> {
        Ok(self.users.lock().contains(&user_id))
    }
}
