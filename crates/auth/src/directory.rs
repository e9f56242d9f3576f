//! In-memory user directory backing the credential→token exchange.

use std::collections::HashMap;
use std::sync::RwLock;

use taskdeck_core::UserId;

use crate::token::AuthError;

struct UserEntry {
    user_id: UserId,
    password: String,
}

/// Username/password registry.
///
/// Dev-grade: credentials live in memory for the process lifetime and are
/// compared directly. A durable user store would hash at rest.
#[derive(Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, UserEntry>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, returning the assigned id.
    ///
    /// Re-registering an existing username replaces the password but keeps
    /// the id stable, so owned tasks survive a credential rotation.
    pub fn register(&self, username: impl Into<String>, password: impl Into<String>) -> UserId {
        let username = username.into();
        let password = password.into();
        let mut users = self.users.write().unwrap();

        match users.get_mut(&username) {
            Some(entry) => {
                entry.password = password;
                entry.user_id
            }
            None => {
                let user_id = UserId::new();
                users.insert(username, UserEntry { user_id, password });
                user_id
            }
        }
    }

    /// Verify credentials, returning the user id on success.
    ///
    /// Unknown username and wrong password are indistinguishable to the
    /// caller.
    pub fn verify(&self, username: &str, password: &str) -> Result<UserId, AuthError> {
        let users = self.users.read().unwrap();
        match users.get(username) {
            Some(entry) if entry.password == password => Ok(entry.user_id),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Remove a user. Returns the removed id so callers can cascade cleanup
    /// of owned records.
    pub fn remove(&self, username: &str) -> Option<UserId> {
        self.users
            .write()
            .unwrap()
            .remove(username)
            .map(|e| e.user_id)
    }
}
