//! Startup provisioning
//!
//! Replaces the implicit "create the admin on import" bootstrap with an
//! explicit, idempotent routine invoked once at startup and parameterized by
//! credentials. Not part of the ingestion pipeline.

use crate::storage::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::info;

/// Credentials for the provisioned administrator account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A provisioned user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub email: String,
    pub admin: bool,
}

/// What `ensure_admin` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Created,
    AlreadyProvisioned,
}

/// User account collaborator.
#[async_trait(?Send)]
pub trait UserStore: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<UserAccount>, StorageError>;
    async fn create_admin(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<UserAccount, StorageError>;
}

/// Idempotent admin provisioning: creates the account iff it does not exist.
pub async fn ensure_admin(
    store: &dyn UserStore,
    credentials: &AdminCredentials,
) -> Result<ProvisionOutcome, StorageError> {
    if store.find(&credentials.username).await?.is_some() {
        return Ok(ProvisionOutcome::AlreadyProvisioned);
    }
    let account = store.create_admin(credentials).await?;
    info!(username = %account.username, "admin account provisioned");
    Ok(ProvisionOutcome::Created)
}

/// In-memory user store.
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, UserAccount>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl UserStore for MemoryUserStore {
    async fn find(&self, username: &str) -> Result<Option<UserAccount>, StorageError> {
        let users = self
            .users
            .lock()
            .map_err(|_| StorageError::BackendError("user store lock poisoned".to_string()))?;
        Ok(users.get(username).cloned())
    }

    async fn create_admin(
        &self,
        credentials: &AdminCredentials,
    ) -> Result<UserAccount, StorageError> {
        let account = UserAccount {
            username: credentials.username.clone(),
            email: credentials.email.clone(),
            admin: true,
        };
        let mut users = self
            .users
            .lock()
            .map_err(|_| StorageError::BackendError("user store lock poisoned".to_string()))?;
        users.insert(account.username.clone(), account.clone());
        Ok(account)
    }
}
