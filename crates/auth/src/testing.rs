//! Minimal in-memory credential store for unit tests in this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use workforce_core::UserId;

use crate::{CredentialStore, Email, Identity, NewIdentity, StoreError};

#[derive(Default)]
pub(crate) struct MemoryStore {
    users: Mutex<HashMap<UserId, Identity>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("test outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, StoreError> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        self.check()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict);
        }
        let identity = Identity {
            id: UserId::new(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };
        users.insert(identity.id, identity.clone());
        Ok(identity)
    }
}
