use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use workforce_auth::{CredentialStore, Email, Identity, NewIdentity, StoreError};
use workforce_core::UserId;

/// In-memory credential store.
///
/// Intended for tests/dev. The email index and the records share one lock, so
/// the duplicate check and the insert in `create` are a single critical section.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<UserId, Identity>,
    by_email: HashMap<Email, UserId>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::unavailable("lock poisoned")
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.by_id.get(&id).cloned())
    }

    async fn create(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.by_email.contains_key(&new.email) {
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
        inner.by_email.insert(identity.email.clone(), identity.id);
        inner.by_id.insert(identity.id, identity.clone());
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use workforce_auth::Role;

    fn new_identity(email: &str) -> NewIdentity {
        NewIdentity {
            name: "Ann".to_string(),
            email: Email::parse(email).unwrap(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn create_then_find_both_ways() {
        let store = InMemoryCredentialStore::new();
        let created = store.create(new_identity("ann@x.com")).await.unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        let by_email = store
            .find_by_email(&Email::parse("ANN@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id, created);
        assert_eq!(by_email, created);
    }

    #[tokio::test]
    async fn unknown_lookups_are_none() {
        let store = InMemoryCredentialStore::new();
        assert!(store.find_by_id(UserId::new()).await.unwrap().is_none());
        assert!(
            store
                .find_by_email(&Email::parse("nobody@x.com").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let store = InMemoryCredentialStore::new();
        store.create(new_identity("ann@x.com")).await.unwrap();
        assert_eq!(
            store.create(new_identity("Ann@X.com")).await.unwrap_err(),
            StoreError::Conflict
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_admit_one() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_identity("race@x.com")).await })
            })
            .collect();

        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) => assert_eq!(e, StoreError::Conflict),
            }
        }
        assert_eq!(ok, 1);
    }
}
