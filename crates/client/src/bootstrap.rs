//! Session bootstrap: restore, sign in, sign up, sign out.

use tracing::{debug, info, warn};

use workforce_auth::{AuthSuccess, IdentitySummary, Role};

use crate::api::{AuthApi, ClientError};
use crate::session::{SessionStore, StoredSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated { user: IdentitySummary, token: String },
}

/// Holds the client's view of who is signed in.
///
/// The stored pair is trusted only while the server accepts it: any failed
/// lookup during [`restore`](Self::restore) discards id and token together.
pub struct SessionBootstrap<A, S> {
    api: A,
    store: S,
    state: SessionState,
}

impl<A: AuthApi, S: SessionStore> SessionBootstrap<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&IdentitySummary> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            SessionState::Unauthenticated => None,
        }
    }

    /// Bearer token to attach to outgoing requests, if signed in.
    pub fn bearer(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| u.role == Role::Admin)
    }

    /// Re-hydrate the identity from the stored pair, if any.
    pub async fn restore(&mut self) -> &SessionState {
        let stored = match self.store.load() {
            Ok(Some(s)) => s,
            Ok(None) => {
                self.state = SessionState::Unauthenticated;
                return &self.state;
            }
            Err(e) => {
                warn!(error = %e, "stored session unreadable; discarding");
                self.discard();
                return &self.state;
            }
        };

        match self.api.lookup(stored.user_id, &stored.token).await {
            Ok(user) => {
                debug!(user_id = %user.id, "session restored");
                self.state = SessionState::Authenticated {
                    user,
                    token: stored.token,
                };
            }
            Err(e) => {
                info!(reason = %e, "stored session rejected; discarding");
                self.discard();
            }
        }
        &self.state
    }

    pub async fn sign_in(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySummary, ClientError> {
        let success = self.api.sign_in(email, password).await?;
        self.adopt(success)
    }

    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<IdentitySummary, ClientError> {
        let success = self.api.sign_up(name, email, password).await?;
        self.adopt(success)
    }

    /// Forget the session locally. Tokens are not revoked server-side.
    pub fn sign_out(&mut self) -> Result<(), ClientError> {
        self.state = SessionState::Unauthenticated;
        self.store.clear()?;
        Ok(())
    }

    /// Persist first; in-memory state only changes once the pair is stored.
    fn adopt(&mut self, success: AuthSuccess) -> Result<IdentitySummary, ClientError> {
        self.store.save(&StoredSession {
            user_id: success.user.id,
            token: success.token.clone(),
        })?;
        info!(user_id = %success.user.id, "signed in");
        self.state = SessionState::Authenticated {
            user: success.user.clone(),
            token: success.token,
        };
        Ok(success.user)
    }

    fn discard(&mut self) {
        self.state = SessionState::Unauthenticated;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored session");
        }
    }
}
