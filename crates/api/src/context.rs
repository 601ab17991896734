use workforce_auth::{IdentitySummary, Principal, Role};
use workforce_core::UserId;

/// Principal context for a request (the identity the gate resolved).
///
/// Inserted by the gate middleware; handlers behind the gate can always
/// extract it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn user_id(&self) -> UserId {
        self.principal.user_id()
    }

    pub fn role(&self) -> Role {
        self.principal.role()
    }

    pub fn is_admin(&self) -> bool {
        self.principal.is_admin()
    }

    pub fn summary(&self) -> &IdentitySummary {
        self.principal.summary()
    }

    /// Whether this caller may view the identity `id`: itself, or anyone if admin.
    pub fn may_view(&self, id: UserId) -> bool {
        self.is_admin() || self.user_id() == id
    }
}
