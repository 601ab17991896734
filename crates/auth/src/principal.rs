use workforce_core::UserId;

use crate::{Identity, IdentitySummary, Role};

/// A caller whose token has been validated and whose identity has been resolved.
///
/// Produced only by the [`crate::AccessGate`]; downstream handlers receive it as
/// request context and never re-derive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    summary: IdentitySummary,
}

impl Principal {
    pub(crate) fn from_identity(identity: &Identity) -> Self {
        Self {
            summary: identity.summary(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.summary.id
    }

    pub fn role(&self) -> Role {
        self.summary.role
    }

    pub fn is_admin(&self) -> bool {
        self.summary.role == Role::Admin
    }

    pub fn summary(&self) -> &IdentitySummary {
        &self.summary
    }
}
