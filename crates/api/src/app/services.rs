//! Service wiring shared by every handler.

use std::sync::Arc;

use anyhow::Context;

use workforce_auth::{
    AccessGate, AuthError, AuthService, Registration, Role, TokenConfig, TokenService,
};
use workforce_employees::EmployeeRepository;
use workforce_infra::{BootstrapAdmin, Stores};

#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub gate: AccessGate,
    pub employees: Arc<dyn EmployeeRepository>,
}

impl AppServices {
    pub fn new(stores: Stores, tokens: TokenConfig) -> Self {
        let tokens = Arc::new(TokenService::new(tokens));
        Self {
            auth: AuthService::new(stores.credentials.clone(), tokens.clone()),
            gate: AccessGate::new(tokens, stores.credentials),
            employees: stores.employees,
        }
    }

    /// Create the configured administrator unless that email is already registered.
    pub async fn seed_admin(&self, admin: &BootstrapAdmin) -> anyhow::Result<()> {
        let registration = Registration::parse(
            Some(admin.name.as_str()),
            Some(admin.email.as_str()),
            Some(admin.password.as_str()),
        )
        .context("invalid bootstrap admin credentials")?;

        match self.auth.provision(registration, Role::Admin).await {
            Ok(identity) => {
                tracing::info!(user_id = %identity.id, email = %identity.email, "bootstrap admin created");
                Ok(())
            }
            Err(AuthError::EmailTaken) => {
                tracing::info!("bootstrap admin already present");
                Ok(())
            }
            Err(e) => Err(e).context("failed to create bootstrap admin"),
        }
    }
}
