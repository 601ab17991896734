//! Client side of the authentication flow.
//!
//! [`HttpAuthApi`] talks to the server; [`SessionBootstrap`] keeps the
//! (identity id, token) pair in a [`SessionStore`] and re-hydrates it on start.

pub mod api;
pub mod bootstrap;
pub mod session;

pub use api::{AuthApi, ClientError, HttpAuthApi};
pub use bootstrap::{SessionBootstrap, SessionState};
pub use session::{FileSessionStore, InMemorySessionStore, SessionError, SessionStore, StoredSession};
