//! `workforce-core`: shared domain building blocks.
//!
//! Typed identifiers, email normalisation and the domain error model. No infrastructure concerns.

pub mod email;
pub mod error;
pub mod id;

pub use email::normalize_email;
pub use error::{DomainError, DomainResult};
pub use id::{EmployeeId, UserId};
