//! Employee records domain module.
//!
//! Validated create/update inputs, search matching, and the repository
//! contract. Deterministic domain logic only (no IO, no HTTP, no storage).

pub mod employee;
pub mod repository;
pub mod search;

pub use employee::{
    Address, Department, Employee, EmployeeDraft, EmployeeType, EmployeeUpdate, EmploymentStatus,
    NewEmployee, SalaryInput,
};
pub use repository::{EmployeeRepository, RepositoryError};
pub use search::matches_query;
