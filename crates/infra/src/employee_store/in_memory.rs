use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use workforce_core::{DomainError, EmployeeId};
use workforce_employees::{
    Employee, EmployeeRepository, EmployeeUpdate, NewEmployee, RepositoryError, matches_query,
};

/// In-memory employee repository.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    records: RwLock<HashMap<EmployeeId, Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("lock poisoned".to_string())
}

fn email_taken(email: &str) -> RepositoryError {
    DomainError::conflict(format!("employee email {email} already exists")).into()
}

fn newest_first(mut records: Vec<Employee>) -> Vec<Employee> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    records
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeStore {
    async fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(newest_first(records.values().cloned().collect()))
    }

    async fn search(&self, query: &str) -> Result<Vec<Employee>, RepositoryError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(newest_first(
            records
                .values()
                .filter(|e| matches_query(e, query))
                .cloned()
                .collect(),
        ))
    }

    async fn get(&self, id: EmployeeId) -> Result<Employee, RepositoryError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        records
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found().into())
    }

    async fn create(&self, new: NewEmployee) -> Result<Employee, RepositoryError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.values().any(|e| e.email == new.email) {
            return Err(email_taken(&new.email));
        }
        let employee = Employee::create(EmployeeId::new(), new, Utc::now());
        records.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update(
        &self,
        id: EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<Employee, RepositoryError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if !records.contains_key(&id) {
            return Err(DomainError::not_found().into());
        }
        if let Some(email) = &update.email {
            if records.values().any(|e| e.id != id && &e.email == email) {
                return Err(email_taken(email));
            }
        }
        let employee = records.get_mut(&id).ok_or_else(DomainError::not_found)?;
        employee.apply(update, Utc::now());
        Ok(employee.clone())
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found().into())
    }
}
