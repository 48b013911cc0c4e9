use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::contract::{Employee, EmployeeQuery, Page};

/// Repository-level failures, mapped to `DomainError` by the service.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connectivity or pool-acquire failure; no partial results.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Unique constraint violation, with the offending constraint/column.
    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait EmployeesRepository: Send + Sync {
    /// Load an employee by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError>;

    /// Check uniqueness by email.
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    /// Insert a fully-formed employee.
    ///
    /// Service computes id/timestamps/validation; repo persists.
    async fn insert(&self, employee: Employee) -> Result<(), StoreError>;

    /// Update an existing employee (by primary key in `employee.id`).
    async fn update(&self, employee: Employee) -> Result<(), StoreError>;

    /// Delete by id. Returns true if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Filtered, ordered, paginated listing plus the total match count.
    ///
    /// The query is expected to be normalized already (trimmed search,
    /// sentinel filters removed); see `Service::list_employees`.
    async fn list_page(&self, query: &EmployeeQuery) -> Result<Page<Employee>, StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
