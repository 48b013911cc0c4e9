use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::{Employee, EmployeePatch, EmployeeQuery, NewEmployee, Page};
use crate::domain::error::DomainError;
use crate::domain::repo::EmployeesRepository;

/// Sentinel filter value meaning "no filter", accepted in any casing.
const ALL_SENTINEL: &str = "all";

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone pattern"));

/// Domain service with business rules for the employee directory.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn EmployeesRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn EmployeesRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "employees.service.get_employee", skip(self), fields(employee_id = %id))]
    pub async fn get_employee(&self, id: Uuid) -> Result<Employee, DomainError> {
        debug!("Getting employee by id");

        let employee = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::from_store(e, None))?
            .ok_or_else(|| DomainError::employee_not_found(id))?;
        Ok(employee)
    }

    /// Filtered, paginated listing.
    ///
    /// Filters combine conjunctively. The search term matches first name,
    /// last name, email or title as a case-insensitive substring; the
    /// department/location filters are case-sensitive equality with an
    /// `"all"` escape hatch (any casing). A page past the end of the
    /// result set yields empty `data`, not an error.
    #[instrument(name = "employees.service.list_employees", skip(self))]
    pub async fn list_employees(
        &self,
        query: EmployeeQuery,
    ) -> Result<Page<Employee>, DomainError> {
        let query = normalize_query(query);
        debug!(?query, "Listing employees");

        let page = self
            .repo
            .list_page(&query)
            .await
            .map_err(|e| DomainError::from_store(e, None))?;

        debug!(
            returned = page.data.len(),
            total = page.total_items,
            "Listed employees"
        );
        Ok(page)
    }

    #[instrument(
        name = "employees.service.create_employee",
        skip(self, new_employee),
        fields(email = %new_employee.email)
    )]
    pub async fn create_employee(
        &self,
        new_employee: NewEmployee,
    ) -> Result<Employee, DomainError> {
        info!("Creating new employee");

        self.validate_new_employee(&new_employee)?;

        if self
            .repo
            .email_exists(&new_employee.email)
            .await
            .map_err(|e| DomainError::from_store(e, None))?
        {
            return Err(DomainError::duplicate_email(new_employee.email));
        }

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4(),
            first_name: new_employee.first_name,
            last_name: new_employee.last_name,
            email: new_employee.email,
            phone: new_employee.phone,
            title: new_employee.title,
            department: new_employee.department,
            location: new_employee.location,
            hire_date: new_employee.hire_date,
            salary: new_employee.salary,
            avatar: new_employee.avatar,
            created_at: now,
            updated_at: now,
        };

        // A concurrent create may slip past the pre-check; the store's
        // unique constraint is authoritative and maps to the same error.
        let email = employee.email.clone();
        self.repo
            .insert(employee.clone())
            .await
            .map_err(|e| DomainError::from_store(e, Some(&email)))?;

        info!("Created employee with id={}", employee.id);
        Ok(employee)
    }

    #[instrument(
        name = "employees.service.update_employee",
        skip(self, patch),
        fields(employee_id = %id)
    )]
    pub async fn update_employee(
        &self,
        id: Uuid,
        patch: EmployeePatch,
    ) -> Result<Employee, DomainError> {
        info!("Updating employee");

        self.validate_patch(&patch)?;

        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::from_store(e, None))?
            .ok_or_else(|| DomainError::employee_not_found(id))?;

        if let Some(ref new_email) = patch.email {
            if new_email != &current.email
                && self
                    .repo
                    .email_exists(new_email)
                    .await
                    .map_err(|e| DomainError::from_store(e, None))?
            {
                return Err(DomainError::duplicate_email(new_email.clone()));
            }
        }

        apply_patch(&mut current, patch);
        current.updated_at = Utc::now();

        let email = current.email.clone();
        self.repo
            .update(current.clone())
            .await
            .map_err(|e| DomainError::from_store(e, Some(&email)))?;

        info!("Updated employee");
        Ok(current)
    }

    #[instrument(
        name = "employees.service.delete_employee",
        skip(self),
        fields(employee_id = %id)
    )]
    pub async fn delete_employee(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting employee");

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DomainError::from_store(e, None))?;

        if !deleted {
            return Err(DomainError::employee_not_found(id));
        }

        info!("Deleted employee");
        Ok(())
    }

    /// Store connectivity probe used by the health endpoint.
    #[instrument(name = "employees.service.probe_store", skip(self))]
    pub async fn probe_store(&self) -> Result<(), DomainError> {
        self.repo
            .ping()
            .await
            .map_err(|e| DomainError::from_store(e, None))
    }

    // --- validation helpers ---

    fn validate_new_employee(&self, e: &NewEmployee) -> Result<(), DomainError> {
        validate_name("firstName", &e.first_name)?;
        validate_name("lastName", &e.last_name)?;
        validate_email(&e.email)?;
        validate_phone(&e.phone)?;
        validate_text("title", &e.title, 100)?;
        validate_text("department", &e.department, 50)?;
        validate_text("location", &e.location, 100)?;
        validate_salary(e.salary)?;
        Ok(())
    }

    fn validate_patch(&self, patch: &EmployeePatch) -> Result<(), DomainError> {
        if let Some(ref v) = patch.first_name {
            validate_name("firstName", v)?;
        }
        if let Some(ref v) = patch.last_name {
            validate_name("lastName", v)?;
        }
        if let Some(ref v) = patch.email {
            validate_email(v)?;
        }
        if let Some(ref v) = patch.phone {
            validate_phone(v)?;
        }
        if let Some(ref v) = patch.title {
            validate_text("title", v, 100)?;
        }
        if let Some(ref v) = patch.department {
            validate_text("department", v, 50)?;
        }
        if let Some(ref v) = patch.location {
            validate_text("location", v, 100)?;
        }
        if let Some(salary) = patch.salary {
            validate_salary(salary)?;
        }
        Ok(())
    }
}

/// Trim the search term and drop sentinel/empty filters before the query
/// reaches the store.
fn normalize_query(mut query: EmployeeQuery) -> EmployeeQuery {
    query.search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    query.department = normalize_filter(query.department);
    query.location = normalize_filter(query.location);
    query
}

fn normalize_filter(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ALL_SENTINEL))
}

fn apply_patch(current: &mut Employee, patch: EmployeePatch) {
    if let Some(first_name) = patch.first_name {
        current.first_name = first_name;
    }
    if let Some(last_name) = patch.last_name {
        current.last_name = last_name;
    }
    if let Some(email) = patch.email {
        current.email = email;
    }
    if let Some(phone) = patch.phone {
        current.phone = phone;
    }
    if let Some(title) = patch.title {
        current.title = title;
    }
    if let Some(department) = patch.department {
        current.department = department;
    }
    if let Some(location) = patch.location {
        current.location = location;
    }
    if let Some(hire_date) = patch.hire_date {
        current.hire_date = hire_date;
    }
    if let Some(salary) = patch.salary {
        current.salary = salary;
    }
    if let Some(avatar) = patch.avatar {
        current.avatar = Some(avatar);
    }
}

fn validate_name(field: &str, value: &str) -> Result<(), DomainError> {
    let len = value.chars().count();
    if len < 2 || len > 50 {
        return Err(DomainError::validation(
            field,
            "must be between 2 and 50 characters",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() || email.len() > 100 || !email.contains('@') || !email.contains('.') {
        return Err(DomainError::validation("email", "invalid email address"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), DomainError> {
    if !PHONE_RE.is_match(phone) {
        return Err(DomainError::validation(
            "phone",
            "must be a valid phone number",
        ));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() || value.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("must be non-empty and at most {max} characters"),
        ));
    }
    Ok(())
}

fn validate_salary(salary: Decimal) -> Result<(), DomainError> {
    if salary <= Decimal::ZERO {
        return Err(DomainError::validation("salary", "must be positive"));
    }
    Ok(())
}
