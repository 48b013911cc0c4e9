use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Pure employee model used between layers (no serde/schema attributes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub department: String,
    pub location: String,
    pub hire_date: NaiveDate,
    pub salary: Decimal,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub department: String,
    pub location: String,
    pub hire_date: NaiveDate,
    pub salary: Decimal,
    pub avatar: Option<String>,
}

/// Partial update data for an employee; `None` fields keep prior values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub salary: Option<Decimal>,
    pub avatar: Option<String>,
}

/// Filter + pagination request for the listing operation.
///
/// Range validation (`page >= 1`, `1 <= limit <= 100`) is the transport
/// layer's job; the domain assumes both already hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
}

impl Default for EmployeeQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            department: None,
            location: None,
        }
    }
}

/// Paginated result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records for the current page, newest first.
    pub data: Vec<T>,
    /// Echo of the requested page number.
    pub current_page: u32,
    /// `ceil(total_items / limit)`; 0 when nothing matches.
    pub total_pages: u32,
    /// Count of records matching the filters, ignoring pagination.
    pub total_items: u64,
    /// Echo of the requested page size.
    pub limit: u32,
}

impl<T> Page<T> {
    /// Shape a page from the matching rows of the current window.
    pub fn new(data: Vec<T>, total_items: u64, current_page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_items.div_ceil(limit as u64) as u32
        };
        Self {
            data,
            current_page,
            total_pages,
            total_items,
            limit,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            limit: self.limit,
        }
    }
}
