use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::{Employee, EmployeePatch, EmployeeQuery, NewEmployee, Page};

/// REST DTO for employee representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub department: String,
    pub location: String,
    #[schema(value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    #[schema(value_type = String)]
    pub salary: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating a new employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeReq {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub department: String,
    pub location: String,
    #[schema(value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    #[schema(value_type = String)]
    pub salary: Decimal,
    pub avatar: Option<String>,
}

/// REST DTO for updating an employee (partial)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub salary: Option<Decimal>,
    pub avatar: Option<String>,
}

/// Paginated employee list envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePageDto {
    pub data: Vec<EmployeeDto>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub limit: u32,
}

/// REST DTO for listing query parameters
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ListEmployeesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
}

/// Confirmation body for a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponseDto {
    pub message: String,
}

/// Health probe response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_secs: u64,
    pub environment: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
}

// Conversions between REST DTOs and contract models

impl From<Employee> for EmployeeDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            phone: e.phone,
            title: e.title,
            department: e.department,
            location: e.location,
            hire_date: e.hire_date,
            salary: e.salary,
            avatar: e.avatar,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<CreateEmployeeReq> for NewEmployee {
    fn from(req: CreateEmployeeReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            title: req.title,
            department: req.department,
            location: req.location,
            hire_date: req.hire_date,
            salary: req.salary,
            avatar: req.avatar,
        }
    }
}

impl From<UpdateEmployeeReq> for EmployeePatch {
    fn from(req: UpdateEmployeeReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            title: req.title,
            department: req.department,
            location: req.location,
            hire_date: req.hire_date,
            salary: req.salary,
            avatar: req.avatar,
        }
    }
}

impl From<Page<Employee>> for EmployeePageDto {
    fn from(page: Page<Employee>) -> Self {
        let page = page.map(EmployeeDto::from);
        Self {
            data: page.data,
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            limit: page.limit,
        }
    }
}
