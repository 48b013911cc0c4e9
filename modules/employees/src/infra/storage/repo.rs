//! SeaORM-backed repository implementation for the domain port.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::contract::{Employee, EmployeeQuery, Page};
use crate::domain::repo::{EmployeesRepository, StoreError};
use crate::infra::storage::entity::{ActiveModel, Column, Entity as Employees};
use crate::infra::storage::mapper::entity_to_contract;

/// SeaORM repository impl holding the shared connection pool.
#[derive(Clone)]
pub struct SeaOrmEmployeesRepository {
    db: DatabaseConnection,
}

impl SeaOrmEmployeesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> StoreError {
    if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        return StoreError::UniqueViolation(detail);
    }
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Unavailable(e.to_string()),
        other => StoreError::Other(anyhow::Error::new(other)),
    }
}

fn active_model(e: Employee) -> ActiveModel {
    ActiveModel {
        id: Set(e.id),
        first_name: Set(e.first_name),
        last_name: Set(e.last_name),
        email: Set(e.email),
        phone: Set(e.phone),
        title: Set(e.title),
        department: Set(e.department),
        location: Set(e.location),
        hire_date: Set(e.hire_date),
        salary: Set(e.salary),
        avatar: Set(e.avatar),
        created_at: Set(e.created_at),
        updated_at: Set(e.updated_at),
    }
}

/// Build the conjunctive filter condition for a normalized query.
///
/// Search is a case-insensitive substring match (`LOWER(col) LIKE`)
/// across first name, last name, email and title; department/location
/// are case-sensitive equality. The asymmetry is deliberate and mirrors
/// how clients use the two kinds of filter.
fn filter_condition(query: &EmployeeQuery) -> Condition {
    let mut cond = Condition::all();

    if let Some(term) = &query.search {
        let pattern = format!("%{}%", term.to_lowercase());
        let mut any = Condition::any();
        for col in [
            Column::FirstName,
            Column::LastName,
            Column::Email,
            Column::Title,
        ] {
            any = any.add(Expr::expr(Func::lower(Expr::col(col))).like(pattern.clone()));
        }
        cond = cond.add(any);
    }

    if let Some(department) = &query.department {
        cond = cond.add(Column::Department.eq(department));
    }

    if let Some(location) = &query.location {
        cond = cond.add(Column::Location.eq(location));
    }

    cond
}

#[async_trait]
impl EmployeesRepository for SeaOrmEmployeesRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        let found = Employees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(found.map(entity_to_contract))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let count = Employees::find()
            .filter(Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, employee: Employee) -> Result<(), StoreError> {
        active_model(employee)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn update(&self, employee: Employee) -> Result<(), StoreError> {
        active_model(employee)
            .update(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = Employees::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(res.rows_affected > 0)
    }

    async fn list_page(&self, query: &EmployeeQuery) -> Result<Page<Employee>, StoreError> {
        let base = Employees::find().filter(filter_condition(query));

        // One count query plus one select query per listing.
        let total_items = base.clone().count(&self.db).await.map_err(map_db_err)?;

        let offset = (query.page as u64 - 1) * query.limit as u64;
        let rows = base
            .order_by_desc(Column::CreatedAt)
            // Deterministic tiebreak for identical timestamps.
            .order_by_desc(Column::Id)
            .offset(offset)
            .limit(query.limit as u64)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let data = rows.into_iter().map(entity_to_contract).collect();
        Ok(Page::new(data, total_items, query.page, query.limit))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.map_err(map_db_err)
    }
}
