use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;
use uuid::Uuid;

use employees::contract::{Employee, EmployeePatch, EmployeeQuery, NewEmployee, Page};
use employees::domain::error::DomainError;
use employees::domain::repo::{EmployeesRepository, StoreError};
use employees::domain::service::Service;
use employees::infra::storage::migrations::Migrator;
use employees::infra::storage::SeaOrmEmployeesRepository;

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    // A single connection keeps the in-memory database alive and shared.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test domain service
async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    let repo = Arc::new(SeaOrmEmployeesRepository::new(db));
    Arc::new(Service::new(repo))
}

/// Create a test HTTP router
async fn create_test_router() -> Router {
    employees::api::rest::routes::router(create_test_service().await, "test")
}

fn new_employee(
    first: &str,
    last: &str,
    email: &str,
    title: &str,
    department: &str,
    location: &str,
) -> NewEmployee {
    NewEmployee {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: "+1234567890".to_string(),
        title: title.to_string(),
        department: department.to_string(),
        location: location.to_string(),
        hire_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        salary: Decimal::new(7_500_000, 2),
        avatar: None,
    }
}

/// Seed five employees across
/// {Engineering x2, Product, Design, Marketing}, in creation order.
async fn seed_five(svc: &Service) -> Vec<Uuid> {
    let records = [
        ("John", "Doe", "john.doe@corp.io", "Backend Engineer", "Engineering", "New York"),
        ("Jane", "Smith", "jane.smith@corp.io", "Product Manager", "Product", "San Francisco"),
        ("Mike", "Johnson", "mike.johnson@corp.io", "UX Designer", "Design", "Remote"),
        ("Sarah", "Wilson", "sarah.wilson@corp.io", "Marketing Lead", "Marketing", "London"),
        ("Erin", "Stone", "erin.stone@corp.io", "Frontend Engineer", "Engineering", "Remote"),
    ];

    let mut ids = Vec::new();
    for (first, last, email, title, dept, loc) in records {
        let created = svc
            .create_employee(new_employee(first, last, email, title, dept, loc))
            .await
            .expect("seed create");
        ids.push(created.id);
        // Distinct creation timestamps keep the newest-first order stable.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    ids
}

// ---------- service-level CRUD ----------

#[tokio::test]
async fn test_service_crud_lifecycle() -> Result<()> {
    let svc = create_test_service().await;

    let created = svc
        .create_employee(new_employee(
            "John",
            "Doe",
            "john.doe@corp.io",
            "Backend Engineer",
            "Engineering",
            "New York",
        ))
        .await?;
    assert_eq!(created.email, "john.doe@corp.io");
    assert_eq!(created.created_at, created.updated_at);

    let fetched = svc.get_employee(created.id).await?;
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.department, "Engineering");

    tokio::time::sleep(Duration::from_millis(5)).await;

    // Partial update: only supplied fields change.
    let updated = svc
        .update_employee(
            created.id,
            EmployeePatch {
                title: Some("Staff Engineer".to_string()),
                salary: Some(Decimal::new(12_000_000, 2)),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.title, "Staff Engineer");
    assert_eq!(updated.salary, Decimal::new(12_000_000, 2));
    assert_eq!(updated.first_name, "John");
    assert_eq!(updated.email, "john.doe@corp.io");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    svc.delete_employee(created.id).await?;

    let missing = svc.get_employee(created.id).await;
    assert!(matches!(
        missing,
        Err(DomainError::EmployeeNotFound { id }) if id == created.id
    ));

    // Deleting twice fails the second time.
    let twice = svc.delete_employee(created.id).await;
    assert!(matches!(twice, Err(DomainError::EmployeeNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_rejected_on_create() -> Result<()> {
    let svc = create_test_service().await;

    svc.create_employee(new_employee(
        "John",
        "Doe",
        "dup@corp.io",
        "Engineer",
        "Engineering",
        "NY",
    ))
    .await?;

    let second = svc
        .create_employee(new_employee(
            "Jane",
            "Smith",
            "dup@corp.io",
            "Designer",
            "Design",
            "LA",
        ))
        .await;
    assert!(matches!(
        second,
        Err(DomainError::DuplicateEmail { ref email }) if email == "dup@corp.io"
    ));

    // Store still contains exactly one record with that email.
    let page = svc.list_employees(EmployeeQuery::default()).await?;
    assert_eq!(page.total_items, 1);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_rejected_on_update() -> Result<()> {
    let svc = create_test_service().await;

    svc.create_employee(new_employee(
        "John", "Doe", "a@corp.io", "Engineer", "Engineering", "NY",
    ))
    .await?;
    let second = svc
        .create_employee(new_employee(
            "Jane", "Smith", "b@corp.io", "Designer", "Design", "LA",
        ))
        .await?;

    let collide = svc
        .update_employee(
            second.id,
            EmployeePatch {
                email: Some("a@corp.io".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(collide, Err(DomainError::DuplicateEmail { .. })));

    // Re-submitting the record's own email is not a collision.
    let same = svc
        .update_employee(
            second.id,
            EmployeePatch {
                email: Some("b@corp.io".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(same.email, "b@corp.io");

    Ok(())
}

#[tokio::test]
async fn test_validation_rejects_bad_payloads() {
    let svc = create_test_service().await;

    let mut bad_phone = new_employee("John", "Doe", "p@corp.io", "T", "D", "L");
    bad_phone.phone = "not-a-phone".to_string();
    assert!(matches!(
        svc.create_employee(bad_phone).await,
        Err(DomainError::Validation { ref field, .. }) if field == "phone"
    ));

    let mut bad_salary = new_employee("John", "Doe", "s@corp.io", "T", "D", "L");
    bad_salary.salary = Decimal::ZERO;
    assert!(matches!(
        svc.create_employee(bad_salary).await,
        Err(DomainError::Validation { ref field, .. }) if field == "salary"
    ));

    let mut bad_name = new_employee("J", "Doe", "n@corp.io", "T", "D", "L");
    bad_name.first_name = "J".to_string();
    assert!(matches!(
        svc.create_employee(bad_name).await,
        Err(DomainError::Validation { ref field, .. }) if field == "firstName"
    ));
}

// ---------- pagination and filtering ----------

#[tokio::test]
async fn test_pagination_math_and_ordering() -> Result<()> {
    let svc = create_test_service().await;
    let ids = seed_five(&svc).await;

    let page = svc
        .list_employees(EmployeeQuery {
            page: 1,
            limit: 2,
            ..Default::default()
        })
        .await?;

    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.limit, 2);
    assert_eq!(page.data.len(), 2);

    // Newest-created first.
    assert_eq!(page.data[0].id, ids[4]);
    assert_eq!(page.data[1].id, ids[3]);

    let last = svc
        .list_employees(EmployeeQuery {
            page: 3,
            limit: 2,
            ..Default::default()
        })
        .await?;
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].id, ids[0]);

    Ok(())
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_not_an_error() -> Result<()> {
    let svc = create_test_service().await;
    seed_five(&svc).await;

    let page = svc
        .list_employees(EmployeeQuery {
            page: 2,
            limit: 10,
            ..Default::default()
        })
        .await?;

    assert!(page.data.is_empty());
    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.current_page, 2);

    Ok(())
}

#[tokio::test]
async fn test_department_filter_is_exact_and_case_sensitive() -> Result<()> {
    let svc = create_test_service().await;
    seed_five(&svc).await;

    let engineering = svc
        .list_employees(EmployeeQuery {
            department: Some("Engineering".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(engineering.total_items, 2);
    assert!(engineering
        .data
        .iter()
        .all(|e| e.department == "Engineering"));

    // Equality is case-sensitive, unlike search.
    let lowercase = svc
        .list_employees(EmployeeQuery {
            department: Some("engineering".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(lowercase.total_items, 0);

    Ok(())
}

#[tokio::test]
async fn test_all_sentinel_disables_the_filter() -> Result<()> {
    let svc = create_test_service().await;
    seed_five(&svc).await;

    for sentinel in ["all", "All", "ALL"] {
        let page = svc
            .list_employees(EmployeeQuery {
                department: Some(sentinel.to_string()),
                location: Some(sentinel.to_string()),
                ..Default::default()
            })
            .await?;
        assert_eq!(page.total_items, 5, "sentinel {sentinel:?}");
    }

    Ok(())
}

#[tokio::test]
async fn test_filters_combine_conjunctively() -> Result<()> {
    let svc = create_test_service().await;
    seed_five(&svc).await;

    // Engineering AND Remote matches only Erin Stone.
    let page = svc
        .list_employees(EmployeeQuery {
            department: Some("Engineering".to_string()),
            location: Some("Remote".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(page.total_items, 1);
    assert_eq!(page.data[0].email, "erin.stone@corp.io");

    // Search AND department: "Engineer" appears in two titles, but
    // neither of those records is in Design.
    let none = svc
        .list_employees(EmployeeQuery {
            search: Some("Engineer".to_string()),
            department: Some("Design".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(none.total_items, 0);

    Ok(())
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() -> Result<()> {
    let svc = create_test_service().await;
    seed_five(&svc).await;

    // Lowercase term matches capitalized first name.
    let lower = svc
        .list_employees(EmployeeQuery {
            search: Some("john".to_string()),
            ..Default::default()
        })
        .await?;
    // "john" hits John Doe's first name and Mike Johnson's last name
    // plus both email addresses.
    assert_eq!(lower.total_items, 2);

    // Uppercase term matches the same records.
    let upper = svc
        .list_employees(EmployeeQuery {
            search: Some("JOHN".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(upper.total_items, 2);

    // Title column participates in search.
    let title = svc
        .list_employees(EmployeeQuery {
            search: Some("designer".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(title.total_items, 1);
    assert_eq!(title.data[0].email, "mike.johnson@corp.io");

    // Email column participates in search.
    let email = svc
        .list_employees(EmployeeQuery {
            search: Some("sarah.wilson".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(email.total_items, 1);

    Ok(())
}

#[tokio::test]
async fn test_blank_search_is_ignored() -> Result<()> {
    let svc = create_test_service().await;
    seed_five(&svc).await;

    let page = svc
        .list_employees(EmployeeQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(page.total_items, 5);

    Ok(())
}

// ---------- HTTP surface ----------

fn create_body() -> serde_json::Value {
    serde_json::json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@corp.io",
        "phone": "+1234567890",
        "title": "Backend Engineer",
        "department": "Engineering",
        "location": "New York",
        "hireDate": "2023-01-15",
        "salary": "95000.00"
    })
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_http_create_then_get() {
    let app = create_test_router().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/employees")
                .header("content-type", "application/json")
                .body(Body::from(create_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = read_json(response).await;
    assert_eq!(created["firstName"], "John");
    assert_eq!(created["email"], "john.doe@corp.io");
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/employees/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json(response).await;
    assert_eq!(fetched["id"], id.as_str());
}

#[tokio::test]
async fn test_http_duplicate_email_conflict() {
    let app = create_test_router().await;

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/employees")
                    .header("content-type", "application/json")
                    .body(Body::from(create_body().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_http_list_envelope_shape() {
    let app = create_test_router().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/employees")
                .header("content-type", "application/json")
                .body(Body::from(create_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/employees?page=1&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let envelope = read_json(response).await;
    assert_eq!(envelope["currentPage"], 1);
    assert_eq!(envelope["totalPages"], 1);
    assert_eq!(envelope["totalItems"], 1);
    assert_eq!(envelope["limit"], 10);
    assert_eq!(envelope["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_http_rejects_out_of_range_query_params() {
    let app = create_test_router().await;

    for uri in ["/employees?page=0", "/employees?limit=0", "/employees?limit=101"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_http_validation_error_is_400() {
    let app = create_test_router().await;

    let mut body = create_body();
    body["phone"] = serde_json::json!("invalid");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/employees")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let err = read_json(response).await;
    assert_eq!(err["error"], "EMPLOYEES_VALIDATION");
}

#[tokio::test]
async fn test_http_missing_employee_is_404() {
    let app = create_test_router().await;
    let id = Uuid::new_v4();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/employees/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let err = read_json(response).await;
    assert_eq!(err["error"], "EMPLOYEES_NOT_FOUND");
}

#[tokio::test]
async fn test_http_delete_then_delete_again() {
    let app = create_test_router().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/employees")
                .header("content-type", "application/json")
                .body(Body::from(create_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let created = read_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/employees/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let confirmation = read_json(response).await;
    assert_eq!(confirmation["message"], "Employee deleted successfully");

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/employees/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_http_partial_update() {
    let app = create_test_router().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/employees")
                .header("content-type", "application/json")
                .body(Body::from(create_body().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let created = read_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/employees/{id}"))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "title": "Staff Engineer" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated = read_json(response).await;
    assert_eq!(updated["title"], "Staff Engineer");
    assert_eq!(updated["firstName"], "John");
    assert_eq!(updated["email"], "john.doe@corp.io");
}

/// Repository whose store is unreachable; every call fails.
struct DisconnectedRepository;

#[async_trait::async_trait]
impl EmployeesRepository for DisconnectedRepository {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Employee>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn email_exists(&self, _email: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert(&self, _employee: Employee) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn update(&self, _employee: Employee) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list_page(&self, _query: &EmployeeQuery) -> Result<Page<Employee>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn test_http_health_degrades_when_store_is_down() {
    let svc = Arc::new(Service::new(Arc::new(DisconnectedRepository)));
    let app = employees::api::rest::routes::router(svc, "test");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let health = read_json(response).await;
    assert_eq!(health["status"], "warning");
    assert_eq!(health["database"], "disconnected");
    assert!(health["databaseError"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn test_http_health_reports_connected_store() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health = read_json(response).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "connected");
    assert_eq!(health["environment"], "test");
    assert!(health.get("timestamp").is_some());
}
