use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use employees::contract::{EmployeeQuery, NewEmployee};
use runtime::AppConfig;

use crate::server::{build_service, connect_database};

fn sample_employees() -> Vec<NewEmployee> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date");
    let salary = |units: i64| Decimal::new(units * 100, 2);

    vec![
        NewEmployee {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@company.com".into(),
            phone: "+1234567890".into(),
            title: "Senior Software Engineer".into(),
            department: "Engineering".into(),
            location: "New York".into(),
            hire_date: date(2023, 1, 15),
            salary: salary(95_000),
            avatar: None,
        },
        NewEmployee {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            email: "jane.smith@company.com".into(),
            phone: "+1234567891".into(),
            title: "Product Manager".into(),
            department: "Product".into(),
            location: "San Francisco".into(),
            hire_date: date(2023, 2, 20),
            salary: salary(110_000),
            avatar: None,
        },
        NewEmployee {
            first_name: "Mike".into(),
            last_name: "Johnson".into(),
            email: "mike.johnson@company.com".into(),
            phone: "+1234567892".into(),
            title: "UX Designer".into(),
            department: "Design".into(),
            location: "Remote".into(),
            hire_date: date(2023, 3, 10),
            salary: salary(75_000),
            avatar: None,
        },
        NewEmployee {
            first_name: "Sarah".into(),
            last_name: "Wilson".into(),
            email: "sarah.wilson@company.com".into(),
            phone: "+1234567893".into(),
            title: "Marketing Director".into(),
            department: "Marketing".into(),
            location: "London".into(),
            hire_date: date(2022, 11, 5),
            salary: salary(85_000),
            avatar: None,
        },
        NewEmployee {
            first_name: "David".into(),
            last_name: "Brown".into(),
            email: "david.brown@company.com".into(),
            phone: "+1234567894".into(),
            title: "Sales Representative".into(),
            department: "Sales".into(),
            location: "Toronto".into(),
            hire_date: date(2023, 4, 12),
            salary: salary(65_000),
            avatar: None,
        },
    ]
}

/// Insert the sample data set, skipping when the table already has rows.
pub async fn run_seed(config: AppConfig) -> Result<()> {
    tracing::info!("Starting database seeding");

    let db_config = config
        .database
        .clone()
        .ok_or_else(|| anyhow!("database configuration is required"))?;
    let base_dir = PathBuf::from(&config.server.home_dir);

    let db = connect_database(&db_config, &base_dir).await?;
    let service = build_service(db);

    let existing = service
        .list_employees(EmployeeQuery {
            page: 1,
            limit: 1,
            ..Default::default()
        })
        .await
        .map_err(|e| anyhow!("cannot inspect employee table: {e}"))?;

    if existing.total_items > 0 {
        tracing::info!(
            "Database already contains {} employees, skipping seed",
            existing.total_items
        );
        println!(
            "Database already contains {} employees. Skipping seed.",
            existing.total_items
        );
        return Ok(());
    }

    let samples = sample_employees();
    let count = samples.len();
    for sample in samples {
        let name = format!("{} {}", sample.first_name, sample.last_name);
        service
            .create_employee(sample)
            .await
            .map_err(|e| anyhow!("failed to seed employee {name}: {e}"))?;
        tracing::info!("Created employee: {name}");
    }

    println!("Successfully seeded {count} employees");
    Ok(())
}
