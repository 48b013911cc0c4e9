//! Employee directory module.
//!
//! Layered like the rest of the workspace:
//! - `contract` — pure models shared across layers (no serde).
//! - `domain` — business rules, repository port, domain errors.
//! - `infra` — SeaORM-backed storage implementation and migrations.
//! - `api` — REST DTOs, handlers and router.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;
