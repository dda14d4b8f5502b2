//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Implements the `Find` and `Persist` ports, and the home read-side
//! queries, over an append-only schema:
//! every fact (email registration, profile, membership, role assignment,
//! invitation) is a new row, current state is the latest row per key, and
//! removals are marker rows (`users_delete`, `belong_dismiss`,
//! `organizations_delete`, `organizations_invitation_cancel`) joined away.
//!
//! - **Thin adapters**: repositories only translate between rows and domain
//!   values. Business rules stay in the domain.
//! - **Internal models**: row structs (`models.rs`), the schema (`schema.rs`)
//!   and the raw current-state queries (`queries.rs`) are not exported.
//! - **Transactions**: each read runs in one transaction for a consistent
//!   snapshot; each persist appends all of its rows atomically.
//! - **Errors**: storage failures are `Io`; rows the domain rejects are
//!   `DataConsistency`.
//!
//! # Example
//!
//! ```ignore
//! use accounts::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_home_query;
mod diesel_organization_repository;
mod diesel_unknown_user_repository;
mod diesel_user_repository;
mod error_mapping;
mod mapping;
pub mod migrations;
mod models;
mod pool;
mod queries;
mod schema;

pub use diesel_home_query::DieselHomeQuery;
pub use diesel_organization_repository::DieselOrganizationRepository;
pub use diesel_unknown_user_repository::DieselUnknownUserRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError};
pub use pool::{DbPool, PoolConfig, PoolError};
