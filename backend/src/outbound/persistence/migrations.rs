//! Embedded schema migrations for the account store.
//!
//! Migrations run over a synchronous `PgConnection`; the async pool is not
//! involved.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while inspecting or applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },

    /// A migration failed to apply or the migration table is unreadable.
    #[error("migration failed: {message}")]
    Apply { message: String },
}

impl MigrationError {
    fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    fn apply(message: impl Into<String>) -> Self {
        Self::Apply {
            message: message.into(),
        }
    }
}

fn establish(database_url: &str) -> Result<PgConnection, MigrationError> {
    PgConnection::establish(database_url).map_err(|err| MigrationError::connect(err.to_string()))
}

/// Apply every pending migration and return the applied versions in order.
///
/// # Errors
///
/// Returns `MigrationError::Connect` when the database is unreachable and
/// `MigrationError::Apply` when a migration fails. A failing migration is
/// rolled back; earlier ones stay applied.
pub fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn = establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::apply(err.to_string()))?
        .into_iter()
        .map(|version| version.to_string())
        .collect::<Vec<_>>();
    info!(count = applied.len(), "applied pending migrations");
    Ok(applied)
}

/// List the names of migrations not yet applied.
///
/// # Errors
///
/// Same conditions as [`run_pending_migrations`].
pub fn pending_migrations(database_url: &str) -> Result<Vec<String>, MigrationError> {
    let mut conn = establish(database_url)?;
    let pending = conn
        .pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::apply(err.to_string()))?;
    Ok(pending
        .iter()
        .map(|migration| migration.name().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unreachable_database_reports_connect_error() {
        let err = pending_migrations("postgres://unused@127.0.0.1:1/none")
            .expect_err("nothing listens on port 1");

        assert!(matches!(err, MigrationError::Connect { .. }));
    }
}
