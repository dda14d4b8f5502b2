//! Database lifecycle helpers for integration tests.
//!
//! - Database reset uses `postgres` so `DROP DATABASE` runs outside any
//!   transaction.
//! - Schema setup runs the crate's embedded Diesel migrations so test schemas
//!   never drift from production.

use accounts::outbound::persistence::migrations::run_pending_migrations;
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use super::format_postgres_error;

const MAINTENANCE_DB: &str = "postgres";

/// Drop and recreate `name` on the cluster.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let url = cluster.connection().database_url(MAINTENANCE_DB);
    let mut client = Client::connect(&url, NoTls).map_err(|err| format_postgres_error(&err))?;
    // DROP/CREATE DATABASE refuse to run inside a transaction block.
    for statement in [
        format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"),
        format!("CREATE DATABASE \"{name}\""),
    ] {
        client
            .batch_execute(&statement)
            .map_err(|err| format_postgres_error(&err))?;
    }
    Ok(())
}

/// Run all pending migrations against the test database.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    run_pending_migrations(url)
        .map(|_| ())
        .map_err(|err| err.to_string())
}
