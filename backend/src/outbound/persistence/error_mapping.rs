//! Mapping from pool and Diesel failures to `PersistenceError`.
//!
//! Every storage failure is `Io`; only row re-validation produces
//! `DataConsistency` (see `mapping.rs`).

use tracing::debug;

use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

/// Map pool errors to persistence I/O errors.
pub(crate) fn map_pool_error(error: PoolError) -> PersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            debug!(%message, "connection pool unavailable");
            PersistenceError::io(message)
        }
    }
}

/// Map Diesel errors to persistence I/O errors, logging the failure kind.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> PersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::io("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
        | DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            PersistenceError::io(format!("constraint violated: {}", info.message()))
        }
        DieselError::DatabaseError(_, info) => PersistenceError::io(info.message().to_owned()),
        DieselError::RollbackTransaction => PersistenceError::io("transaction rolled back"),
        other => PersistenceError::io(other.to_string()),
    }
}
