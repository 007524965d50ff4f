//! Translation of Diesel and pool failures into user store port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{UniqueUserColumn, UserInsertError, UserPersistenceError};

use super::pool::PoolError;

/// Unique constraint on `users.username` created by the initial migration.
pub(super) const USERNAME_CONSTRAINT: &str = "users_username_key";
/// Unique constraint on `users.email` created by the initial migration.
pub(super) const EMAIL_CONSTRAINT: &str = "users_email_key";

pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Map an insert failure, classifying unique violations by constraint name.
pub(super) fn map_insert_error(error: DieselError) -> UserInsertError {
    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let column = classify_constraint(info.constraint_name());
            debug!(
                constraint = info.constraint_name(),
                "user insert hit unique constraint"
            );
            UserInsertError::unique_violation(column)
        }
        _ => UserInsertError::Persistence(map_diesel_error(error)),
    }
}

pub(super) fn classify_constraint(constraint: Option<&str>) -> Option<UniqueUserColumn> {
    match constraint {
        Some(USERNAME_CONSTRAINT) => Some(UniqueUserColumn::Username),
        Some(EMAIL_CONSTRAINT) => Some(UniqueUserColumn::Email),
        _ => None,
    }
}
