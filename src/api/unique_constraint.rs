use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UniqueConstraintError {
    #[error("{0}")]
    Violation(&'static str),
    #[error("Database error: {0}")]
    Other(DbErr),
}

/// Maps database unique constraint violations to a user-facing message.
///
/// PostgreSQL names the violated index in its message, SQLite lists the
/// constrained columns instead, so either one identifies the constraint.
pub fn handle_unique_constraint_violation(
    message: &'static str,
    index_name: &'static str,
    columns: &'static [&'static str],
) -> impl Fn(DbErr) -> UniqueConstraintError {
    move |db_err: DbErr| {
        if violates(&db_err, index_name, columns) {
            UniqueConstraintError::Violation(message)
        } else {
            UniqueConstraintError::Other(db_err)
        }
    }
}

fn violates(db_err: &DbErr, index_name: &str, columns: &[&str]) -> bool {
    let detail = match db_err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => detail,
        _ => {
            let error_message = db_err.to_string();
            if !(error_message.contains("duplicate key value violates unique constraint")
                || error_message.contains("UNIQUE constraint failed"))
            {
                return false;
            }
            error_message
        }
    };

    detail.contains(index_name) || columns.iter().all(|column| detail.contains(column))
}
