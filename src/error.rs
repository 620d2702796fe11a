use serde::Serialize;
use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// One field-level violation reported by boundary validation.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl ValidationDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Closed error taxonomy for the whole service.
///
/// The orchestrator retries only `Deadlock`; the HTTP layer translates the
/// kind into a status code. Item-level rejection reasons are not errors:
/// they travel as data inside a `ReservationResult`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Deadlock(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Vec<ValidationDetail>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn is_deadlock(&self) -> bool {
        matches!(self, Self::Deadlock(_))
    }
}

// MySQL error numbers for a detected deadlock victim and a lock-wait
// timeout. Both mean the same thing to the retry loop: transient lock
// contention with some ill-behaved actor.
const ER_LOCK_DEADLOCK: u16 = 1213;
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;

fn mysql_errno(err: &sqlx::Error) -> Option<u16> {
    match err {
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .map(|e| e.number()),
        _ => None,
    }
}

/// True when the storage layer reports lock contention that is worth
/// retrying after a backoff.
pub fn is_lock_signal(err: &sqlx::Error) -> bool {
    matches!(
        mysql_errno(err),
        Some(ER_LOCK_DEADLOCK) | Some(ER_LOCK_WAIT_TIMEOUT)
    )
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if is_lock_signal(&err) {
            AppError::Deadlock(err.to_string())
        } else {
            AppError::Internal(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadlock_variant_is_the_only_retryable_kind() {
        assert!(AppError::Deadlock("x".into()).is_deadlock());
        assert!(!AppError::NotFound("x".into()).is_deadlock());
        assert!(!AppError::Conflict("x".into()).is_deadlock());
        assert!(!AppError::Forbidden("x".into()).is_deadlock());
        assert!(!AppError::Internal(anyhow::anyhow!("x")).is_deadlock());
    }

    #[test]
    fn non_database_sqlx_errors_map_to_internal() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn validation_error_carries_details() {
        let err = AppError::validation(
            "validation failed",
            vec![ValidationDetail::new("companyId", "companyId is required")],
        );
        match err {
            AppError::Validation { details, .. } => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "companyId");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
