pub mod habit_service;
pub mod record_service;
pub mod stats;
pub mod success;
pub mod user_service;

use thiserror::Error;

use crate::api::ValidationErrors;
use crate::database::manager::DatabaseError;

pub use habit_service::HabitService;
pub use record_service::{DailyRecordService, RecordFilter};
pub use user_service::UserService;

/// Failures of the habit and record write/read paths
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(DatabaseError::Sqlx(err))
    }
}
