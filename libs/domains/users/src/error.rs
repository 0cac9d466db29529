use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Reading from storage failed (get, count, list)
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Writing to storage failed (create, update, delete)
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn retrieval(err: impl std::fmt::Display) -> Self {
        Self::Retrieval(format!("Database error: {}", err))
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(format!("Database error: {}", err))
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Retrieval(msg) => {
                AppError::InternalServerError(format!("Failed to retrieve users: {}", msg))
            }
            UserError::Persistence(msg) => {
                AppError::InternalServerError(format!("Failed to store user: {}", msg))
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
