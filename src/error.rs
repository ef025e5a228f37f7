use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Request-level error taxonomy. Every failure is terminal for its request
/// and maps to a JSON body of the form `{"message": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Not authorized, no token")]
    NoToken,
    #[error("Not authorized, token failed")]
    TokenFailed,
    /// Authenticated caller is not the owner of the target record. The API
    /// contract answers 401 here, same as the token failures.
    #[error("Not authorized")]
    NotOwner,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Server error")]
    Database(#[from] sqlx::Error),
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UserExists | ApiError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NoToken | ApiError::TokenFailed | ApiError::NotOwner => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => error!(error = %e, "database error"),
            ApiError::Internal(e) => error!(error = %e, "internal error"),
            _ => {}
        }
        (self.status(), Json(json!({ "message": self.to_string() }))).into_response()
    }
}
