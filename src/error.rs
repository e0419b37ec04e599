use crate::auth::verifier::TokenVerificationError;
use crate::auth::AuthError;
use crate::firestore::FirestoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

/// Application-level error, mapped onto HTTP responses.
///
/// The taxonomy is deliberately small: not found, bad input, unauthorized,
/// upstream (Firebase) errors propagated as-is, and everything else.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("resource not found")]
    NotFound,

    #[error("bad request: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("firebase auth error: {0}")]
    Auth(AuthError),

    #[error("firestore error: {0}")]
    Firestore(FirestoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UserNotFound => AppError::NotFound,
            other => AppError::Auth(other),
        }
    }
}

impl From<FirestoreError> for AppError {
    fn from(e: FirestoreError) -> Self {
        AppError::Firestore(e)
    }
}

impl From<TokenVerificationError> for AppError {
    fn from(e: TokenVerificationError) -> Self {
        AppError::Unauthorized(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // upstream service failures are propagated, not reinterpreted
            AppError::Auth(_) | AppError::Firestore(_) => StatusCode::BAD_GATEWAY,
            AppError::Io(_) | AppError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        HttpResponse::build(status).json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        })
    }
}
