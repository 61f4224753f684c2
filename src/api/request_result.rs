use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::api::{json_error::JsonError, unique_constraint::UniqueConstraintError};
use crate::database::models::application_status::InvalidTransition;
use crate::policy::AccessDenied;

pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

pub type RequestResult = Result<RequestSuccess, RequestError>;

/// Successful handler outcome, rendered as JSON.
#[derive(Debug)]
pub enum RequestSuccess {
    Ok(Value),
    Created(Value),
    NoContent,
}

impl RequestSuccess {
    pub fn ok(body: impl Serialize) -> RequestResult {
        Ok(Self::Ok(serde_json::to_value(body)?))
    }

    pub fn created(body: impl Serialize) -> RequestResult {
        Ok(Self::Created(serde_json::to_value(body)?))
    }
}

impl IntoResponse for RequestSuccess {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Every way a request can fail.
///
/// Permission failures carry a fixed message and never say which check failed.
/// Storage errors are logged and answered with a bare 500.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Authentication credentials were not provided.")]
    AuthenticationRequired,
    #[error("{0}")]
    PermissionDenied(&'static str),
    #[error("No active account found with the given credentials.")]
    InvalidCredentials,
    #[error("Not found.")]
    NotFound,
    #[error("{0}")]
    BusinessRule(String),
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RequestError {
    pub const fn forbidden() -> Self {
        Self::PermissionDenied(PERMISSION_DENIED)
    }

    pub fn business_rule(reason: impl Into<String>) -> Self {
        Self::BusinessRule(reason.into())
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BusinessRule(_) | Self::Json(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AccessDenied> for RequestError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => Self::AuthenticationRequired,
            AccessDenied::Forbidden => Self::forbidden(),
        }
    }
}

impl From<UniqueConstraintError> for RequestError {
    fn from(err: UniqueConstraintError) -> Self {
        match err {
            UniqueConstraintError::Violation(reason) => Self::business_rule(reason),
            UniqueConstraintError::Other(db_err) => Self::Database(db_err),
        }
    }
}

impl From<InvalidTransition> for RequestError {
    fn from(err: InvalidTransition) -> Self {
        Self::business_rule(err.to_string())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Json(err) => err.into_response(),
            Self::Database(err) => {
                error!("Database error while handling request: {}", err);
                (status, Json(json!({ "detail": "Internal server error" }))).into_response()
            }
            Self::Serialization(err) => {
                error!("Failed to serialize response: {}", err);
                (status, Json(json!({ "detail": "Internal server error" }))).into_response()
            }
            Self::Internal(reason) => {
                error!("Internal error while handling request: {}", reason);
                (status, Json(json!({ "detail": "Internal server error" }))).into_response()
            }
            other => (status, Json(json!({ "detail": other.to_string() }))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_mapping() {
        assert_eq!(
            RequestError::from(AccessDenied::Unauthenticated).status_code(),
            StatusCode::UNAUTHORIZED
        );
        let forbidden = RequestError::from(AccessDenied::Forbidden);
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.to_string(), PERMISSION_DENIED);
    }

    #[test]
    fn test_unique_violation_becomes_business_rule() {
        let err = RequestError::from(UniqueConstraintError::Violation("Already there."));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Already there.");
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let err = RequestError::from(sea_orm::DbErr::Custom("boom".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
