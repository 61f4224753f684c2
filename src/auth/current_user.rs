use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use crate::api::request_result::RequestError;
use crate::auth::jwt;
use crate::config::Config;
use crate::database::models::user;
use crate::policy::{self, Action, Caller, Resource};

/// Authenticated user extracted from the bearer token.
///
/// Loads the user row on every request so role and staff changes take effect
/// immediately. Inactive accounts are treated as unauthenticated.
///
/// # Example
/// ```rust,ignore
/// pub async fn me(current_user: CurrentUser) -> RequestResult {
///     RequestSuccess::ok(UserResponse::from(current_user.user))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: user::Model,
}

impl CurrentUser {
    pub fn caller(&self) -> Caller {
        Caller::from(&self.user)
    }

    /// Check an action that needs no loaded object.
    pub fn authorize(&self, resource: Resource, action: Action) -> Result<(), RequestError> {
        Ok(policy::authorize(Some(&self.caller()), resource, action)?)
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = user::Model;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

/// Error type for CurrentUser extraction failures.
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header provided, invalid format or unknown user
    Unauthorized,
    /// Database error while loading user
    DatabaseError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Authentication credentials were not provided." })),
            )
                .into_response(),
            AuthError::DatabaseError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Config: FromRef<S>,
    DatabaseConnection: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract token (format: "Bearer <token>")
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::Unauthorized)?;

        let config = Config::from_ref(state);
        let claims = jwt::verify_token(&config.jwt, token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            AuthError::Unauthorized
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::Unauthorized)?;

        let db = DatabaseConnection::from_ref(state);
        let user = user::Entity::find_by_id(user_id)
            .one(&db)
            .await
            .map_err(|e| {
                error!("Failed to load user {}: {}", user_id, e);
                AuthError::DatabaseError
            })?
            .filter(|user| user.is_active)
            .ok_or(AuthError::Unauthorized)?;

        Ok(CurrentUser { user })
    }
}
