use axum::extract::State;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::api::validated_json::ValidatedJson;
use crate::app::App;
use crate::auth::{generate_token, password::verify_password, prelude::*};
use crate::database::models::{
    role::Role,
    user::{self, UserResponse},
};
use crate::services::accounts::{create_account, NewAccount};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Self-service profile changes. Role and staff flag are not accepted here.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

fn token_for(app: &App, user: user::Model) -> Result<AuthResponse, RequestError> {
    let token = generate_token(&app.config.jwt, user.id)
        .map_err(|e| RequestError::Internal(format!("Failed to sign token: {e}")))?;

    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn register(
    State(app): State<App>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> RequestResult {
    let role = request.role.unwrap_or_default();
    if !role.is_self_assignable() {
        return Err(RequestError::business_rule(format!(
            "Cannot register with role {role}."
        )));
    }

    let user = create_account(
        &app.db,
        NewAccount {
            email: request.email,
            username: request.username,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            role,
            is_staff: false,
        },
    )
    .await?;

    RequestSuccess::created(token_for(&app, user)?)
}

pub async fn login(
    State(app): State<App>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> RequestResult {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(request.email.trim().to_lowercase()))
        .filter(user::Column::IsActive.eq(true))
        .one(&app.db)
        .await?
        .ok_or(RequestError::InvalidCredentials)?;

    let verified = verify_password(&request.password, &user.password_hash).unwrap_or_else(|e| {
        debug!(user_id = %user.id, "Stored password hash is unusable: {}", e);
        false
    });

    if !verified {
        return Err(RequestError::InvalidCredentials);
    }

    RequestSuccess::ok(token_for(&app, user)?)
}

pub async fn me(current_user: CurrentUser) -> RequestResult {
    RequestSuccess::ok(UserResponse::from(current_user.user))
}

pub async fn update_me(
    State(app): State<App>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<UpdateMeRequest>,
) -> RequestResult {
    let mut user: user::ActiveModel = current_user.user.into();

    if let Some(username) = request.username {
        user.username = Set(username);
    }
    if let Some(first_name) = request.first_name {
        user.first_name = Set(first_name);
    }
    if let Some(last_name) = request.last_name {
        user.last_name = Set(last_name);
    }

    let user = user.update(&app.db).await?;

    RequestSuccess::ok(UserResponse::from(user))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::database::models::role::Role;
    use crate::tests::{fixtures, setup_test::setup_test};

    #[tokio::test]
    async fn test_register_and_login() {
        let t = setup_test().await;

        let response = t
            .server
            .post("/api/auth/register")
            .json(&json!({
                "email": "Recruiter@Example.com",
                "username": "recruiter",
                "password": "s3cret-password",
                "role": "EMPLOYER",
                "is_staff": true,
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["user"]["email"], "recruiter@example.com");
        assert_eq!(body["user"]["role"], "EMPLOYER");
        assert_eq!(body["user"]["is_staff"], false);

        let response = t
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": "recruiter@example.com", "password": "wrong-password" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let response = t
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": "recruiter@example.com", "password": "s3cret-password" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let token = response.json::<Value>()["token"]
            .as_str()
            .expect("Login should return a token")
            .to_string();

        let response = t
            .server
            .get("/api/auth/me")
            .authorization_bearer(token)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["username"], "recruiter");
    }

    #[tokio::test]
    async fn test_register_rejects_admin_role_and_duplicate_email() {
        let t = setup_test().await;

        let response = t
            .server
            .post("/api/auth/register")
            .json(&json!({
                "email": "boss@example.com",
                "username": "boss",
                "password": "s3cret-password",
                "role": "ADMIN",
            }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let body = json!({
            "email": "seeker@example.com",
            "username": "seeker",
            "password": "s3cret-password",
        });
        let response = t.server.post("/api/auth/register").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["user"]["role"], "JOB_SEEKER");

        let response = t.server.post("/api/auth/register").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["detail"],
            "A user with this email already exists."
        );
    }

    #[tokio::test]
    async fn test_update_me_never_changes_the_role() {
        let t = setup_test().await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;

        let response = t
            .server
            .patch("/api/auth/me")
            .authorization_bearer(t.token_for(&seeker))
            .json(&json!({ "first_name": "Ada", "role": "ADMIN" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["first_name"], "Ada");
        assert_eq!(body["role"], "JOB_SEEKER");
    }

    #[tokio::test]
    async fn test_me_requires_a_token() {
        let t = setup_test().await;

        let response = t.server.get("/api/auth/me").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>()["detail"],
            "Authentication credentials were not provided."
        );
    }
}
