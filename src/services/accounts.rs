use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait};
use tracing::info;

use crate::api::{
    request_result::RequestError, unique_constraint::handle_unique_constraint_violation,
};
use crate::auth::password::hash_password;
use crate::database::models::{role::Role, user};

pub const EMAIL_TAKEN: &str = "A user with this email already exists.";

/// Everything needed to open an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_staff: bool,
}

/// Create a user row with a hashed password.
///
/// The role is taken as given; callers exposed to the public decide which
/// roles may be requested before getting here.
pub async fn create_account<C>(db: &C, account: NewAccount) -> Result<user::Model, RequestError>
where
    C: ConnectionTrait,
{
    let password_hash = hash_password(&account.password)
        .map_err(|e| RequestError::Internal(format!("Failed to hash password: {e}")))?;

    let user = user::ActiveModel {
        email: Set(account.email.trim().to_lowercase()),
        username: Set(account.username),
        first_name: Set(account.first_name),
        last_name: Set(account.last_name),
        password_hash: Set(password_hash),
        role: Set(account.role),
        is_staff: Set(account.is_staff),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(handle_unique_constraint_violation(
        EMAIL_TAKEN,
        "user_email_key",
        &["email"],
    ))?;

    info!(user_id = %user.id, role = %user.role, "Account created");

    Ok(user)
}
