use axum::{extract::State, http::StatusCode};
use sea_orm::DatabaseConnection;

use crate::app::ReadinessError;

pub async fn ok() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness(State(db): State<DatabaseConnection>) -> Result<StatusCode, ReadinessError> {
    db.ping().await?;
    Ok(StatusCode::OK)
}
