//! Submitting an application to a job listing.

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::api::{
    request_result::RequestError, unique_constraint::handle_unique_constraint_violation,
};
use crate::database::models::{
    job_application::{self, JOB_APPLICANT_INDEX},
    job_listing,
};
use crate::policy::{Caller, JobListingPolicy};

pub const SEEKERS_ONLY: &str = "Only job seekers can apply for jobs.";
pub const JOB_INACTIVE: &str = "This job listing is no longer active.";
pub const ALREADY_APPLIED: &str = "You have already applied for this job.";

/// Fields the applicant supplies. The job and applicant are never read from
/// the request body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ApplicationPayload {
    #[validate(length(max = 255))]
    pub resume: Option<String>,
    #[validate(length(max = 10000))]
    pub cover_letter: Option<String>,
}

/// Only job seekers may apply. Checked before the request body is read.
pub fn ensure_can_apply(caller: &Caller) -> Result<(), RequestError> {
    if JobListingPolicy::new(*caller).can_apply() {
        return Ok(());
    }

    debug!(caller = %caller.id, role = %caller.role, "Non job seeker tried to apply");
    Err(RequestError::PermissionDenied(SEEKERS_ONLY))
}

/// Apply `caller` to `job_id`.
///
/// Runs in one transaction: role check, job lookup, active check, pre-flight
/// duplicate check and insert. The unique index on `(job_id, applicant_id)`
/// still decides races between concurrent submissions; its violation is
/// reported exactly like the pre-flight duplicate.
pub async fn submit(
    db: &DatabaseConnection,
    caller: &Caller,
    job_id: Uuid,
    payload: ApplicationPayload,
) -> Result<job_application::Model, RequestError> {
    ensure_can_apply(caller)?;

    let txn = db.begin().await?;

    let job = job_listing::Entity::find_by_id(job_id)
        .one(&txn)
        .await?
        .ok_or(RequestError::NotFound)?;

    if !job.is_active {
        return Err(RequestError::business_rule(JOB_INACTIVE));
    }

    let existing = job_application::Entity::find()
        .filter(job_application::Column::JobId.eq(job.id))
        .filter(job_application::Column::ApplicantId.eq(caller.id))
        .count(&txn)
        .await?;

    if existing > 0 {
        return Err(RequestError::business_rule(ALREADY_APPLIED));
    }

    let application = insert_application(&txn, job.id, caller.id, payload).await?;

    txn.commit().await?;

    info!(
        application_id = %application.id,
        job_id = %job.id,
        applicant_id = %caller.id,
        "Application submitted"
    );

    Ok(application)
}

/// Insert the application row, translating a duplicate into [`ALREADY_APPLIED`].
pub async fn insert_application<C>(
    db: &C,
    job_id: Uuid,
    applicant_id: Uuid,
    payload: ApplicationPayload,
) -> Result<job_application::Model, RequestError>
where
    C: ConnectionTrait,
{
    let application = job_application::ActiveModel {
        job_id: Set(job_id),
        applicant_id: Set(applicant_id),
        resume: Set(payload.resume),
        cover_letter: Set(payload.cover_letter),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(handle_unique_constraint_violation(
        ALREADY_APPLIED,
        JOB_APPLICANT_INDEX,
        &["job_id", "applicant_id"],
    ))?;

    Ok(application)
}
