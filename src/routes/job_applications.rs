use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Select,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::{
    pagination::{paginate, PageParams},
    validated_json::{JsonBody, ValidatedJson},
};
use crate::app::App;
use crate::auth::prelude::*;
use crate::database::models::{
    application_status::ApplicationStatus,
    company,
    job_application::{self, ApplicationOnJob},
    job_listing,
    user::{self, UserResponse},
};
use crate::routes::job_listings::{render_listings, ListingResponse};
use crate::services::applications::{self, ApplicationPayload};

pub const SEEKERS_LIST_ONLY: &str = "Only job seekers can view their applications.";

/// Wire representation of an application, with its job and applicant embedded.
#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub job: Uuid,
    pub job_details: Option<ListingResponse>,
    pub applicant: Uuid,
    pub applicant_details: Option<UserResponse>,
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Jobs and applicants for a batch of applications.
#[derive(Debug, Default)]
pub struct ApplicationDetails {
    jobs: HashMap<Uuid, ListingResponse>,
    applicants: HashMap<Uuid, UserResponse>,
}

impl ApplicationDetails {
    pub async fn load<C: ConnectionTrait>(
        db: &C,
        applications: &[job_application::Model],
    ) -> Result<Self, DbErr> {
        let job_ids: Vec<Uuid> = applications.iter().map(|a| a.job_id).collect();
        let applicant_ids: Vec<Uuid> = applications.iter().map(|a| a.applicant_id).collect();

        let rows = job_listing::Entity::find()
            .filter(job_listing::Column::Id.is_in(job_ids))
            .find_also_related(company::Entity)
            .all(db)
            .await?;
        let jobs = render_listings(db, rows)
            .await?
            .into_iter()
            .map(|listing| (listing.listing.id, listing))
            .collect();

        let applicants = user::Entity::find()
            .filter(user::Column::Id.is_in(applicant_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|applicant| (applicant.id, UserResponse::from(applicant)))
            .collect();

        Ok(Self { jobs, applicants })
    }

    pub fn render(&self, application: job_application::Model) -> ApplicationResponse {
        ApplicationResponse {
            id: application.id,
            job: application.job_id,
            job_details: self.jobs.get(&application.job_id).cloned(),
            applicant: application.applicant_id,
            applicant_details: self.applicants.get(&application.applicant_id).cloned(),
            resume: application.resume,
            cover_letter: application.cover_letter,
            status: application.status,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

async fn render_applications<C: ConnectionTrait>(
    db: &C,
    applications: Vec<job_application::Model>,
) -> Result<Vec<ApplicationResponse>, DbErr> {
    let details = ApplicationDetails::load(db, &applications).await?;
    Ok(applications.into_iter().map(|a| details.render(a)).collect())
}

pub async fn render_application<C: ConnectionTrait>(
    db: &C,
    application: job_application::Model,
) -> Result<ApplicationResponse, DbErr> {
    let details = ApplicationDetails::load(db, std::slice::from_ref(&application)).await?;
    Ok(details.render(application))
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationFilters {
    pub status: Option<ApplicationStatus>,
    pub job: Option<Uuid>,
}

impl ApplicationFilters {
    fn apply(
        &self,
        mut query: Select<job_application::Entity>,
    ) -> Select<job_application::Entity> {
        if let Some(status) = self.status {
            query = query.filter(job_application::Column::Status.eq(status));
        }
        if let Some(job_id) = self.job {
            query = query.filter(job_application::Column::JobId.eq(job_id));
        }
        query
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    pub job: Uuid,
    #[validate(length(max = 255))]
    pub resume: Option<String>,
    #[validate(length(max = 10000))]
    pub cover_letter: Option<String>,
}

/// Body of both PUT and PATCH. The job and applicant can never be changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ApplicationPatch {
    #[validate(length(max = 255))]
    pub resume: Option<String>,
    #[validate(length(max = 10000))]
    pub cover_letter: Option<String>,
    pub status: Option<ApplicationStatus>,
}

fn newest_first(query: Select<job_application::Entity>) -> Select<job_application::Entity> {
    query
        .order_by_desc(job_application::Column::CreatedAt)
        .order_by_asc(job_application::Column::Id)
}

async fn find_application(
    app: &App,
    policy: &JobApplicationPolicy,
    id: Uuid,
) -> Result<ApplicationOnJob, RequestError> {
    let (application, job) = policy
        .readable(job_application::Entity::find_by_id(id))
        .find_also_related(job_listing::Entity)
        .one(&app.db)
        .await?
        .ok_or(RequestError::NotFound)?;

    let job = job.ok_or(RequestError::NotFound)?;

    Ok(ApplicationOnJob { application, job })
}

pub async fn index(
    State(app): State<App>,
    current_user: CurrentUser,
    Query(filters): Query<ApplicationFilters>,
    Query(params): Query<PageParams>,
) -> RequestResult {
    current_user.authorize(Resource::JobApplication, Action::List)?;
    let policy = JobApplicationPolicy::new(current_user.caller());

    let query = newest_first(filters.apply(policy.readable(job_application::Entity::find())));
    let (page, rows) = paginate(&app.db, query, params, &app.config.pagination)
        .await?
        .take_results();

    RequestSuccess::ok(page.with_results(render_applications(&app.db, rows).await?))
}

pub async fn my_applications(
    State(app): State<App>,
    current_user: CurrentUser,
    Query(params): Query<PageParams>,
) -> RequestResult {
    let policy = JobApplicationPolicy::new(current_user.caller());
    if !policy.can_list_own() {
        return Err(RequestError::PermissionDenied(SEEKERS_LIST_ONLY));
    }

    let query = newest_first(policy.own(job_application::Entity::find()));
    let (page, rows) = paginate(&app.db, query, params, &app.config.pagination)
        .await?
        .take_results();

    RequestSuccess::ok(page.with_results(render_applications(&app.db, rows).await?))
}

pub async fn show(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::JobApplication, Action::Retrieve)?;
    let policy = JobApplicationPolicy::new(current_user.caller());

    let subject = find_application(&app, &policy, id).await?;
    authorize!(policy, read, &subject);

    RequestSuccess::ok(render_application(&app.db, subject.application).await?)
}

pub async fn create(
    State(app): State<App>,
    current_user: CurrentUser,
    body: JsonBody<CreateApplicationRequest>,
) -> RequestResult {
    let policy = JobApplicationPolicy::new(current_user.caller());
    authorize!(policy, create);
    let ValidatedJson(request) = body?;

    let payload = ApplicationPayload {
        resume: request.resume,
        cover_letter: request.cover_letter,
    };
    let application =
        applications::submit(&app.db, &current_user.caller(), request.job, payload).await?;

    RequestSuccess::created(render_application(&app.db, application).await?)
}

/// Content edits need owner-or-admin, status changes need poster-or-admin.
/// A request carrying both must pass both.
pub async fn update(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    body: JsonBody<ApplicationPatch>,
) -> RequestResult {
    current_user.authorize(Resource::JobApplication, Action::Update)?;
    let policy = JobApplicationPolicy::new(current_user.caller());

    let subject = find_application(&app, &policy, id).await?;
    if !policy.can_update(&subject) && !policy.can_change_status(&subject) {
        return Err(RequestError::forbidden());
    }
    let ValidatedJson(patch) = body?;

    let current = subject.application.status;

    let edits_content = patch.resume.is_some() || patch.cover_letter.is_some();
    let changes_status = patch.status.is_some_and(|status| status != current);

    if edits_content || !changes_status {
        authorize!(policy, update, &subject);
    }
    if changes_status && !policy.can_change_status(&subject) {
        return Err(RequestError::forbidden());
    }

    let mut active: job_application::ActiveModel = subject.application.into();
    if let Some(resume) = patch.resume {
        active.resume = Set(Some(resume));
    }
    if let Some(cover_letter) = patch.cover_letter {
        active.cover_letter = Set(Some(cover_letter));
    }
    if let Some(status) = patch.status.filter(|_| changes_status) {
        active.status = Set(current.transition_to(status)?);
    }

    let application = active.update(&app.db).await?;

    if changes_status {
        info!(
            application_id = %application.id,
            from = %current,
            to = %application.status,
            user_id = %current_user.id,
            "Application status changed"
        );
    }

    RequestSuccess::ok(render_application(&app.db, application).await?)
}

pub async fn destroy(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::JobApplication, Action::Destroy)?;
    let policy = JobApplicationPolicy::new(current_user.caller());

    let subject = find_application(&app, &policy, id).await?;
    authorize!(policy, delete, &subject);

    subject.application.delete(&app.db).await?;

    info!(application_id = %id, user_id = %current_user.id, "Application withdrawn");

    Ok(RequestSuccess::NoContent)
}
