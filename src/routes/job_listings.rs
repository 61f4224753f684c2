use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query, ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DbErr,
    EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Select, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::{
    json_error::JsonError,
    ordering::SortKey,
    pagination::{paginate, PageParams},
    search::SearchTerm,
    validated_json::{JsonBody, OptionalJsonBody, ValidatedJson},
};
use crate::app::App;
use crate::auth::prelude::*;
use crate::database::models::{
    company, job_listing, job_listing_skill,
    listing_enums::{ExperienceLevel, JobType},
    skill,
    user::{self, UserResponse},
};
use crate::routes::job_applications::render_application;
use crate::services::applications::{self, ApplicationPayload};

pub const UNKNOWN_COMPANY: &str = "Company does not exist.";
pub const UNKNOWN_SKILL: &str = "One or more skills do not exist.";
pub const SALARY_RANGE: &str = "Minimum salary cannot be greater than maximum salary.";
pub const SALARY_FORMAT: &str =
    "Salaries must be positive amounts with at most 8 digits before and 2 after the decimal point.";

/// Largest salary that fits `NUMERIC(10, 2)`, exclusive.
const SALARY_LIMIT: i64 = 100_000_000;

/// A listing row as loaded with its company.
pub type ListingRow = (job_listing::Model, Option<company::Model>);

/// A listing with its company, poster and skills embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    #[serde(flatten)]
    pub listing: job_listing::Model,
    pub company_details: Option<company::Model>,
    pub posted_by_details: Option<UserResponse>,
    pub skills: Vec<Uuid>,
    pub skill_details: Vec<skill::Model>,
}

/// Posters and skills for a batch of listings, one query each.
#[derive(Debug, Default)]
pub struct ListingDetails {
    posters: HashMap<Uuid, UserResponse>,
    skills: HashMap<Uuid, Vec<skill::Model>>,
}

impl ListingDetails {
    pub async fn load<C: ConnectionTrait>(db: &C, rows: &[ListingRow]) -> Result<Self, DbErr> {
        let poster_ids: Vec<Uuid> = rows.iter().map(|(listing, _)| listing.posted_by).collect();
        let listing_ids: Vec<Uuid> = rows.iter().map(|(listing, _)| listing.id).collect();

        let posters = user::Entity::find()
            .filter(user::Column::Id.is_in(poster_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|poster| (poster.id, UserResponse::from(poster)))
            .collect();

        let links = job_listing_skill::Entity::find()
            .filter(job_listing_skill::Column::JobListingId.is_in(listing_ids))
            .find_also_related(skill::Entity)
            .order_by_asc(skill::Column::Name)
            .all(db)
            .await?;

        let mut skills: HashMap<Uuid, Vec<skill::Model>> = HashMap::new();
        for (link, skill) in links {
            if let Some(skill) = skill {
                skills.entry(link.job_listing_id).or_default().push(skill);
            }
        }

        Ok(Self { posters, skills })
    }

    pub fn render(&self, (listing, company_details): ListingRow) -> ListingResponse {
        let skill_details = self.skills.get(&listing.id).cloned().unwrap_or_default();

        ListingResponse {
            posted_by_details: self.posters.get(&listing.posted_by).cloned(),
            skills: skill_details.iter().map(|skill| skill.id).collect(),
            skill_details,
            company_details,
            listing,
        }
    }
}

pub async fn render_listings<C: ConnectionTrait>(
    db: &C,
    rows: Vec<ListingRow>,
) -> Result<Vec<ListingResponse>, DbErr> {
    let details = ListingDetails::load(db, &rows).await?;
    Ok(rows.into_iter().map(|row| details.render(row)).collect())
}

async fn render_listing<C: ConnectionTrait>(
    db: &C,
    row: ListingRow,
) -> Result<ListingResponse, DbErr> {
    let details = ListingDetails::load(db, std::slice::from_ref(&row)).await?;
    Ok(details.render(row))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingFilters {
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub remote: Option<bool>,
    pub company: Option<Uuid>,
    pub skill: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ListingFilters {
    fn apply(&self, mut query: Select<job_listing::Entity>) -> Select<job_listing::Entity> {
        if let Some(job_type) = self.job_type {
            query = query.filter(job_listing::Column::JobType.eq(job_type));
        }
        if let Some(level) = self.experience_level {
            query = query.filter(job_listing::Column::ExperienceLevel.eq(level));
        }
        if let Some(remote) = self.remote {
            query = query.filter(job_listing::Column::Remote.eq(remote));
        }
        if let Some(company_id) = self.company {
            query = query.filter(job_listing::Column::CompanyId.eq(company_id));
        }
        if let Some(skill_id) = self.skill {
            let tagged = sea_query::Query::select()
                .column(job_listing_skill::Column::JobListingId)
                .from(job_listing_skill::Entity)
                .and_where(job_listing_skill::Column::SkillId.eq(skill_id))
                .to_owned();
            query = query.filter(job_listing::Column::Id.in_subquery(tagged));
        }
        query
    }
}

fn validate_salary_range(
    min: Option<Decimal>,
    max: Option<Decimal>,
) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            Err(ValidationError::new("salary_range").with_message(SALARY_RANGE.into()))
        }
        _ => Ok(()),
    }
}

fn validate_salaries(min: Option<Decimal>, max: Option<Decimal>) -> Result<(), ValidationError> {
    let fits = |amount: &Decimal| {
        !amount.is_sign_negative()
            && amount.scale() <= 2
            && amount.trunc() < Decimal::from(SALARY_LIMIT)
    };

    if ![min, max].iter().flatten().all(fits) {
        return Err(ValidationError::new("salary").with_message(SALARY_FORMAT.into()));
    }

    validate_salary_range(min, max)
}

fn validate_request_salary(request: &ListingRequest) -> Result<(), ValidationError> {
    validate_salaries(request.salary_min, request.salary_max)
}

fn validate_patch_salary(patch: &ListingPatch) -> Result<(), ValidationError> {
    validate_salaries(patch.salary_min, patch.salary_max)
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_request_salary"))]
pub struct ListingRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub company: Uuid,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub requirements: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[validate(length(min = 1, max = 100))]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    #[validate(url)]
    pub application_url: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub skills: Vec<Uuid>,
}

const fn active_by_default() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_patch_salary"))]
pub struct ListingPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub company: Option<Uuid>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub requirements: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    #[validate(length(min = 1, max = 100))]
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub salary_min: Option<Decimal>,
    pub salary_max: Option<Decimal>,
    #[validate(url)]
    pub application_url: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub skills: Option<Vec<Uuid>>,
}

impl From<ListingRequest> for ListingPatch {
    fn from(request: ListingRequest) -> Self {
        Self {
            title: Some(request.title),
            company: Some(request.company),
            description: Some(request.description),
            requirements: Some(request.requirements),
            job_type: Some(request.job_type),
            experience_level: Some(request.experience_level),
            location: Some(request.location),
            remote: Some(request.remote),
            salary_min: request.salary_min,
            salary_max: request.salary_max,
            application_url: request.application_url,
            deadline: request.deadline,
            is_active: Some(request.is_active),
            skills: Some(request.skills),
        }
    }
}

fn ordering_column(key: &SortKey<'_>) -> Result<job_listing::Column, RequestError> {
    match key.field {
        "created_at" => Ok(job_listing::Column::CreatedAt),
        "deadline" => Ok(job_listing::Column::Deadline),
        _ => Err(key.unsupported()),
    }
}

async fn existing_company<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<company::Model, RequestError> {
    company::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| RequestError::business_rule(UNKNOWN_COMPANY))
}

/// Replace the skills a listing asks for.
async fn set_skills<C: ConnectionTrait>(
    db: &C,
    listing_id: Uuid,
    skill_ids: &[Uuid],
) -> Result<(), RequestError> {
    let mut ids = skill_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let found = skill::Entity::find()
        .filter(skill::Column::Id.is_in(ids.clone()))
        .count(db)
        .await?;
    if found != ids.len() as u64 {
        return Err(RequestError::business_rule(UNKNOWN_SKILL));
    }

    job_listing_skill::Entity::delete_many()
        .filter(job_listing_skill::Column::JobListingId.eq(listing_id))
        .exec(db)
        .await?;

    if !ids.is_empty() {
        job_listing_skill::Entity::insert_many(ids.into_iter().map(|skill_id| {
            job_listing_skill::ActiveModel {
                job_listing_id: Set(listing_id),
                skill_id: Set(skill_id),
            }
        }))
        .exec_without_returning(db)
        .await?;
    }

    Ok(())
}

async fn find_listing(
    app: &App,
    policy: &JobListingPolicy,
    id: Uuid,
) -> Result<job_listing::Model, RequestError> {
    policy
        .readable(job_listing::Entity::find_by_id(id))
        .one(&app.db)
        .await?
        .ok_or(RequestError::NotFound)
}

pub async fn index(
    State(app): State<App>,
    current_user: CurrentUser,
    Query(filters): Query<ListingFilters>,
    Query(params): Query<PageParams>,
) -> RequestResult {
    current_user.authorize(Resource::JobListing, Action::List)?;
    let policy = JobListingPolicy::new(current_user.caller());

    let mut query = filters
        .apply(policy.readable(job_listing::Entity::find()))
        .find_also_related(company::Entity);

    if let Some(term) = SearchTerm::parse(filters.search.as_deref()) {
        query = query.filter(
            Condition::any()
                .add(term.matches(job_listing::Column::Title))
                .add(term.matches(job_listing::Column::Description))
                .add(term.matches(job_listing::Column::Location))
                .add(term.matches(company::Column::Name)),
        );
    }

    let key = SortKey::parse(filters.ordering.as_deref().unwrap_or("-created_at"));
    let query = query
        .order_by(ordering_column(&key)?, key.order)
        .order_by_asc(job_listing::Column::Id);

    let (page, rows) = paginate(&app.db, query, params, &app.config.pagination)
        .await?
        .take_results();

    RequestSuccess::ok(page.with_results(render_listings(&app.db, rows).await?))
}

pub async fn my_listings(
    State(app): State<App>,
    current_user: CurrentUser,
    Query(params): Query<PageParams>,
) -> RequestResult {
    let policy = JobListingPolicy::new(current_user.caller());
    if !policy.can_list_own() {
        return Err(RequestError::forbidden());
    }

    let query = policy
        .own(job_listing::Entity::find())
        .find_also_related(company::Entity)
        .order_by_desc(job_listing::Column::CreatedAt)
        .order_by_asc(job_listing::Column::Id);

    let (page, rows) = paginate(&app.db, query, params, &app.config.pagination)
        .await?
        .take_results();

    RequestSuccess::ok(page.with_results(render_listings(&app.db, rows).await?))
}

pub async fn show(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::JobListing, Action::Retrieve)?;
    let policy = JobListingPolicy::new(current_user.caller());

    let (listing, company) = policy
        .readable(job_listing::Entity::find_by_id(id))
        .find_also_related(company::Entity)
        .one(&app.db)
        .await?
        .ok_or(RequestError::NotFound)?;
    authorize!(policy, read, &listing);

    RequestSuccess::ok(render_listing(&app.db, (listing, company)).await?)
}

pub async fn create(
    State(app): State<App>,
    current_user: CurrentUser,
    body: JsonBody<ListingRequest>,
) -> RequestResult {
    let policy = JobListingPolicy::new(current_user.caller());
    authorize!(policy, create);
    let ValidatedJson(request) = body?;

    let company = existing_company(&app.db, request.company).await?;

    let txn = app.db.begin().await?;

    let listing = job_listing::ActiveModel {
        title: Set(request.title),
        company_id: Set(company.id),
        posted_by: Set(current_user.id),
        description: Set(request.description),
        requirements: Set(request.requirements),
        job_type: Set(request.job_type),
        experience_level: Set(request.experience_level),
        location: Set(request.location),
        remote: Set(request.remote),
        salary_min: Set(request.salary_min),
        salary_max: Set(request.salary_max),
        application_url: Set(request.application_url),
        deadline: Set(request.deadline),
        is_active: Set(request.is_active),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    set_skills(&txn, listing.id, &request.skills).await?;
    let response = render_listing(&txn, (listing, Some(company))).await?;

    txn.commit().await?;

    info!(listing_id = %response.listing.id, user_id = %current_user.id, "Job listing created");

    RequestSuccess::created(response)
}

pub async fn replace(
    state: State<App>,
    current_user: CurrentUser,
    id: Path<Uuid>,
    body: JsonBody<ListingRequest>,
) -> RequestResult {
    let patch = body.map(|ValidatedJson(request)| ListingPatch::from(request));
    apply_changes(state, current_user, id, patch).await
}

pub async fn update(
    state: State<App>,
    current_user: CurrentUser,
    id: Path<Uuid>,
    body: JsonBody<ListingPatch>,
) -> RequestResult {
    let patch = body.map(|ValidatedJson(patch)| patch);
    apply_changes(state, current_user, id, patch).await
}

async fn apply_changes(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    patch: Result<ListingPatch, JsonError>,
) -> RequestResult {
    current_user.authorize(Resource::JobListing, Action::Update)?;
    let policy = JobListingPolicy::new(current_user.caller());

    let listing = find_listing(&app, &policy, id).await?;
    authorize!(policy, update, &listing);
    let patch = patch?;

    // The range is checked against the merged row, not only the request.
    validate_salary_range(
        patch.salary_min.or(listing.salary_min),
        patch.salary_max.or(listing.salary_max),
    )
    .map_err(|_| RequestError::business_rule(SALARY_RANGE))?;

    let company = match patch.company {
        Some(company_id) => existing_company(&app.db, company_id).await?,
        None => existing_company(&app.db, listing.company_id).await?,
    };

    let mut active: job_listing::ActiveModel = listing.into();
    active.company_id = Set(company.id);
    if let Some(title) = patch.title {
        active.title = Set(title);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(requirements) = patch.requirements {
        active.requirements = Set(requirements);
    }
    if let Some(job_type) = patch.job_type {
        active.job_type = Set(job_type);
    }
    if let Some(level) = patch.experience_level {
        active.experience_level = Set(level);
    }
    if let Some(location) = patch.location {
        active.location = Set(location);
    }
    if let Some(remote) = patch.remote {
        active.remote = Set(remote);
    }
    if let Some(salary_min) = patch.salary_min {
        active.salary_min = Set(Some(salary_min));
    }
    if let Some(salary_max) = patch.salary_max {
        active.salary_max = Set(Some(salary_max));
    }
    if let Some(url) = patch.application_url {
        active.application_url = Set(Some(url));
    }
    if let Some(deadline) = patch.deadline {
        active.deadline = Set(Some(deadline));
    }
    if let Some(is_active) = patch.is_active {
        active.is_active = Set(is_active);
    }

    let txn = app.db.begin().await?;

    let listing = active.update(&txn).await?;
    if let Some(skill_ids) = &patch.skills {
        set_skills(&txn, listing.id, skill_ids).await?;
    }
    let response = render_listing(&txn, (listing, Some(company))).await?;

    txn.commit().await?;

    RequestSuccess::ok(response)
}

pub async fn destroy(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::JobListing, Action::Destroy)?;
    let policy = JobListingPolicy::new(current_user.caller());

    let listing = find_listing(&app, &policy, id).await?;
    authorize!(policy, delete, &listing);

    listing.delete(&app.db).await?;

    info!(listing_id = %id, user_id = %current_user.id, "Job listing deleted");

    Ok(RequestSuccess::NoContent)
}

/// The body is optional; a job seeker may apply with nothing but the URL.
pub async fn apply(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    body: OptionalJsonBody<ApplicationPayload>,
) -> RequestResult {
    let caller = current_user.caller();
    applications::ensure_can_apply(&caller)?;
    let payload = body?
        .map(|ValidatedJson(payload)| payload)
        .unwrap_or_default();

    let application = applications::submit(&app.db, &caller, id, payload).await?;

    RequestSuccess::created(render_application(&app.db, application).await?)
}
