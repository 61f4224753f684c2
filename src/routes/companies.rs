use axum::extract::{Path, Query, State};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::{
    json_error::JsonError,
    ordering::SortKey,
    pagination::{paginate, PageParams},
    search::SearchTerm,
    validated_json::{JsonBody, ValidatedJson},
};
use crate::app::App;
use crate::auth::prelude::*;
use crate::database::models::company;

#[derive(Debug, Default, Deserialize)]
pub struct CompanyFilters {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompanyPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
}

impl From<CompanyRequest> for CompanyPatch {
    fn from(request: CompanyRequest) -> Self {
        Self {
            name: Some(request.name),
            description: request.description,
            website: request.website,
            location: request.location,
        }
    }
}

fn ordering_column(key: &SortKey<'_>) -> Result<company::Column, RequestError> {
    match key.field {
        "name" => Ok(company::Column::Name),
        "created_at" => Ok(company::Column::CreatedAt),
        _ => Err(key.unsupported()),
    }
}

async fn find_company(
    app: &App,
    policy: &CompanyPolicy,
    id: Uuid,
) -> Result<company::Model, RequestError> {
    policy
        .readable(company::Entity::find_by_id(id))
        .one(&app.db)
        .await?
        .ok_or(RequestError::NotFound)
}

pub async fn index(
    State(app): State<App>,
    current_user: CurrentUser,
    Query(filters): Query<CompanyFilters>,
    Query(params): Query<PageParams>,
) -> RequestResult {
    current_user.authorize(Resource::Company, Action::List)?;
    let policy = CompanyPolicy::new(current_user.caller());

    let mut query = policy.readable(company::Entity::find());

    if let Some(term) = SearchTerm::parse(filters.search.as_deref()) {
        query = query.filter(
            Condition::any()
                .add(term.matches(company::Column::Name))
                .add(term.matches(company::Column::Location)),
        );
    }

    let key = SortKey::parse(filters.ordering.as_deref().unwrap_or("name"));
    query = query
        .order_by(ordering_column(&key)?, key.order)
        .order_by_asc(company::Column::Id);

    let page = paginate(&app.db, query, params, &app.config.pagination).await?;

    RequestSuccess::ok(page)
}

pub async fn show(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::Company, Action::Retrieve)?;
    let policy = CompanyPolicy::new(current_user.caller());

    let company = find_company(&app, &policy, id).await?;
    authorize!(policy, read, &company);

    RequestSuccess::ok(company)
}

pub async fn create(
    State(app): State<App>,
    current_user: CurrentUser,
    body: JsonBody<CompanyRequest>,
) -> RequestResult {
    let policy = CompanyPolicy::new(current_user.caller());
    authorize!(policy, create);
    let ValidatedJson(request) = body?;

    let company = company::ActiveModel {
        name: Set(request.name),
        description: Set(request.description),
        website: Set(request.website),
        location: Set(request.location),
        ..Default::default()
    }
    .insert(&app.db)
    .await?;

    info!(company_id = %company.id, user_id = %current_user.id, "Company created");

    RequestSuccess::created(company)
}

pub async fn replace(
    state: State<App>,
    current_user: CurrentUser,
    id: Path<Uuid>,
    body: JsonBody<CompanyRequest>,
) -> RequestResult {
    let patch = body.map(|ValidatedJson(request)| CompanyPatch::from(request));
    apply_changes(state, current_user, id, patch).await
}

pub async fn update(
    state: State<App>,
    current_user: CurrentUser,
    id: Path<Uuid>,
    body: JsonBody<CompanyPatch>,
) -> RequestResult {
    let patch = body.map(|ValidatedJson(patch)| patch);
    apply_changes(state, current_user, id, patch).await
}

async fn apply_changes(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    patch: Result<CompanyPatch, JsonError>,
) -> RequestResult {
    let policy = CompanyPolicy::new(current_user.caller());
    current_user.authorize(Resource::Company, Action::Update)?;

    let company = find_company(&app, &policy, id).await?;
    authorize!(policy, update, &company);
    let patch = patch?;

    let mut active: company::ActiveModel = company.into();
    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(description) = patch.description {
        active.description = Set(Some(description));
    }
    if let Some(website) = patch.website {
        active.website = Set(Some(website));
    }
    if let Some(location) = patch.location {
        active.location = Set(Some(location));
    }

    let company = active.update(&app.db).await?;

    RequestSuccess::ok(company)
}

pub async fn destroy(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    let policy = CompanyPolicy::new(current_user.caller());
    current_user.authorize(Resource::Company, Action::Destroy)?;

    let company = find_company(&app, &policy, id).await?;
    authorize!(policy, delete, &company);

    company.delete(&app.db).await?;

    info!(company_id = %id, user_id = %current_user.id, "Company deleted");

    Ok(RequestSuccess::NoContent)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::database::models::role::Role;
    use crate::tests::{fixtures, setup_test::setup_test};

    #[tokio::test]
    async fn test_job_seekers_cannot_create_companies() {
        let t = setup_test().await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;

        let response = t
            .server
            .post("/api/companies")
            .authorization_bearer(t.token_for(&seeker))
            .json(&json!({ "name": "Initech" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        let body = response.json::<Value>();
        assert_eq!(
            body["detail"],
            "You do not have permission to perform this action."
        );

        // Missing required fields are not reported to a caller who may not create.
        let response = t
            .server
            .post("/api/companies")
            .authorization_bearer(t.token_for(&seeker))
            .json(&json!({}))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_employers_admins_and_staff_create_companies() {
        let t = setup_test().await;
        let employer = fixtures::user(&t.db, Role::Employer, false).await;
        let admin = fixtures::user(&t.db, Role::Admin, false).await;
        let staff = fixtures::user(&t.db, Role::JobSeeker, true).await;

        for (user, name) in [(employer, "Acme"), (admin, "Globex"), (staff, "Umbrella")] {
            let response = t
                .server
                .post("/api/companies")
                .authorization_bearer(t.token_for(&user))
                .json(&json!({ "name": name, "location": "Berlin" }))
                .await;

            assert_eq!(response.status_code(), StatusCode::CREATED);
            assert_eq!(response.json::<Value>()["name"], name);
        }
    }

    #[tokio::test]
    async fn test_listing_companies_requires_a_token() {
        let t = setup_test().await;

        let response = t.server.get("/api/companies").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_search_and_paginate_companies() {
        let t = setup_test().await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;
        fixtures::company(&t.db, "Acme Rockets").await;
        fixtures::company(&t.db, "Acme Anvils").await;
        fixtures::company(&t.db, "Globex").await;

        let response = t
            .server
            .get("/api/companies")
            .add_query_param("search", "Acme")
            .add_query_param("page_size", 1)
            .authorization_bearer(t.token_for(&seeker))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["count"], 2);
        assert_eq!(body["num_pages"], 2);
        assert_eq!(body["results"][0]["name"], "Acme Anvils");

        let response = t
            .server
            .get("/api/companies")
            .add_query_param("search", "acme")
            .authorization_bearer(t.token_for(&seeker))
            .await;
        assert_eq!(response.json::<Value>()["count"], 2);

        let response = t
            .server
            .get("/api/companies")
            .add_query_param("search", "%")
            .authorization_bearer(t.token_for(&seeker))
            .await;
        assert_eq!(response.json::<Value>()["count"], 0);
    }

    #[tokio::test]
    async fn test_patch_and_delete_company() {
        let t = setup_test().await;
        let employer = fixtures::user(&t.db, Role::Employer, false).await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;
        let company = fixtures::company(&t.db, "Acme").await;
        let path = format!("/api/companies/{}", company.id);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&seeker))
            .json(&json!({ "name": "Hijacked" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&seeker))
            .json(&json!({ "website": "not a url" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&employer))
            .json(&json!({ "location": "Lisbon" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["name"], "Acme");
        assert_eq!(body["location"], "Lisbon");

        let response = t
            .server
            .delete(&path)
            .authorization_bearer(t.token_for(&employer))
            .await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        let response = t
            .server
            .get(&path)
            .authorization_bearer(t.token_for(&employer))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}
