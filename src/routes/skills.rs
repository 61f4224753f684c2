use axum::extract::{Path, Query, State};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DbErr, EntityTrait, ModelTrait,
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
    unique_constraint::{handle_unique_constraint_violation, UniqueConstraintError},
    validated_json::{JsonBody, ValidatedJson},
};
use crate::app::App;
use crate::auth::prelude::*;
use crate::database::models::skill::{self, SkillType, SKILL_NAME_INDEX};

pub const SKILL_EXISTS: &str = "A skill with this name already exists.";

#[derive(Debug, Default, Deserialize)]
pub struct SkillFilters {
    pub skill_type: Option<SkillType>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SkillRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub skill_type: SkillType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SkillPatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub skill_type: Option<SkillType>,
}

impl From<SkillRequest> for SkillPatch {
    fn from(request: SkillRequest) -> Self {
        Self {
            name: Some(request.name),
            description: request.description,
            skill_type: Some(request.skill_type),
        }
    }
}

fn ordering_column(key: &SortKey<'_>) -> Result<skill::Column, RequestError> {
    match key.field {
        "name" => Ok(skill::Column::Name),
        "created_at" => Ok(skill::Column::CreatedAt),
        _ => Err(key.unsupported()),
    }
}

fn duplicate_name() -> impl Fn(DbErr) -> UniqueConstraintError {
    handle_unique_constraint_violation(SKILL_EXISTS, SKILL_NAME_INDEX, &["name"])
}

async fn find_skill(
    app: &App,
    policy: &SkillPolicy,
    id: Uuid,
) -> Result<skill::Model, RequestError> {
    policy
        .readable(skill::Entity::find_by_id(id))
        .one(&app.db)
        .await?
        .ok_or(RequestError::NotFound)
}

pub async fn index(
    State(app): State<App>,
    current_user: CurrentUser,
    Query(filters): Query<SkillFilters>,
    Query(params): Query<PageParams>,
) -> RequestResult {
    current_user.authorize(Resource::Skill, Action::List)?;
    let policy = SkillPolicy::new(current_user.caller());

    let mut query = policy.readable(skill::Entity::find());

    if let Some(skill_type) = filters.skill_type {
        query = query.filter(skill::Column::SkillType.eq(skill_type));
    }
    if let Some(term) = SearchTerm::parse(filters.search.as_deref()) {
        query = query.filter(
            Condition::any()
                .add(term.matches(skill::Column::Name))
                .add(term.matches(skill::Column::Description)),
        );
    }

    let key = SortKey::parse(filters.ordering.as_deref().unwrap_or("name"));
    query = query
        .order_by(ordering_column(&key)?, key.order)
        .order_by_asc(skill::Column::Id);

    let page = paginate(&app.db, query, params, &app.config.pagination).await?;

    RequestSuccess::ok(page)
}

pub async fn show(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::Skill, Action::Retrieve)?;
    let policy = SkillPolicy::new(current_user.caller());

    let skill = find_skill(&app, &policy, id).await?;
    authorize!(policy, read, &skill);

    RequestSuccess::ok(skill)
}

pub async fn create(
    State(app): State<App>,
    current_user: CurrentUser,
    body: JsonBody<SkillRequest>,
) -> RequestResult {
    let policy = SkillPolicy::new(current_user.caller());
    authorize!(policy, create);
    let ValidatedJson(request) = body?;

    let skill = skill::ActiveModel {
        name: Set(request.name.trim().to_string()),
        description: Set(request.description),
        skill_type: Set(request.skill_type),
        ..Default::default()
    }
    .insert(&app.db)
    .await
    .map_err(duplicate_name())?;

    info!(skill_id = %skill.id, name = %skill.name, user_id = %current_user.id, "Skill created");

    RequestSuccess::created(skill)
}

pub async fn replace(
    state: State<App>,
    current_user: CurrentUser,
    id: Path<Uuid>,
    body: JsonBody<SkillRequest>,
) -> RequestResult {
    let patch = body.map(|ValidatedJson(request)| SkillPatch::from(request));
    apply_changes(state, current_user, id, patch).await
}

pub async fn update(
    state: State<App>,
    current_user: CurrentUser,
    id: Path<Uuid>,
    body: JsonBody<SkillPatch>,
) -> RequestResult {
    let patch = body.map(|ValidatedJson(patch)| patch);
    apply_changes(state, current_user, id, patch).await
}

async fn apply_changes(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    patch: Result<SkillPatch, JsonError>,
) -> RequestResult {
    current_user.authorize(Resource::Skill, Action::Update)?;
    let policy = SkillPolicy::new(current_user.caller());

    let skill = find_skill(&app, &policy, id).await?;
    authorize!(policy, update, &skill);
    let patch = patch?;

    let mut active: skill::ActiveModel = skill.into();
    if let Some(name) = patch.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = patch.description {
        active.description = Set(Some(description));
    }
    if let Some(skill_type) = patch.skill_type {
        active.skill_type = Set(skill_type);
    }

    let skill = active.update(&app.db).await.map_err(duplicate_name())?;

    RequestSuccess::ok(skill)
}

pub async fn destroy(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::Skill, Action::Destroy)?;
    let policy = SkillPolicy::new(current_user.caller());

    let skill = find_skill(&app, &policy, id).await?;
    authorize!(policy, delete, &skill);

    skill.delete(&app.db).await?;

    info!(skill_id = %id, user_id = %current_user.id, "Skill deleted");

    Ok(RequestSuccess::NoContent)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::database::models::{role::Role, skill::SkillType};
    use crate::tests::{fixtures, setup_test::setup_test};

    #[tokio::test]
    async fn test_anyone_signed_in_reads_the_catalogue() {
        let t = setup_test().await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;
        fixtures::skill(&t.db, "Rust", SkillType::Hard).await;
        fixtures::skill(&t.db, "Negotiation", SkillType::Soft).await;

        let response = t
            .server
            .get("/api/skills")
            .authorization_bearer(t.token_for(&seeker))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body = response.json::<Value>();
        assert_eq!(body["count"], 2);
        assert_eq!(body["results"][0]["name"], "Negotiation");

        let response = t
            .server
            .get("/api/skills")
            .add_query_param("skill_type", "HARD")
            .add_query_param("search", "rUsT")
            .authorization_bearer(t.token_for(&seeker))
            .await;
        let body = response.json::<Value>();
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["skill_type"], "HARD");

        let response = t.server.get("/api/skills").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_catalogue_writes_are_gated() {
        let t = setup_test().await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;
        let employer = fixtures::user(&t.db, Role::Employer, false).await;

        for body in [json!({ "name": "Go", "skill_type": "HARD" }), json!({})] {
            let response = t
                .server
                .post("/api/skills")
                .authorization_bearer(t.token_for(&seeker))
                .json(&body)
                .await;
            assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
        }

        let response = t
            .server
            .post("/api/skills")
            .authorization_bearer(t.token_for(&employer))
            .json(&json!({ "name": "Go", "skill_type": "HARD" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let path = format!(
            "/api/skills/{}",
            response.json::<Value>()["id"].as_str().unwrap_or_default()
        );

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&seeker))
            .json(&json!({ "name": "" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&employer))
            .json(&json!({ "description": "Systems language" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["name"], "Go");

        let response = t
            .server
            .delete(&path)
            .authorization_bearer(t.token_for(&employer))
            .await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_skill_names_are_unique() {
        let t = setup_test().await;
        let admin = fixtures::user(&t.db, Role::Admin, false).await;
        fixtures::skill(&t.db, "Rust", SkillType::Hard).await;

        let response = t
            .server
            .post("/api/skills")
            .authorization_bearer(t.token_for(&admin))
            .json(&json!({ "name": "Rust", "skill_type": "SOFT" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["detail"], super::SKILL_EXISTS);
    }
}
