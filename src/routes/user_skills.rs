//! Skills on the caller's own profile.

use axum::extract::{Path, Query, State};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DbErr, EntityTrait, ModelTrait, QueryOrder};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::{
    pagination::{paginate, PageParams},
    unique_constraint::{handle_unique_constraint_violation, UniqueConstraintError},
    validated_json::{JsonBody, ValidatedJson},
};
use crate::app::App;
use crate::auth::prelude::*;
use crate::database::models::{
    skill::{self, SkillType},
    user_skill::{self, UserSkillResponse, USER_CUSTOM_SKILL_INDEX, USER_SKILL_INDEX},
};
use crate::routes::job_listings::UNKNOWN_SKILL;

pub const SKILL_OR_CUSTOM_NAME: &str = "Provide either a skill or a custom name, not both.";
pub const ALREADY_ON_PROFILE: &str = "This skill is already on your profile.";

fn validate_skill_or_custom_name(request: &UserSkillRequest) -> Result<(), ValidationError> {
    if request.skill.is_some() == request.custom_name.is_some() {
        return Err(ValidationError::new("skill").with_message(SKILL_OR_CUSTOM_NAME.into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_skill_or_custom_name"))]
pub struct UserSkillRequest {
    pub skill: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub custom_name: Option<String>,
    pub custom_type: Option<SkillType>,
    #[validate(range(min = 1, max = 5))]
    pub proficiency: Option<i16>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserSkillPatch {
    #[validate(range(min = 1, max = 5))]
    pub proficiency: Option<i16>,
    pub verified: Option<bool>,
}

fn duplicate_entry(
    index_name: &'static str,
    columns: &'static [&'static str],
) -> impl Fn(DbErr) -> UniqueConstraintError {
    handle_unique_constraint_violation(ALREADY_ON_PROFILE, index_name, columns)
}

async fn find_entry(
    app: &App,
    policy: &UserSkillPolicy,
    id: Uuid,
) -> Result<user_skill::Model, RequestError> {
    policy
        .readable(user_skill::Entity::find_by_id(id))
        .one(&app.db)
        .await?
        .ok_or(RequestError::NotFound)
}

async fn render(
    app: &App,
    entry: user_skill::Model,
) -> Result<UserSkillResponse, RequestError> {
    let skill = match entry.skill_id {
        Some(skill_id) => skill::Entity::find_by_id(skill_id).one(&app.db).await?,
        None => None,
    };
    Ok(UserSkillResponse::from((entry, skill)))
}

pub async fn index(
    State(app): State<App>,
    current_user: CurrentUser,
    Query(params): Query<PageParams>,
) -> RequestResult {
    current_user.authorize(Resource::UserSkill, Action::List)?;
    let policy = UserSkillPolicy::new(current_user.caller());

    let query = policy
        .readable(user_skill::Entity::find())
        .find_also_related(skill::Entity)
        .order_by_desc(user_skill::Column::Proficiency)
        .order_by_asc(user_skill::Column::Id);

    let page = paginate(&app.db, query, params, &app.config.pagination).await?;
    let (page, rows) = page.take_results();

    RequestSuccess::ok(page.with_results(
        rows.into_iter().map(UserSkillResponse::from).collect(),
    ))
}

pub async fn show(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::UserSkill, Action::Retrieve)?;
    let policy = UserSkillPolicy::new(current_user.caller());

    let entry = find_entry(&app, &policy, id).await?;
    authorize!(policy, read, &entry);

    RequestSuccess::ok(render(&app, entry).await?)
}

/// Entries are always added to the caller's own profile, as manual and
/// unverified.
pub async fn create(
    State(app): State<App>,
    current_user: CurrentUser,
    body: JsonBody<UserSkillRequest>,
) -> RequestResult {
    let policy = UserSkillPolicy::new(current_user.caller());
    authorize!(policy, create);
    let ValidatedJson(request) = body?;

    if let Some(skill_id) = request.skill {
        skill::Entity::find_by_id(skill_id)
            .one(&app.db)
            .await?
            .ok_or_else(|| RequestError::business_rule(UNKNOWN_SKILL))?;
    }

    let mut entry = user_skill::ActiveModel {
        user_id: Set(current_user.id),
        skill_id: Set(request.skill),
        ..Default::default()
    };
    if let Some(proficiency) = request.proficiency {
        entry.proficiency = Set(proficiency);
    }

    let entry = match request.custom_name {
        Some(name) => {
            entry.custom_name = Set(Some(name.trim().to_string()));
            entry.custom_type = Set(request.custom_type);
            entry
                .insert(&app.db)
                .await
                .map_err(duplicate_entry(USER_CUSTOM_SKILL_INDEX, &["user_id", "custom_name"]))?
        }
        None => entry
            .insert(&app.db)
            .await
            .map_err(duplicate_entry(USER_SKILL_INDEX, &["user_id", "skill_id"]))?,
    };

    info!(user_skill_id = %entry.id, user_id = %current_user.id, "Profile skill added");

    RequestSuccess::created(render(&app, entry).await?)
}

/// Owners change the proficiency; only admins mark an entry verified.
pub async fn update(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    body: JsonBody<UserSkillPatch>,
) -> RequestResult {
    current_user.authorize(Resource::UserSkill, Action::Update)?;
    let policy = UserSkillPolicy::new(current_user.caller());

    let entry = find_entry(&app, &policy, id).await?;
    authorize!(policy, update, &entry);
    let ValidatedJson(patch) = body?;

    let mut active: user_skill::ActiveModel = entry.into();
    if let Some(proficiency) = patch.proficiency {
        active.proficiency = Set(proficiency);
    }
    if let Some(verified) = patch.verified {
        if !policy.can_verify() {
            return Err(RequestError::forbidden());
        }
        active.verified = Set(verified);
    }

    let entry = active.update(&app.db).await?;

    RequestSuccess::ok(render(&app, entry).await?)
}

pub async fn destroy(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> RequestResult {
    current_user.authorize(Resource::UserSkill, Action::Destroy)?;
    let policy = UserSkillPolicy::new(current_user.caller());

    let entry = find_entry(&app, &policy, id).await?;
    authorize!(policy, delete, &entry);

    entry.delete(&app.db).await?;

    info!(user_skill_id = %id, user_id = %current_user.id, "Profile skill removed");

    Ok(RequestSuccess::NoContent)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::database::models::{role::Role, skill::SkillType};
    use crate::tests::{fixtures, setup_test::setup_test};

    #[tokio::test]
    async fn test_adding_catalogue_and_custom_skills() {
        let t = setup_test().await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;
        let rust = fixtures::skill(&t.db, "Rust", SkillType::Hard).await;
        let token = t.token_for(&seeker);

        let response = t
            .server
            .post("/api/user/skills")
            .authorization_bearer(&token)
            .json(&json!({ "skill": rust.id, "proficiency": 4, "verified": true }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["name"], "Rust");
        assert_eq!(body["skill_type"], "HARD");
        assert_eq!(body["proficiency"], 4);
        assert_eq!(body["verified"], false);
        assert_eq!(body["source"], "MANUAL");

        let response = t
            .server
            .post("/api/user/skills")
            .authorization_bearer(&token)
            .json(&json!({ "custom_name": "Public speaking", "custom_type": "SOFT" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["name"], "Public speaking");
        assert_eq!(body["skill"], Value::Null);
        assert_eq!(body["proficiency"], 3);

        let response = t
            .server
            .post("/api/user/skills")
            .authorization_bearer(&token)
            .json(&json!({ "skill": rust.id }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["detail"], super::ALREADY_ON_PROFILE);

        let response = t
            .server
            .get("/api/user/skills")
            .authorization_bearer(&token)
            .await;
        let body = response.json::<Value>();
        assert_eq!(body["count"], 2);
        assert_eq!(body["results"][0]["name"], "Rust");
    }

    #[tokio::test]
    async fn test_request_must_name_exactly_one_skill() {
        let t = setup_test().await;
        let seeker = fixtures::user(&t.db, Role::JobSeeker, false).await;
        let rust = fixtures::skill(&t.db, "Rust", SkillType::Hard).await;

        for body in [
            json!({}),
            json!({ "skill": rust.id, "custom_name": "Rust" }),
            json!({ "skill": rust.id, "proficiency": 6 }),
            json!({ "skill": uuid::Uuid::new_v4() }),
        ] {
            let response = t
                .server
                .post("/api/user/skills")
                .authorization_bearer(t.token_for(&seeker))
                .json(&body)
                .await;
            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{body}");
        }
    }

    #[tokio::test]
    async fn test_entries_belong_to_their_user() {
        let t = setup_test().await;
        let owner = fixtures::user(&t.db, Role::JobSeeker, false).await;
        let other = fixtures::user(&t.db, Role::Employer, false).await;
        let admin = fixtures::user(&t.db, Role::Admin, false).await;
        let rust = fixtures::skill(&t.db, "Rust", SkillType::Hard).await;
        let entry = fixtures::user_skill(&t.db, owner.id, rust.id).await;
        let path = format!("/api/user/skills/{}", entry.id);

        let response = t
            .server
            .get("/api/user/skills")
            .authorization_bearer(t.token_for(&other))
            .await;
        assert_eq!(response.json::<Value>()["count"], 0);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&other))
            .json(&json!({ "proficiency": 5 }))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&owner))
            .json(&json!({ "verified": true }))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&owner))
            .json(&json!({ "proficiency": 5 }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["proficiency"], 5);

        let response = t
            .server
            .patch(&path)
            .authorization_bearer(t.token_for(&admin))
            .json(&json!({ "verified": true }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["verified"], true);

        let response = t
            .server
            .delete(&path)
            .authorization_bearer(t.token_for(&owner))
            .await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    }
}
