use axum::{
    routing::{get, post},
    Router,
};

use crate::app::App;

pub mod auth;
pub mod companies;
pub mod job_applications;
pub mod job_listings;
pub mod skills;
pub mod user_skills;

/// Every `/api` endpoint. Static segments such as `my_listings` take priority
/// over the `{id}` captures next to them.
pub fn app_router() -> Router<App> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me).patch(auth::update_me))
        .route(
            "/companies",
            get(companies::index).post(companies::create),
        )
        .route(
            "/companies/{id}",
            get(companies::show)
                .put(companies::replace)
                .patch(companies::update)
                .delete(companies::destroy),
        )
        .route(
            "/job/listing",
            get(job_listings::index).post(job_listings::create),
        )
        .route("/job/listing/my_listings", get(job_listings::my_listings))
        .route(
            "/job/listing/{id}",
            get(job_listings::show)
                .put(job_listings::replace)
                .patch(job_listings::update)
                .delete(job_listings::destroy),
        )
        .route("/job/listing/{id}/apply", post(job_listings::apply))
        .route(
            "/applications",
            get(job_applications::index).post(job_applications::create),
        )
        .route(
            "/applications/my_applications",
            get(job_applications::my_applications),
        )
        .route(
            "/applications/{id}",
            get(job_applications::show)
                .put(job_applications::update)
                .patch(job_applications::update)
                .delete(job_applications::destroy),
        )
        .route("/skills", get(skills::index).post(skills::create))
        .route(
            "/skills/{id}",
            get(skills::show)
                .put(skills::replace)
                .patch(skills::update)
                .delete(skills::destroy),
        )
        .route(
            "/user/skills",
            get(user_skills::index).post(user_skills::create),
        )
        .route(
            "/user/skills/{id}",
            get(user_skills::show)
                .put(user_skills::update)
                .patch(user_skills::update)
                .delete(user_skills::destroy),
        )
}
