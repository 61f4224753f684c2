use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{api, app::App, routes};

pub fn router(app: App) -> Router {
    Router::new()
        .route("/liveness", get(api::health_checks::ok))
        .route("/readiness", get(api::health_checks::readiness))
        .nest("/api", routes::app_router())
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}
