use axum::{
    extract::{FromRequest, OptionalFromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::Validate;

use crate::api::json_error::JsonError;

/// JSON body extractor that also runs the payload's `validator` rules.
///
/// Fields a payload does not declare (`posted_by`, `applicant`, `role`, ...) are
/// dropped during deserialization, so clients cannot smuggle them in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// A body whose rejection is handed to the handler instead of answering for it.
///
/// Handlers that gate on the caller take this, run their permission checks and
/// only then `?` the body, so a denied caller gets 403 whatever they sent.
pub type JsonBody<T> = Result<ValidatedJson<T>, JsonError>;

/// Like [`JsonBody`], for endpoints where the body may be left out entirely.
pub type OptionalJsonBody<T> = Result<Option<ValidatedJson<T>>, JsonError>;

fn rejected(rejection: axum::extract::rejection::JsonRejection) -> JsonError {
    debug!("Rejected request body: {}", rejection.body_text());
    JsonError::InvalidJson(rejection)
}

fn validated<T: Validate>(payload: T) -> Result<ValidatedJson<T>, JsonError> {
    if let Err(errors) = payload.validate() {
        debug!("Request body failed validation: {}", errors);
        return Err(JsonError::ValidationError(errors));
    }

    Ok(ValidatedJson(payload))
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(rejected)?;

        validated(payload)
    }
}

/// Requests without a `Content-Type` header extract as `None`.
impl<T, S> OptionalFromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let payload = <Json<T> as OptionalFromRequest<S>>::from_request(req, state)
            .await
            .map_err(rejected)?;

        payload.map(|Json(payload)| validated(payload)).transpose()
    }
}
