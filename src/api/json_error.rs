use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

const INVALID_INPUT: &str = "Invalid input.";

/// Request bodies that could not be read or did not pass validation.
///
/// Both answer 400. Validation failures keep the full per-field report under
/// `errors`, and `detail` holds the first message so clients can show a
/// single line.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("Invalid JSON body")]
    InvalidJson(#[from] JsonRejection),
    #[error("Validation error")]
    ValidationError(ValidationErrors),
}

/// First error message, in field name order. Struct-level checks report
/// under `__all__`.
pub fn summarize(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .find_map(|(field, field_errors)| {
            field_errors.first().map(|error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for '{field}'."),
            })
        })
        .unwrap_or_else(|| INVALID_INPUT.to_string())
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let body = match self {
            Self::InvalidJson(rejection) => json!({ "detail": rejection.body_text() }),
            Self::ValidationError(errors) => json!({
                "detail": summarize(&errors),
                "errors": errors,
            }),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use validator::ValidationError;

    use super::*;

    #[test]
    fn test_summary_prefers_custom_messages() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "salary_max",
            ValidationError::new("range").with_message("Too low.".into()),
        );
        errors.add("email", ValidationError::new("email"));

        assert_eq!(summarize(&errors), "Invalid value for 'email'.");

        let mut errors = ValidationErrors::new();
        errors.add(
            "title",
            ValidationError::new("length").with_message("Title is too long.".into()),
        );
        assert_eq!(summarize(&errors), "Title is too long.");
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(summarize(&ValidationErrors::new()), INVALID_INPUT);
    }
}
