pub mod health_checks;
pub mod json_error;
pub mod ordering;
pub mod pagination;
pub mod request_result;
pub mod search;
pub mod unique_constraint;
pub mod validated_json;
