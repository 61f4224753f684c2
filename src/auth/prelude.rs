//! Prelude for authentication and authorization.
//!
//! Import this module in route handlers to bring the extractor, the policies
//! and the `authorize!` macro into scope.

pub use crate::auth::CurrentUser;

pub use crate::policy::{
    Action, Caller, CompanyPolicy, JobApplicationPolicy, JobListingPolicy, Owned, Policy,
    Resource, SkillPolicy, UserSkillPolicy,
};

pub use crate::api::request_result::{RequestError, RequestResult, RequestSuccess};

pub use crate::authorize;
