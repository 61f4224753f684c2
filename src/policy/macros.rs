/// Authorize an action on a subject, returning 403 Forbidden if not permitted.
///
/// # Usage
///
/// ```rust,ignore
/// use jobboard::{authorize, policy::Policy};
///
/// authorize!(policy, create);
/// authorize!(policy, read, &listing);
/// authorize!(policy, update, &listing);
/// authorize!(policy, delete, &listing);
/// ```
#[macro_export]
macro_rules! authorize {
    ($policy:expr, read, $subject:expr) => {
        if !$policy.can_read($subject) {
            return Err($crate::api::request_result::RequestError::forbidden());
        }
    };
    ($policy:expr, create) => {
        if !$policy.can_create() {
            return Err($crate::api::request_result::RequestError::forbidden());
        }
    };
    ($policy:expr, update, $subject:expr) => {
        if !$policy.can_update($subject) {
            return Err($crate::api::request_result::RequestError::forbidden());
        }
    };
    ($policy:expr, delete, $subject:expr) => {
        if !$policy.can_delete($subject) {
            return Err($crate::api::request_result::RequestError::forbidden());
        }
    };
}
