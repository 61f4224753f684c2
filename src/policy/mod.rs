pub mod actions;
pub mod caller;
pub mod company;
pub mod job_application;
pub mod job_listing;
pub mod macros;
pub mod predicates;
pub mod skill;
pub mod user_skill;

use sea_orm::Select;

pub use actions::{authorize, authorize_object, AccessDenied, Action, Gate, Resource};
pub use caller::Caller;
pub use company::CompanyPolicy;
pub use job_application::JobApplicationPolicy;
pub use job_listing::JobListingPolicy;
pub use predicates::Owned;
pub use skill::SkillPolicy;
pub use user_skill::UserSkillPolicy;

/// Policy trait for authorization logic.
///
/// Implement this trait for each entity type that requires authorization.
/// The policy provides methods to check permissions and filter queries.
///
/// # Type Parameters
/// * `E` - The entity type this policy authorizes
///
/// # Example
/// ```rust,ignore
/// use jobboard::policy::{Caller, Policy};
/// use jobboard::database::models::job_listing;
///
/// pub struct JobListingPolicy {
///     caller: Caller,
/// }
///
/// impl Policy<job_listing::Entity> for JobListingPolicy {
///     type Subject = job_listing::Model;
///
///     fn can_read(&self, listing: &job_listing::Model) -> bool {
///         listing.is_active || is_employer_or_admin(&self.caller)
///     }
///
///     fn readable(&self, query: Select<job_listing::Entity>) -> Select<job_listing::Entity> {
///         if is_employer_or_admin(&self.caller) {
///             query
///         } else {
///             query.filter(job_listing::Column::IsActive.eq(true))
///         }
///     }
/// }
/// ```
pub trait Policy<E>
where
    E: sea_orm::EntityTrait,
{
    /// What object-level checks are evaluated against.
    ///
    /// Usually `E::Model`; resources whose permissions depend on a related row
    /// use a type that carries both.
    type Subject;

    /// Check if the current user can read the given subject.
    fn can_read(&self, subject: &Self::Subject) -> bool;

    /// Filter a query to only return entities the current user can read.
    ///
    /// Applied to the base query before ordering and pagination, so counts and
    /// pages only ever see permitted rows. Single-object lookups go through it
    /// too, which turns out-of-scope rows into 404s.
    fn readable(&self, query: Select<E>) -> Select<E>;

    /// Check if the current user can create an entity of this type.
    fn can_create(&self) -> bool {
        false
    }

    /// Check if the current user can update the given subject.
    ///
    /// By default, delegates to `can_read`. Override for different update permissions.
    fn can_update(&self, subject: &Self::Subject) -> bool {
        self.can_read(subject)
    }

    /// Check if the current user can delete the given subject.
    ///
    /// By default, delegates to `can_update`. Override for different delete permissions.
    fn can_delete(&self, subject: &Self::Subject) -> bool {
        self.can_update(subject)
    }
}
