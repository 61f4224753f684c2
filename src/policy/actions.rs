//! Per-endpoint action table.
//!
//! Every route names the resource and action it performs; [`gate_for`] maps the
//! pair to the [`Gate`] the caller has to pass. List-level gates are checked
//! before anything is loaded, object-level gates once the target row is known.

use strum::Display;
use tracing::debug;

use crate::policy::{
    predicates::{
        is_admin, is_employer_or_admin, is_job_seeker, is_owner_or_admin, is_reviewer_or_admin,
        Owned,
    },
    Caller,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Company,
    Skill,
    JobListing,
    JobApplication,
    /// A skill on a user's own profile.
    UserSkill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
    /// Listings posted by the caller.
    MyListings,
    /// Submit an application to a listing.
    Apply,
    /// Applications submitted by the caller.
    MyApplications,
    /// Move an application through its review states.
    ChangeStatus,
    /// Mark a profile skill as verified.
    Verify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Any authenticated caller.
    Authenticated,
    /// Employers, admins and staff.
    EmployerOrAdmin,
    /// Employers, admins and staff; on an object, only its owner unless admin.
    EmployerOrAdminOwner,
    /// The object's owner, admins and staff.
    OwnerOrAdmin,
    /// The object's reviewer (the poster of the job applied to), admins and staff.
    ReviewerOrAdmin,
    /// Callers whose role is job seeker, with no staff override.
    JobSeeker,
    /// Admins and staff only.
    Admin,
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    Unauthenticated,
    Forbidden,
}

pub const fn gate_for(resource: Resource, action: Action) -> Option<Gate> {
    use Action::*;

    match (resource, action) {
        (_, List | Retrieve) => Some(Gate::Authenticated),

        (Resource::Company | Resource::Skill, Create | Update | PartialUpdate | Destroy) => {
            Some(Gate::EmployerOrAdmin)
        }

        (Resource::JobListing, Create | MyListings) => Some(Gate::EmployerOrAdmin),
        (Resource::JobListing, Update | PartialUpdate | Destroy) => {
            Some(Gate::EmployerOrAdminOwner)
        }
        (Resource::JobListing, Apply) => Some(Gate::JobSeeker),

        (Resource::JobApplication, Create | MyApplications) => Some(Gate::JobSeeker),
        (Resource::JobApplication, Update | PartialUpdate | Destroy) => Some(Gate::OwnerOrAdmin),
        (Resource::JobApplication, ChangeStatus) => Some(Gate::ReviewerOrAdmin),

        (Resource::UserSkill, Create) => Some(Gate::Authenticated),
        (Resource::UserSkill, Update | PartialUpdate | Destroy) => Some(Gate::OwnerOrAdmin),
        (Resource::UserSkill, Verify) => Some(Gate::Admin),

        _ => None,
    }
}

impl Gate {
    /// The part of the gate that can be decided without the target object.
    pub fn allows(&self, caller: &Caller) -> bool {
        match self {
            Self::Authenticated | Self::OwnerOrAdmin | Self::ReviewerOrAdmin => true,
            Self::EmployerOrAdmin | Self::EmployerOrAdminOwner => is_employer_or_admin(caller),
            Self::JobSeeker => is_job_seeker(caller),
            Self::Admin => is_admin(caller),
        }
    }

    /// The full gate, evaluated against a loaded object.
    pub fn allows_object<O: Owned + ?Sized>(&self, caller: &Caller, object: &O) -> bool {
        if !self.allows(caller) {
            return false;
        }

        match self {
            Self::EmployerOrAdminOwner | Self::OwnerOrAdmin => is_owner_or_admin(caller, object),
            Self::ReviewerOrAdmin => is_reviewer_or_admin(caller, object),
            Self::Authenticated | Self::EmployerOrAdmin | Self::JobSeeker | Self::Admin => true,
        }
    }
}

fn lookup(
    caller: Option<&Caller>,
    resource: Resource,
    action: Action,
) -> Result<(&Caller, Gate), AccessDenied> {
    let caller = caller.ok_or(AccessDenied::Unauthenticated)?;
    let gate = gate_for(resource, action).ok_or_else(|| {
        debug!(%resource, %action, "No gate registered for action");
        AccessDenied::Forbidden
    })?;
    Ok((caller, gate))
}

/// Check a list-level action, before any object is loaded.
pub fn authorize(
    caller: Option<&Caller>,
    resource: Resource,
    action: Action,
) -> Result<(), AccessDenied> {
    let (caller, gate) = lookup(caller, resource, action)?;

    if gate.allows(caller) {
        Ok(())
    } else {
        debug!(caller = %caller.id, role = %caller.role, %resource, %action, "Permission denied");
        Err(AccessDenied::Forbidden)
    }
}

/// Check an object-level action against a loaded, owned object.
pub fn authorize_object<O: Owned + ?Sized>(
    caller: Option<&Caller>,
    resource: Resource,
    action: Action,
    object: &O,
) -> Result<(), AccessDenied> {
    let (caller, gate) = lookup(caller, resource, action)?;

    if gate.allows_object(caller, object) {
        Ok(())
    } else {
        debug!(caller = %caller.id, role = %caller.role, %resource, %action, "Permission denied on object");
        Err(AccessDenied::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::database::models::role::Role;

    struct Posting(Uuid);

    impl Owned for Posting {
        fn owner_id(&self) -> Uuid {
            self.0
        }
    }

    fn caller(role: Role) -> Caller {
        Caller::new(Uuid::new_v4(), role, false)
    }

    const ROLES: [Role; 3] = [Role::JobSeeker, Role::Employer, Role::Admin];

    #[test]
    fn test_unauthenticated_is_rejected_before_any_gate() {
        assert_eq!(
            authorize(None, Resource::Company, Action::List),
            Err(AccessDenied::Unauthenticated)
        );
        assert_eq!(
            authorize_object(None, Resource::JobListing, Action::Update, &Posting(Uuid::nil())),
            Err(AccessDenied::Unauthenticated)
        );
    }

    #[test]
    fn test_reads_only_need_authentication() {
        for role in ROLES {
            for resource in [
                Resource::Company,
                Resource::Skill,
                Resource::JobListing,
                Resource::JobApplication,
                Resource::UserSkill,
            ] {
                assert!(authorize(Some(&caller(role)), resource, Action::List).is_ok());
                assert!(authorize(Some(&caller(role)), resource, Action::Retrieve).is_ok());
            }
        }
    }

    #[test]
    fn test_creation_needs_employer_or_admin() {
        for resource in [Resource::Company, Resource::Skill, Resource::JobListing] {
            assert_eq!(
                authorize(Some(&caller(Role::JobSeeker)), resource, Action::Create),
                Err(AccessDenied::Forbidden)
            );
            assert!(authorize(Some(&caller(Role::Employer)), resource, Action::Create).is_ok());
            assert!(authorize(Some(&caller(Role::Admin)), resource, Action::Create).is_ok());

            let staff = Caller::new(Uuid::new_v4(), Role::JobSeeker, true);
            assert!(authorize(Some(&staff), resource, Action::Create).is_ok());
        }
    }

    #[test]
    fn test_listing_mutation_needs_ownership() {
        let owner = caller(Role::Employer);
        let other = caller(Role::Employer);
        let seeker = caller(Role::JobSeeker);
        let admin = caller(Role::Admin);
        let posting = Posting(owner.id);

        for action in [Action::Update, Action::PartialUpdate, Action::Destroy] {
            assert!(authorize_object(Some(&owner), Resource::JobListing, action, &posting).is_ok());
            assert!(authorize_object(Some(&admin), Resource::JobListing, action, &posting).is_ok());
            assert_eq!(
                authorize_object(Some(&other), Resource::JobListing, action, &posting),
                Err(AccessDenied::Forbidden)
            );
            assert_eq!(
                authorize_object(Some(&seeker), Resource::JobListing, action, &posting),
                Err(AccessDenied::Forbidden)
            );
        }
    }

    #[test]
    fn test_employer_who_is_not_the_owner_cannot_pass_the_role_gate_alone() {
        let gate = gate_for(Resource::JobListing, Action::Update).unwrap();
        let employer = caller(Role::Employer);
        assert!(gate.allows(&employer));
        assert!(!gate.allows_object(&employer, &Posting(Uuid::new_v4())));
    }

    #[test]
    fn test_seeker_only_actions() {
        for (resource, action) in [
            (Resource::JobListing, Action::Apply),
            (Resource::JobApplication, Action::Create),
            (Resource::JobApplication, Action::MyApplications),
        ] {
            assert!(authorize(Some(&caller(Role::JobSeeker)), resource, action).is_ok());
            assert_eq!(
                authorize(Some(&caller(Role::Employer)), resource, action),
                Err(AccessDenied::Forbidden)
            );
            assert_eq!(
                authorize(Some(&caller(Role::Admin)), resource, action),
                Err(AccessDenied::Forbidden)
            );
        }
    }

    #[test]
    fn test_profile_skills_belong_to_their_user() {
        let owner = caller(Role::JobSeeker);
        let other = caller(Role::Employer);
        let entry = Posting(owner.id);

        assert!(authorize(Some(&other), Resource::UserSkill, Action::Create).is_ok());
        assert!(authorize_object(Some(&owner), Resource::UserSkill, Action::Destroy, &entry).is_ok());
        assert_eq!(
            authorize_object(Some(&other), Resource::UserSkill, Action::Update, &entry),
            Err(AccessDenied::Forbidden)
        );
        assert_eq!(
            authorize(Some(&owner), Resource::UserSkill, Action::Verify),
            Err(AccessDenied::Forbidden)
        );
        let staff = Caller::new(Uuid::new_v4(), Role::Employer, true);
        assert!(authorize(Some(&staff), Resource::UserSkill, Action::Verify).is_ok());
    }

    #[test]
    fn test_my_listings_uses_the_creation_gate() {
        assert_eq!(
            gate_for(Resource::JobListing, Action::MyListings),
            gate_for(Resource::JobListing, Action::Create)
        );
    }

    #[test]
    fn test_unknown_combinations_are_forbidden() {
        assert_eq!(gate_for(Resource::Company, Action::Apply), None);
        assert_eq!(
            authorize(Some(&caller(Role::Admin)), Resource::Company, Action::MyListings),
            Err(AccessDenied::Forbidden)
        );
    }
}
