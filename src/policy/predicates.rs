//! Reusable authorization checks over a [`Caller`].
//!
//! All predicates are pure: they look at the caller and, for the ownership
//! checks, at a resource that has already been loaded.

use uuid::Uuid;

use crate::database::models::role::Role;
use crate::policy::Caller;

/// A resource with a single owning user.
///
/// Listings are owned by the user who posted them and applications by their
/// applicant. Resources without an owner (companies) do not implement this, so
/// they can never pass an ownership check.
pub trait Owned {
    fn owner_id(&self) -> Uuid;

    /// User who may review the resource without owning it.
    fn reviewer_id(&self) -> Option<Uuid> {
        None
    }
}

/// Admins and staff accounts.
pub fn is_admin(caller: &Caller) -> bool {
    caller.role == Role::Admin || caller.is_staff
}

pub fn is_employer_or_admin(caller: &Caller) -> bool {
    caller.role == Role::Employer || is_admin(caller)
}

pub fn is_job_seeker(caller: &Caller) -> bool {
    caller.role == Role::JobSeeker
}

pub fn is_owner_or_admin<O: Owned + ?Sized>(caller: &Caller, resource: &O) -> bool {
    is_admin(caller) || resource.owner_id() == caller.id
}

pub fn is_reviewer_or_admin<O: Owned + ?Sized>(caller: &Caller, resource: &O) -> bool {
    is_admin(caller) || resource.reviewer_id() == Some(caller.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listing {
        posted_by: Uuid,
    }

    impl Owned for Listing {
        fn owner_id(&self) -> Uuid {
            self.posted_by
        }
    }

    struct Application {
        applicant: Uuid,
        job_poster: Uuid,
    }

    impl Owned for Application {
        fn owner_id(&self) -> Uuid {
            self.applicant
        }

        fn reviewer_id(&self) -> Option<Uuid> {
            Some(self.job_poster)
        }
    }

    fn caller(role: Role, is_staff: bool) -> Caller {
        Caller::new(Uuid::new_v4(), role, is_staff)
    }

    #[test]
    fn test_employer_or_admin() {
        assert!(!is_employer_or_admin(&caller(Role::JobSeeker, false)));
        assert!(is_employer_or_admin(&caller(Role::Employer, false)));
        assert!(is_employer_or_admin(&caller(Role::Admin, false)));
        assert!(is_employer_or_admin(&caller(Role::JobSeeker, true)));
    }

    #[test]
    fn test_staff_satisfies_everything_admin_does() {
        let admin = caller(Role::Admin, false);
        let staff = caller(Role::JobSeeker, true);
        let listing = Listing {
            posted_by: Uuid::new_v4(),
        };
        let application = Application {
            applicant: Uuid::new_v4(),
            job_poster: Uuid::new_v4(),
        };

        for who in [&admin, &staff] {
            assert!(is_admin(who));
            assert!(is_employer_or_admin(who));
            assert!(is_owner_or_admin(who, &listing));
            assert!(is_owner_or_admin(who, &application));
            assert!(is_reviewer_or_admin(who, &application));
        }
    }

    #[test]
    fn test_owner_or_admin() {
        let owner = caller(Role::Employer, false);
        let other = caller(Role::Employer, false);
        let listing = Listing {
            posted_by: owner.id,
        };

        assert!(is_owner_or_admin(&owner, &listing));
        assert!(!is_owner_or_admin(&other, &listing));
    }

    #[test]
    fn test_application_ownership_uses_applicant() {
        let applicant = caller(Role::JobSeeker, false);
        let poster = caller(Role::Employer, false);
        let application = Application {
            applicant: applicant.id,
            job_poster: poster.id,
        };

        assert!(is_owner_or_admin(&applicant, &application));
        assert!(!is_owner_or_admin(&poster, &application));
        assert!(is_reviewer_or_admin(&poster, &application));
        assert!(!is_reviewer_or_admin(&applicant, &application));
    }

    #[test]
    fn test_no_reviewer_by_default() {
        let employer = caller(Role::Employer, false);
        let listing = Listing {
            posted_by: Uuid::new_v4(),
        };
        assert!(!is_reviewer_or_admin(&employer, &listing));
    }

    #[test]
    fn test_job_seeker_is_a_hard_role_check() {
        assert!(is_job_seeker(&caller(Role::JobSeeker, false)));
        assert!(!is_job_seeker(&caller(Role::Employer, false)));
        assert!(!is_job_seeker(&caller(Role::Admin, true)));
    }
}
