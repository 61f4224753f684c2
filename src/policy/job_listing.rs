use sea_orm::{ColumnTrait, QueryFilter, Select};

use crate::database::models::job_listing;
use crate::policy::{
    actions::gate_for, predicates::is_employer_or_admin, Action, Caller, Policy, Resource,
};

pub struct JobListingPolicy {
    caller: Caller,
}

impl JobListingPolicy {
    pub const fn new(caller: Caller) -> Self {
        Self { caller }
    }

    fn permits(&self, action: Action) -> bool {
        gate_for(Resource::JobListing, action).is_some_and(|gate| gate.allows(&self.caller))
    }

    fn permits_on(&self, action: Action, listing: &job_listing::Model) -> bool {
        gate_for(Resource::JobListing, action)
            .is_some_and(|gate| gate.allows_object(&self.caller, listing))
    }

    /// Employers, admins and staff also see inactive listings.
    fn sees_inactive(&self) -> bool {
        is_employer_or_admin(&self.caller)
    }

    pub fn can_list_own(&self) -> bool {
        self.permits(Action::MyListings)
    }

    pub fn can_apply(&self) -> bool {
        self.permits(Action::Apply)
    }

    /// The caller's own listings, whether active or not.
    pub fn own(&self, query: Select<job_listing::Entity>) -> Select<job_listing::Entity> {
        query.filter(job_listing::Column::PostedBy.eq(self.caller.id))
    }
}

impl Policy<job_listing::Entity> for JobListingPolicy {
    type Subject = job_listing::Model;

    fn can_read(&self, listing: &job_listing::Model) -> bool {
        self.permits(Action::Retrieve) && (listing.is_active || self.sees_inactive())
    }

    fn readable(&self, query: Select<job_listing::Entity>) -> Select<job_listing::Entity> {
        if self.sees_inactive() {
            query
        } else {
            query.filter(job_listing::Column::IsActive.eq(true))
        }
    }

    fn can_create(&self) -> bool {
        self.permits(Action::Create)
    }

    fn can_update(&self, listing: &job_listing::Model) -> bool {
        self.permits_on(Action::Update, listing)
    }

    fn can_delete(&self, listing: &job_listing::Model) -> bool {
        self.permits_on(Action::Destroy, listing)
    }
}
