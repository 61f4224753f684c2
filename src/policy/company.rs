use sea_orm::Select;

use crate::database::models::company;
use crate::policy::{actions::gate_for, Action, Caller, Policy, Resource};

/// Companies are readable by everyone signed in and managed collectively by
/// employers and admins; there is no per-company owner.
pub struct CompanyPolicy {
    caller: Caller,
}

impl CompanyPolicy {
    pub const fn new(caller: Caller) -> Self {
        Self { caller }
    }

    fn permits(&self, action: Action) -> bool {
        gate_for(Resource::Company, action).is_some_and(|gate| gate.allows(&self.caller))
    }
}

impl Policy<company::Entity> for CompanyPolicy {
    type Subject = company::Model;

    fn can_read(&self, _company: &company::Model) -> bool {
        self.permits(Action::Retrieve)
    }

    fn readable(&self, query: Select<company::Entity>) -> Select<company::Entity> {
        query
    }

    fn can_create(&self) -> bool {
        self.permits(Action::Create)
    }

    fn can_update(&self, _company: &company::Model) -> bool {
        self.permits(Action::Update)
    }

    fn can_delete(&self, _company: &company::Model) -> bool {
        self.permits(Action::Destroy)
    }
}
