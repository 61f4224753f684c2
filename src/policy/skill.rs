use sea_orm::Select;

use crate::database::models::skill;
use crate::policy::{actions::gate_for, Action, Caller, Policy, Resource};

/// The skill catalogue is shared: everyone signed in reads it, employers and
/// admins curate it.
pub struct SkillPolicy {
    caller: Caller,
}

impl SkillPolicy {
    pub const fn new(caller: Caller) -> Self {
        Self { caller }
    }

    fn permits(&self, action: Action) -> bool {
        gate_for(Resource::Skill, action).is_some_and(|gate| gate.allows(&self.caller))
    }
}

impl Policy<skill::Entity> for SkillPolicy {
    type Subject = skill::Model;

    fn can_read(&self, _skill: &skill::Model) -> bool {
        self.permits(Action::Retrieve)
    }

    fn readable(&self, query: Select<skill::Entity>) -> Select<skill::Entity> {
        query
    }

    fn can_create(&self) -> bool {
        self.permits(Action::Create)
    }

    fn can_update(&self, _skill: &skill::Model) -> bool {
        self.permits(Action::Update)
    }

    fn can_delete(&self, _skill: &skill::Model) -> bool {
        self.permits(Action::Destroy)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::database::models::{role::Role, skill::SkillType};

    fn rust() -> skill::Model {
        let now = Utc::now().naive_utc();
        skill::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            name: "Rust".to_string(),
            description: None,
            skill_type: SkillType::Hard,
        }
    }

    fn policy(role: Role, is_staff: bool) -> SkillPolicy {
        SkillPolicy::new(Caller::new(Uuid::new_v4(), role, is_staff))
    }

    #[test]
    fn test_catalogue_is_curated_like_companies() {
        let seeker = policy(Role::JobSeeker, false);
        assert!(seeker.can_read(&rust()));
        assert!(!seeker.can_create());
        assert!(!seeker.can_update(&rust()));

        for curator in [
            policy(Role::Employer, false),
            policy(Role::Admin, false),
            policy(Role::JobSeeker, true),
        ] {
            assert!(curator.can_create());
            assert!(curator.can_delete(&rust()));
        }
    }
}
