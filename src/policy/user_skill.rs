use sea_orm::{ColumnTrait, QueryFilter, Select};

use crate::database::models::user_skill;
use crate::policy::{
    actions::gate_for, predicates::is_admin, Action, Caller, Policy, Resource,
};

/// Profile skills are private to their user; admins see and manage all of them
/// and are the only ones who may verify one.
pub struct UserSkillPolicy {
    caller: Caller,
}

impl UserSkillPolicy {
    pub const fn new(caller: Caller) -> Self {
        Self { caller }
    }

    fn permits(&self, action: Action) -> bool {
        gate_for(Resource::UserSkill, action).is_some_and(|gate| gate.allows(&self.caller))
    }

    fn permits_on(&self, action: Action, entry: &user_skill::Model) -> bool {
        gate_for(Resource::UserSkill, action)
            .is_some_and(|gate| gate.allows_object(&self.caller, entry))
    }

    pub fn can_verify(&self) -> bool {
        self.permits(Action::Verify)
    }
}

impl Policy<user_skill::Entity> for UserSkillPolicy {
    type Subject = user_skill::Model;

    fn can_read(&self, entry: &user_skill::Model) -> bool {
        is_admin(&self.caller) || entry.user_id == self.caller.id
    }

    fn readable(&self, query: Select<user_skill::Entity>) -> Select<user_skill::Entity> {
        if is_admin(&self.caller) {
            query
        } else {
            query.filter(user_skill::Column::UserId.eq(self.caller.id))
        }
    }

    fn can_create(&self) -> bool {
        self.permits(Action::Create)
    }

    fn can_update(&self, entry: &user_skill::Model) -> bool {
        self.permits_on(Action::Update, entry)
    }

    fn can_delete(&self, entry: &user_skill::Model) -> bool {
        self.permits_on(Action::Destroy, entry)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};
    use uuid::Uuid;

    use super::*;
    use crate::database::models::{role::Role, user_skill::SkillSource};

    fn entry(user_id: Uuid) -> user_skill::Model {
        let now = Utc::now().naive_utc();
        user_skill::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            user_id,
            skill_id: None,
            custom_name: Some("Public speaking".to_string()),
            custom_type: None,
            proficiency: 3,
            verified: false,
            source: SkillSource::Manual,
        }
    }

    #[test]
    fn test_entries_are_private_to_their_user() {
        let owner = Caller::new(Uuid::new_v4(), Role::JobSeeker, false);
        let own = entry(owner.id);
        let owner = UserSkillPolicy::new(owner);
        let stranger = UserSkillPolicy::new(Caller::new(Uuid::new_v4(), Role::Employer, false));
        let admin = UserSkillPolicy::new(Caller::new(Uuid::new_v4(), Role::Admin, false));

        assert!(owner.can_read(&own) && owner.can_update(&own) && owner.can_delete(&own));
        assert!(!stranger.can_read(&own));
        assert!(!stranger.can_delete(&own));
        assert!(admin.can_update(&own));
        assert!(admin.can_verify());
        assert!(!owner.can_verify());
    }

    #[test]
    fn test_non_admins_only_list_their_own() {
        let seeker = Caller::new(Uuid::new_v4(), Role::JobSeeker, false);
        let sql = UserSkillPolicy::new(seeker)
            .readable(user_skill::Entity::find())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(&seeker.id.to_string()));

        let staff = Caller::new(Uuid::new_v4(), Role::JobSeeker, true);
        let sql = UserSkillPolicy::new(staff)
            .readable(user_skill::Entity::find())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(!sql.contains("WHERE"));
    }
}
