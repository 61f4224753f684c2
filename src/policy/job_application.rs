use sea_orm::{sea_query::Query, ColumnTrait, Condition, QueryFilter, Select};

use crate::database::models::{
    job_application::{self, ApplicationOnJob},
    job_listing,
    role::Role,
};
use crate::policy::{
    actions::gate_for,
    predicates::{is_admin, is_owner_or_admin, is_reviewer_or_admin},
    Action, Caller, Policy, Resource,
};

/// Applications are visible to their applicant, to the employer who posted the
/// job and to admins. Only the applicant (or an admin) edits or withdraws one;
/// only the poster (or an admin) moves it through the review states.
pub struct JobApplicationPolicy {
    caller: Caller,
}

impl JobApplicationPolicy {
    pub const fn new(caller: Caller) -> Self {
        Self { caller }
    }

    fn permits(&self, action: Action) -> bool {
        gate_for(Resource::JobApplication, action).is_some_and(|gate| gate.allows(&self.caller))
    }

    fn permits_on(&self, action: Action, subject: &ApplicationOnJob) -> bool {
        gate_for(Resource::JobApplication, action)
            .is_some_and(|gate| gate.allows_object(&self.caller, subject))
    }

    pub fn can_list_own(&self) -> bool {
        self.permits(Action::MyApplications)
    }

    pub fn can_change_status(&self, subject: &ApplicationOnJob) -> bool {
        self.permits_on(Action::ChangeStatus, subject)
    }

    /// The caller's own applications.
    pub fn own(
        &self,
        query: Select<job_application::Entity>,
    ) -> Select<job_application::Entity> {
        query.filter(job_application::Column::ApplicantId.eq(self.caller.id))
    }

    /// Applications submitted to listings the caller posted.
    fn received(
        &self,
        query: Select<job_application::Entity>,
    ) -> Select<job_application::Entity> {
        let posted_by_caller = Query::select()
            .column(job_listing::Column::Id)
            .from(job_listing::Entity)
            .and_where(job_listing::Column::PostedBy.eq(self.caller.id))
            .to_owned();

        query.filter(
            Condition::all().add(job_application::Column::JobId.in_subquery(posted_by_caller)),
        )
    }
}

impl Policy<job_application::Entity> for JobApplicationPolicy {
    type Subject = ApplicationOnJob;

    fn can_read(&self, subject: &ApplicationOnJob) -> bool {
        self.permits(Action::Retrieve)
            && (is_owner_or_admin(&self.caller, subject)
                || is_reviewer_or_admin(&self.caller, subject))
    }

    fn readable(
        &self,
        query: Select<job_application::Entity>,
    ) -> Select<job_application::Entity> {
        if is_admin(&self.caller) {
            query
        } else if self.caller.role == Role::Employer {
            self.received(query)
        } else {
            self.own(query)
        }
    }

    fn can_create(&self) -> bool {
        self.permits(Action::Create)
    }

    fn can_update(&self, subject: &ApplicationOnJob) -> bool {
        self.permits_on(Action::Update, subject)
    }

    fn can_delete(&self, subject: &ApplicationOnJob) -> bool {
        self.permits_on(Action::Destroy, subject)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};
    use uuid::Uuid;

    use super::*;
    use crate::database::models::{
        application_status::ApplicationStatus,
        listing_enums::{ExperienceLevel, JobType},
    };

    fn subject(applicant: Uuid, poster: Uuid) -> ApplicationOnJob {
        let now = Utc::now().naive_utc();
        let job = job_listing::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: "Data Scientist".to_string(),
            company_id: Uuid::new_v4(),
            posted_by: poster,
            description: "Models".to_string(),
            requirements: "Statistics".to_string(),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Senior,
            location: "Remote".to_string(),
            remote: true,
            salary_min: None,
            salary_max: None,
            application_url: None,
            deadline: None,
            is_active: true,
        };
        let application = job_application::Model {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            job_id: job.id,
            applicant_id: applicant,
            resume: None,
            cover_letter: Some("Hello".to_string()),
            status: ApplicationStatus::Applied,
        };
        ApplicationOnJob { application, job }
    }

    fn caller(role: Role) -> Caller {
        Caller::new(Uuid::new_v4(), role, false)
    }

    /// The WHERE clause of the scoped query, empty when nothing is filtered.
    fn readable_sql(caller: Caller) -> String {
        let sql = JobApplicationPolicy::new(caller)
            .readable(job_application::Entity::find())
            .build(DbBackend::Postgres)
            .to_string();
        sql.split_once("WHERE")
            .map(|(_, filter)| filter.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_scoping_by_role() {
        let admin_sql = readable_sql(caller(Role::Admin));
        assert!(admin_sql.is_empty());

        let staff_sql = readable_sql(Caller::new(Uuid::new_v4(), Role::Employer, true));
        assert!(staff_sql.is_empty());

        let employer = caller(Role::Employer);
        let employer_sql = readable_sql(employer);
        assert!(employer_sql.contains(r#""posted_by""#));
        assert!(employer_sql.contains(&employer.id.to_string()));
        assert!(!employer_sql.contains(r#""applicant_id""#));

        let seeker = caller(Role::JobSeeker);
        let seeker_sql = readable_sql(seeker);
        assert!(seeker_sql.contains(r#""applicant_id""#));
        assert!(seeker_sql.contains(&seeker.id.to_string()));
    }

    #[test]
    fn test_visibility_is_transitive_through_the_job() {
        let applicant = caller(Role::JobSeeker);
        let poster = caller(Role::Employer);
        let subject = subject(applicant.id, poster.id);

        assert!(JobApplicationPolicy::new(applicant).can_read(&subject));
        assert!(JobApplicationPolicy::new(poster).can_read(&subject));
        assert!(JobApplicationPolicy::new(caller(Role::Admin)).can_read(&subject));
        assert!(!JobApplicationPolicy::new(caller(Role::Employer)).can_read(&subject));
        assert!(!JobApplicationPolicy::new(caller(Role::JobSeeker)).can_read(&subject));
    }

    #[test]
    fn test_applicant_edits_but_does_not_review() {
        let applicant = caller(Role::JobSeeker);
        let poster = caller(Role::Employer);
        let subject = subject(applicant.id, poster.id);

        let applicant = JobApplicationPolicy::new(applicant);
        assert!(applicant.can_update(&subject));
        assert!(applicant.can_delete(&subject));
        assert!(!applicant.can_change_status(&subject));

        let poster = JobApplicationPolicy::new(poster);
        assert!(!poster.can_update(&subject));
        assert!(!poster.can_delete(&subject));
        assert!(poster.can_change_status(&subject));

        let admin = JobApplicationPolicy::new(caller(Role::Admin));
        assert!(admin.can_update(&subject));
        assert!(admin.can_change_status(&subject));
    }

    #[test]
    fn test_only_job_seekers_list_their_own() {
        assert!(JobApplicationPolicy::new(caller(Role::JobSeeker)).can_list_own());
        assert!(!JobApplicationPolicy::new(caller(Role::Employer)).can_list_own());
        assert!(!JobApplicationPolicy::new(caller(Role::Admin)).can_list_own());
    }
}
