//! `SeaORM` Entity for job applications

use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::Serialize;

use crate::database::models::{application_status::ApplicationStatus, job_listing};
use crate::policy::Owned;

/// Name of the unique index on `(job_id, applicant_id)`.
pub const JOB_APPLICANT_INDEX: &str = "idx-job_application-job_id-applicant_id";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "job_application")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub resume: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_listing::Entity",
        from = "Column::JobId",
        to = "super::job_listing::Column::Id",
        on_delete = "Cascade"
    )]
    JobListing,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ApplicantId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Applicant,
}

impl Related<super::job_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobListing.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applicant.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            status: Set(ApplicationStatus::default()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().naive_utc();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl Owned for Model {
    fn owner_id(&self) -> Uuid {
        self.applicant_id
    }
}

/// An application loaded together with the listing it was submitted to.
///
/// The listing is needed to answer whether the caller posted the job and may
/// therefore review the application.
#[derive(Clone, Debug)]
pub struct ApplicationOnJob {
    pub application: Model,
    pub job: job_listing::Model,
}

impl Owned for ApplicationOnJob {
    fn owner_id(&self) -> Uuid {
        self.application.applicant_id
    }

    fn reviewer_id(&self) -> Option<Uuid> {
        Some(self.job.posted_by)
    }
}
