//! `SeaORM` Entity for job listings

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::Serialize;

use crate::database::models::listing_enums::{ExperienceLevel, JobType};
use crate::policy::Owned;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "job_listing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub title: String,
    pub company_id: Uuid,
    pub posted_by: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub requirements: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub location: String,
    pub remote: bool,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub salary_min: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub salary_max: Option<Decimal>,
    pub application_url: Option<String>,
    pub deadline: Option<Date>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Cascade"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PostedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    PostedBy,
    #[sea_orm(has_many = "super::job_application::Entity")]
    JobApplication,
    #[sea_orm(has_many = "super::job_listing_skill::Entity")]
    JobListingSkill,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostedBy.def()
    }
}

impl Related<super::job_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobApplication.def()
    }
}

impl Related<super::job_listing_skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobListingSkill.def()
    }
}

impl Related<super::skill::Entity> for Entity {
    fn to() -> RelationDef {
        super::job_listing_skill::Relation::Skill.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::job_listing_skill::Relation::JobListing.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
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
        self.posted_by
    }
}
