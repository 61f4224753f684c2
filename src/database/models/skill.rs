//! `SeaORM` Entity for skills

use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Name of the unique index on `name`.
pub const SKILL_NAME_INDEX: &str = "idx-skill-name";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillType {
    #[sea_orm(string_value = "SOFT")]
    Soft,
    #[sea_orm(string_value = "HARD")]
    Hard,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "skill")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub skill_type: SkillType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::job_listing_skill::Entity")]
    JobListingSkill,
    #[sea_orm(has_many = "super::user_skill::Entity")]
    UserSkill,
}

impl Related<super::job_listing_skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobListingSkill.def()
    }
}

impl Related<super::job_listing::Entity> for Entity {
    fn to() -> RelationDef {
        super::job_listing_skill::Relation::JobListing.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::job_listing_skill::Relation::Skill.def().rev())
    }
}

impl Related<super::user_skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSkill.def()
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
