//! `SeaORM` Entity for skills on a user's profile

use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

use crate::database::models::skill::{self, SkillType};
use crate::policy::Owned;

pub const USER_SKILL_INDEX: &str = "idx-user_skill-user_id-skill_id";
pub const USER_CUSTOM_SKILL_INDEX: &str = "idx-user_skill-user_id-custom_name";

/// Where a profile skill came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillSource {
    #[sea_orm(string_value = "CV_EXTRACTION")]
    CvExtraction,
    #[sea_orm(string_value = "MANUAL")]
    #[default]
    Manual,
    #[sea_orm(string_value = "RECOMMENDATION")]
    Recommendation,
    #[sea_orm(string_value = "JOB_ANALYSIS")]
    JobAnalysis,
}

/// A profile skill points at a catalogue [`skill`] or carries its own name.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "user_skill")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub user_id: Uuid,
    pub skill_id: Option<Uuid>,
    pub custom_name: Option<String>,
    pub custom_type: Option<SkillType>,
    pub proficiency: i16,
    pub verified: bool,
    pub source: SkillSource,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::skill::Entity",
        from = "Column::SkillId",
        to = "super::skill::Column::Id",
        on_delete = "Cascade"
    )]
    Skill,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Skill.def()
    }
}

pub const DEFAULT_PROFICIENCY: i16 = 3;

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            proficiency: Set(DEFAULT_PROFICIENCY),
            verified: Set(false),
            source: Set(SkillSource::default()),
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
        self.user_id
    }
}

/// Name and type come from the catalogue skill when there is one.
#[derive(Debug, Clone, Serialize)]
pub struct UserSkillResponse {
    pub id: Uuid,
    pub skill: Option<Uuid>,
    pub name: Option<String>,
    pub skill_type: Option<SkillType>,
    pub proficiency: i16,
    pub verified: bool,
    pub source: SkillSource,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<(Model, Option<skill::Model>)> for UserSkillResponse {
    fn from((entry, skill): (Model, Option<skill::Model>)) -> Self {
        let (name, skill_type) = match skill {
            Some(skill) => (Some(skill.name), Some(skill.skill_type)),
            None => (entry.custom_name, entry.custom_type),
        };

        Self {
            id: entry.id,
            skill: entry.skill_id,
            name,
            skill_type,
            proficiency: entry.proficiency,
            verified: entry.verified,
            source: entry.source,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
