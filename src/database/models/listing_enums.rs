use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Employment arrangement offered by a listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    #[sea_orm(string_value = "FULL_TIME")]
    #[default]
    FullTime,
    #[sea_orm(string_value = "PART_TIME")]
    PartTime,
    #[sea_orm(string_value = "CONTRACT")]
    Contract,
    #[sea_orm(string_value = "FREELANCE")]
    Freelance,
    #[sea_orm(string_value = "INTERNSHIP")]
    Internship,
}

/// Seniority a listing is aimed at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceLevel {
    #[sea_orm(string_value = "ENTRY")]
    #[default]
    Entry,
    #[sea_orm(string_value = "MID")]
    Mid,
    #[sea_orm(string_value = "SENIOR")]
    Senior,
    #[sea_orm(string_value = "EXECUTIVE")]
    Executive,
}
