use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The role a user account carries for its whole lifetime.
///
/// Roles are assigned at registration (or by the `create-admin` command) and are
/// read on every request to decide what the caller may do. Staff accounts
/// (`user.is_staff`) are treated like `Admin` regardless of the stored role.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Browses active listings and applies to them.
    #[sea_orm(string_value = "JOB_SEEKER")]
    #[default]
    JobSeeker,

    /// Posts listings and reviews the applications they receive.
    #[sea_orm(string_value = "EMPLOYER")]
    Employer,

    /// Full access to every resource.
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

impl Role {
    /// Roles a user may pick for themselves when registering.
    pub const fn is_self_assignable(&self) -> bool {
        matches!(self, Self::JobSeeker | Self::Employer)
    }
}
