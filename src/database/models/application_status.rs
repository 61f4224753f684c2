use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Review state of a job application.
///
/// # State Transitions
///
/// - `Applied` → `Reviewing` → `Interview`
/// - `Interview` → `Accepted` or `Rejected`
///
/// `Accepted` and `Rejected` are terminal. Writing the current status again is
/// accepted and changes nothing.
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
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    /// Submitted, nobody has looked at it yet.
    #[sea_orm(string_value = "APPLIED")]
    #[default]
    Applied,

    #[sea_orm(string_value = "REVIEWING")]
    Reviewing,

    #[sea_orm(string_value = "INTERVIEW")]
    Interview,

    #[sea_orm(string_value = "REJECTED")]
    Rejected,

    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot change application status from {from} to {to}.")]
pub struct InvalidTransition {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}

impl ApplicationStatus {
    /// States reachable in one step from this one.
    const fn successors(&self) -> &'static [Self] {
        match self {
            Self::Applied => &[Self::Reviewing],
            Self::Reviewing => &[Self::Interview],
            Self::Interview => &[Self::Accepted, Self::Rejected],
            Self::Rejected | Self::Accepted => &[],
        }
    }

    pub fn can_transition_to(&self, to: Self) -> bool {
        *self == to || self.successors().contains(&to)
    }

    /// Validate a status write, returning the new status when it is legal.
    pub fn transition_to(&self, to: Self) -> Result<Self, InvalidTransition> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: *self, to })
        }
    }
}
