use sea_orm_migration::{
    prelude::*,
    schema::{pk_uuid, string_len, text_null, timestamp, uuid},
};

use super::m20261018_000003_create_job_listing::JobListing;
use crate::database::models::skill::SKILL_NAME_INDEX;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Skill::Table)
                    .if_not_exists()
                    .col(pk_uuid(Skill::Id))
                    .col(timestamp(Skill::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Skill::UpdatedAt).default(Expr::current_timestamp()))
                    .col(string_len(Skill::Name, 100))
                    .col(text_null(Skill::Description))
                    .col(string_len(Skill::SkillType, 10))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(SKILL_NAME_INDEX)
                    .table(Skill::Table)
                    .col(Skill::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobListingSkill::Table)
                    .if_not_exists()
                    .col(uuid(JobListingSkill::JobListingId))
                    .col(uuid(JobListingSkill::SkillId))
                    .primary_key(
                        Index::create()
                            .col(JobListingSkill::JobListingId)
                            .col(JobListingSkill::SkillId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-job_listing_skill-job_listing_id")
                            .from(JobListingSkill::Table, JobListingSkill::JobListingId)
                            .to(JobListing::Table, JobListing::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-job_listing_skill-skill_id")
                            .from(JobListingSkill::Table, JobListingSkill::SkillId)
                            .to(Skill::Table, Skill::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobListingSkill::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Skill::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Skill {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Name,
    Description,
    SkillType,
}

#[derive(DeriveIden)]
enum JobListingSkill {
    Table,
    JobListingId,
    SkillId,
}
