use sea_orm_migration::{
    prelude::*,
    schema::{pk_uuid, string_len, string_null, text_null, timestamp, uuid},
};

use super::{m20261018_000001_create_user::User, m20261018_000003_create_job_listing::JobListing};
use crate::database::models::job_application::JOB_APPLICANT_INDEX;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobApplication::Table)
                    .if_not_exists()
                    .col(pk_uuid(JobApplication::Id))
                    .col(timestamp(JobApplication::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(JobApplication::UpdatedAt).default(Expr::current_timestamp()))
                    .col(uuid(JobApplication::JobId))
                    .col(uuid(JobApplication::ApplicantId))
                    .col(string_null(JobApplication::Resume))
                    .col(text_null(JobApplication::CoverLetter))
                    .col(string_len(JobApplication::Status, 10).default("APPLIED"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-job_application-job_id")
                            .from(JobApplication::Table, JobApplication::JobId)
                            .to(JobListing::Table, JobListing::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-job_application-applicant_id")
                            .from(JobApplication::Table, JobApplication::ApplicantId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per applicant and job, enforced by the database
        manager
            .create_index(
                Index::create()
                    .name(JOB_APPLICANT_INDEX)
                    .table(JobApplication::Table)
                    .col(JobApplication::JobId)
                    .col(JobApplication::ApplicantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-job_application-applicant_id")
                    .table(JobApplication::Table)
                    .col(JobApplication::ApplicantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobApplication::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JobApplication {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    JobId,
    ApplicantId,
    Resume,
    CoverLetter,
    Status,
}
