use sea_orm_migration::{
    prelude::*,
    schema::{
        boolean, date_null, decimal_len_null, pk_uuid, string_len, string_null, text, timestamp,
        uuid,
    },
};

use super::{m20261018_000001_create_user::User, m20261018_000002_create_company::Company};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobListing::Table)
                    .if_not_exists()
                    .col(pk_uuid(JobListing::Id))
                    .col(timestamp(JobListing::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(JobListing::UpdatedAt).default(Expr::current_timestamp()))
                    .col(string_len(JobListing::Title, 200))
                    .col(uuid(JobListing::CompanyId))
                    .col(uuid(JobListing::PostedBy))
                    .col(text(JobListing::Description))
                    .col(text(JobListing::Requirements))
                    .col(string_len(JobListing::JobType, 20).default("FULL_TIME"))
                    .col(string_len(JobListing::ExperienceLevel, 20).default("ENTRY"))
                    .col(string_len(JobListing::Location, 100))
                    .col(boolean(JobListing::Remote).default(false))
                    .col(decimal_len_null(JobListing::SalaryMin, 10, 2))
                    .col(decimal_len_null(JobListing::SalaryMax, 10, 2))
                    .col(string_null(JobListing::ApplicationUrl))
                    .col(date_null(JobListing::Deadline))
                    .col(boolean(JobListing::IsActive).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-job_listing-company_id")
                            .from(JobListing::Table, JobListing::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-job_listing-posted_by")
                            .from(JobListing::Table, JobListing::PostedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-job_listing-posted_by")
                    .table(JobListing::Table)
                    .col(JobListing::PostedBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-job_listing-is_active")
                    .table(JobListing::Table)
                    .col(JobListing::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobListing::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum JobListing {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Title,
    CompanyId,
    PostedBy,
    Description,
    Requirements,
    JobType,
    ExperienceLevel,
    Location,
    Remote,
    SalaryMin,
    SalaryMax,
    ApplicationUrl,
    Deadline,
    IsActive,
}
