use sea_orm_migration::{
    prelude::*,
    schema::{boolean, pk_uuid, string, string_len, timestamp},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_uuid(User::Id))
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(User::UpdatedAt).default(Expr::current_timestamp()))
                    .col(string(User::Email).unique_key())
                    .col(string(User::Username))
                    .col(string(User::FirstName).default(""))
                    .col(string(User::LastName).default(""))
                    .col(string(User::PasswordHash))
                    .col(string_len(User::Role, 20).default("JOB_SEEKER"))
                    .col(boolean(User::IsStaff).default(false))
                    .col(boolean(User::IsActive).default(true))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum User {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Email,
    Username,
    FirstName,
    LastName,
    PasswordHash,
    Role,
    IsStaff,
    IsActive,
}
