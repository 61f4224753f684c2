use sea_orm_migration::{
    prelude::*,
    schema::{pk_uuid, string_len, string_len_null, string_null, text_null, timestamp},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(pk_uuid(Company::Id))
                    .col(timestamp(Company::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Company::UpdatedAt).default(Expr::current_timestamp()))
                    .col(string_len(Company::Name, 200))
                    .col(text_null(Company::Description))
                    .col(string_null(Company::Website))
                    .col(string_len_null(Company::Location, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-company-name")
                    .table(Company::Table)
                    .col(Company::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Company::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Company {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Name,
    Description,
    Website,
    Location,
}
