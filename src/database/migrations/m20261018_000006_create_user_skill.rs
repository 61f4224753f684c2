use sea_orm_migration::{
    prelude::*,
    schema::{boolean, pk_uuid, small_integer, string_len, string_len_null, timestamp, uuid, uuid_null},
};

use super::{m20261018_000001_create_user::User, m20261018_000005_create_skill::Skill};
use crate::database::models::user_skill::{USER_CUSTOM_SKILL_INDEX, USER_SKILL_INDEX};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSkill::Table)
                    .if_not_exists()
                    .col(pk_uuid(UserSkill::Id))
                    .col(timestamp(UserSkill::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(UserSkill::UpdatedAt).default(Expr::current_timestamp()))
                    .col(uuid(UserSkill::UserId))
                    .col(uuid_null(UserSkill::SkillId))
                    .col(string_len_null(UserSkill::CustomName, 100))
                    .col(string_len_null(UserSkill::CustomType, 10))
                    .col(small_integer(UserSkill::Proficiency).default(3))
                    .col(boolean(UserSkill::Verified).default(false))
                    .col(string_len(UserSkill::Source, 20).default("MANUAL"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_skill-user_id")
                            .from(UserSkill::Table, UserSkill::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_skill-skill_id")
                            .from(UserSkill::Table, UserSkill::SkillId)
                            .to(Skill::Table, Skill::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // NULLs are distinct, so catalogue and custom entries only collide with their own kind
        manager
            .create_index(
                Index::create()
                    .name(USER_SKILL_INDEX)
                    .table(UserSkill::Table)
                    .col(UserSkill::UserId)
                    .col(UserSkill::SkillId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(USER_CUSTOM_SKILL_INDEX)
                    .table(UserSkill::Table)
                    .col(UserSkill::UserId)
                    .col(UserSkill::CustomName)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSkill::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserSkill {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    UserId,
    SkillId,
    CustomName,
    CustomType,
    Proficiency,
    Verified,
    Source,
}
