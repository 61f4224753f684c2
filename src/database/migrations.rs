pub use sea_orm_migration::prelude::*;

mod m20261018_000001_create_user;
mod m20261018_000002_create_company;
mod m20261018_000003_create_job_listing;
mod m20261018_000004_create_job_application;
mod m20261018_000005_create_skill;
mod m20261018_000006_create_user_skill;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261018_000001_create_user::Migration),
            Box::new(m20261018_000002_create_company::Migration),
            Box::new(m20261018_000003_create_job_listing::Migration),
            Box::new(m20261018_000004_create_job_application::Migration),
            Box::new(m20261018_000005_create_skill::Migration),
            Box::new(m20261018_000006_create_user_skill::Migration),
        ]
    }
}

pub struct Migrator;
