use std::{cmp, error::Error, process};

use sea_orm::DatabaseConnection;
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::{
    cli::MigrateAction,
    config::Config,
    database::{migrations::Migrator, setup_database_connection},
};

pub async fn handle_migrate_command(config: &Config, action: MigrateAction) {
    let db = match setup_database_connection(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to the database: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = handle_migration_command(&db, action).await {
        eprintln!("❌ Migration failed: {e}");
        process::exit(1);
    }
}

fn print_names<'a>(header: &str, names: impl Iterator<Item = &'a str>) {
    println!("{header}");
    for name in names {
        println!("  📄 {name}");
    }
    println!();
}

/// Names of applied migrations, oldest first.
async fn applied(db: &DatabaseConnection) -> Result<Vec<String>, Box<dyn Error>> {
    Ok(Migrator::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect())
}

async fn pending(db: &DatabaseConnection) -> Result<Vec<String>, Box<dyn Error>> {
    Ok(Migrator::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect())
}

/// The last `steps` applied migrations, newest first.
fn newest(applied: &[String], steps: u32) -> impl Iterator<Item = &str> {
    let count = cmp::min(steps as usize, applied.len());
    applied[applied.len() - count..]
        .iter()
        .rev()
        .map(String::as_str)
}

pub async fn handle_migration_command(
    db: &DatabaseConnection,
    action: MigrateAction,
) -> Result<(), Box<dyn Error>> {
    match action {
        MigrateAction::Up { steps } => {
            let pending = pending(db).await?;
            if pending.is_empty() {
                println!("✅ All migrations are already up to date");
                return Ok(());
            }

            let count = steps.map_or(pending.len(), |s| cmp::min(s as usize, pending.len()));
            print_names(
                &format!("Running {count} migration(s) up:"),
                pending.iter().take(count).map(String::as_str),
            );

            Migrator::up(db, steps).await?;
            println!("✅ Migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            let applied = applied(db).await?;
            if applied.is_empty() {
                println!("❌ No migrations to roll back");
                return Ok(());
            }

            print_names("Rolling back migrations:", newest(&applied, steps));

            Migrator::down(db, Some(steps)).await?;
            println!("✅ Rollback completed successfully");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_migration_with_status(db).await? {
                let marker = match migration.status() {
                    MigrationStatus::Applied => "✓",
                    MigrationStatus::Pending => "-",
                };
                println!("  {marker} {}", migration.name());
            }
        }
        MigrateAction::Reset => {
            println!("🔄 Resetting database (this will drop all data!)...");

            Migrator::reset(db).await?;
            Migrator::up(db, None).await?;

            print_names("Applied migrations:", applied(db).await?.iter().map(String::as_str));
            println!("✅ Database reset completed successfully");
        }
        MigrateAction::Reapply { steps } => {
            let applied = applied(db).await?;
            if applied.is_empty() {
                println!("❌ No migrations to reapply");
                return Ok(());
            }

            print_names("🔄 Reapplying migrations:", newest(&applied, steps));

            Migrator::down(db, Some(steps)).await?;
            Migrator::up(db, Some(steps)).await?;
            println!("✅ Reapply completed successfully");
        }
    }

    Ok(())
}
