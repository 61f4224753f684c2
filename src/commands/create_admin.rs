use std::process;

use tracing::info;

use crate::{
    config::Config,
    database::models::role::Role,
    database::setup_database,
    services::accounts::{create_account, NewAccount},
};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Create an `ADMIN` account with staff access.
///
/// Registration never hands out the admin role, so this is the only way to get
/// one. Pending migrations are applied first.
pub async fn handle_create_admin_command(
    config: &Config,
    email: String,
    username: String,
    password: String,
) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        eprintln!("❌ Password must be at least {MIN_PASSWORD_LENGTH} characters long");
        process::exit(1);
    }

    let db = match setup_database(&config.database).await {
        Ok((db, migrations)) => match migrations.await {
            Ok(Ok(())) => db,
            Ok(Err(e)) => {
                eprintln!("❌ Failed to migrate the database: {e}");
                process::exit(1);
            }
            Err(_) => {
                eprintln!("❌ Database setup channel closed unexpectedly");
                process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("❌ Failed to connect to the database: {e}");
            process::exit(1);
        }
    };

    let account = NewAccount {
        email,
        username,
        password,
        first_name: String::new(),
        last_name: String::new(),
        role: Role::Admin,
        is_staff: true,
    };

    match create_account(&db, account).await {
        Ok(user) => {
            info!(user_id = %user.id, "Administrator created");
            println!("✅ Created administrator {} ({})", user.email, user.id);
        }
        Err(e) => {
            eprintln!("❌ Failed to create administrator: {e}");
            process::exit(1);
        }
    }
}
