use time::format_description::parse;
use tracing_subscriber::{filter::Directive, fmt::time::OffsetTime, EnvFilter};

use crate::cli::Commands;

/// Noisy dependencies that only get to speak up at `warn`.
const QUIET_TARGETS: [&str; 2] = [
    "sqlx::postgres::notice=warn",
    "sea_orm_migration::migrator=warn",
];

pub fn setup_tracing_for_command(command: &Option<Commands>, server_log_level: &str) {
    // RUST_LOG wins over these defaults.
    let default_level = match command {
        Some(Commands::Migrate { .. } | Commands::CreateAdmin { .. }) => "warn",
        Some(Commands::Version | Commands::GenerateJwtSecret) => "error",
        Some(Commands::Serve) | None => server_log_level,
    };

    let env_filter = QUIET_TARGETS
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
            EnvFilter::add_directive,
        );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_ansi(true);

    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    match parse("[hour]:[minute]:[second].[subsecond digits:2]") {
        Ok(format) => builder
            .with_timer(OffsetTime::new(offset, format))
            .compact()
            .init(),
        Err(_) => builder.compact().init(),
    }
}
