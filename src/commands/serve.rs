use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    api::health_checks::ok, app::App, config::Config, database::setup_database,
    environment::Environment, router::router,
};

pub async fn handle_serve_command(environment: Environment, config: Config) {
    let port = config.server.port;

    // Answer liveness checks while migrations run.
    let liveness_server_task = tokio::spawn(start_liveness_server(port));

    let (db, migration_receiver) = match setup_database(&config.database).await {
        Ok(setup) => setup,
        Err(e) => {
            error!("❌ Failed to connect to the database: {}", e);
            liveness_server_task.abort();
            return;
        }
    };

    match migration_receiver.await {
        Ok(Ok(())) => {
            info!("✅ Database is ready!");
        }
        Ok(Err(e)) => {
            error!("❌ Database setup failed: {}", e);
            liveness_server_task.abort();
            return;
        }
        Err(_) => {
            error!("❌ Database setup channel closed unexpectedly");
            liveness_server_task.abort();
            return;
        }
    }

    let app = App {
        config,
        environment,
        db,
    };

    // The full server takes over the port.
    liveness_server_task.abort();
    let _ = liveness_server_task.await;

    start_server(router(app), port).await;
}

async fn bind(port: u16) -> Option<(TcpListener, SocketAddr)> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    match TcpListener::bind(addr).await {
        Ok(listener) => Some((listener, addr)),
        Err(e) => {
            error!("❌ Failed to bind {}: {}", addr, e);
            None
        }
    }
}

async fn start_liveness_server(port: u16) {
    let Some((listener, _)) = bind(port).await else {
        return;
    };

    let migration_router = Router::new().route("/liveness", get(ok));
    if let Err(e) = axum::serve(listener, migration_router).await {
        error!("Liveness server stopped: {}", e);
    }
}

async fn start_server(router: Router, port: u16) {
    let Some((listener, addr)) = bind(port).await else {
        return;
    };

    info!("🌐 Server starting on http://{}", addr);
    if let Err(e) = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!("Server stopped: {}", e);
    }
}
