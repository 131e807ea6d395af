use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use employee_directory::api::{create_router, AppState};
use employee_directory::config::ConfigLoader;
use employee_directory::logging;
use employee_directory::service::EmployeeService;
use employee_directory::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::from_env()
        .context("Failed to load configuration")?
        .into_config();

    logging::init(&config.logging)?;

    let store = Store::init(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    info!(url = %config.database.url, "Database ready");

    let bind_addr = config.server.bind_addr.clone();
    let state = AppState::new(EmployeeService::new(store.clone()), config);
    state
        .pictures()
        .ensure_directory()
        .await
        .context("Failed to create upload directory")?;

    let app = create_router(state);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!(addr = %bind_addr, "Employee directory listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Closing database connections");
    store.teardown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
