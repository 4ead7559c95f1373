//! HaulHub Server — logistics marketplace booking backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use haulhub_core::config::AppConfig;
use haulhub_core::error::AppError;
use haulhub_core::traits::RealtimeBroadcaster;
use haulhub_database::DatabasePool;
use haulhub_database::repositories::booking::BookingRepository;
use haulhub_database::repositories::notification::NotificationRepository;
use haulhub_database::repositories::shipment::ShipmentRepository;
use haulhub_database::repositories::user::UserRepository;
use haulhub_realtime::RealtimeHub;
use haulhub_service::booking::BookingService;
use haulhub_service::notification::NotificationService;
use haulhub_service::shipment::ShipmentService;
use haulhub_service::store::{BookingStore, NotificationStore, ShipmentStore, UserStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("HAULHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting HaulHub v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db = Arc::new(DatabasePool::connect(&config.database).await?);
    db.run_migrations().await?;

    // Repositories, exposed to services through the store traits
    let bookings: Arc<dyn BookingStore> = Arc::new(BookingRepository::new(db.pool().clone()));
    let shipments: Arc<dyn ShipmentStore> = Arc::new(ShipmentRepository::new(db.pool().clone()));
    let notifications: Arc<dyn NotificationStore> =
        Arc::new(NotificationRepository::new(db.pool().clone()));
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));

    // Realtime hub
    let hub = Arc::new(RealtimeHub::new(config.realtime.clone()));
    let broadcaster: Arc<dyn RealtimeBroadcaster> = hub.clone();
    tracing::info!("Realtime hub initialized");

    // Services
    let notification_service =
        NotificationService::new(Arc::clone(&notifications), Arc::clone(&broadcaster));
    let booking_service = BookingService::new(
        Arc::clone(&bookings),
        Arc::clone(&shipments),
        Arc::clone(&users),
        notification_service.clone(),
        Arc::clone(&broadcaster),
    );
    let shipment_service = ShipmentService::new(
        Arc::clone(&shipments),
        Arc::clone(&bookings),
        Arc::clone(&broadcaster),
    );
    tracing::info!("Services initialized");

    // HTTP server
    let app_state = haulhub_api::AppState {
        config: Arc::new(config.clone()),
        db: Arc::clone(&db),
        bookings: booking_service,
        shipments: shipment_service,
        notifications: notification_service,
        hub: Arc::clone(&hub),
    };

    let app = haulhub_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("HaulHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("HaulHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
