use axum::http::{header, Method};
use dotenvy::dotenv;
use phonebook_notes::{
    config::Config,
    create_router,
    logging::{http_trace_layer, init_logging},
    store::{MemoryStore, PgStore, Store},
    AppState,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    let _ = dotenv();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    init_logging(&config);

    let store: Arc<dyn Store> = match &config.database_url {
        Some(database_url) => match connect(database_url, config.max_connections).await {
            Ok(store) => {
                tracing::info!("✅Connection to the database is successful!");
                Arc::new(store)
            }
            Err(err) => {
                tracing::error!("🔥 Failed to connect to the database: {}", err);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("DATABASE_URL is not set, data will only live in memory");
            Arc::new(MemoryStore::new())
        }
    };

    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "serving static assets");
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    let app_state = Arc::new(AppState::new(store.clone(), config.static_dir.clone()));
    let app = create_router(app_state)
        .layer(http_trace_layer())
        .layer(cors);

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), config.port);
    tracing::info!("🚀 Server running on port {}", config.port);
    let served = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    if let Err(err) = served {
        tracing::error!("🔥 Server error: {}", err);
        std::process::exit(1);
    }
}

async fn connect(database_url: &str, max_connections: u32) -> Result<PgStore, String> {
    let store = PgStore::connect(database_url, max_connections)
        .await
        .map_err(|e| e.to_string())?;
    store
        .migrate()
        .await
        .map_err(|e| format!("migrations failed: {}", e))?;
    Ok(store)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", err);
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
                tracing::error!("failed to listen for SIGTERM: {}", err);
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

    tracing::info!("shutdown signal received");
}
