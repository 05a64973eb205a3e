//! API server entry point.

use api::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use store::{
    InMemoryOrderStore, InMemoryProductStore, OrderStore, PgOrderStore, PgProductStore,
    ProductStore,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Builds the router over the given stores and runs it to completion.
async fn serve<P, O>(products: P, orders: O, addr: &str, metrics_handle: PrometheusHandle)
where
    P: ProductStore + Clone + 'static,
    O: OrderStore + Clone + 'static,
{
    let state = api::create_state(products, orders);
    let app = api::create_app(state, metrics_handle);

    tracing::info!(%addr, "starting API server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the storage backend and start serving
    let addr = config.addr();
    match config.database_url {
        Some(ref url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .expect("failed to connect to database");
            store::run_migrations(&pool)
                .await
                .expect("failed to run migrations");

            serve(
                PgProductStore::new(pool.clone()),
                PgOrderStore::new(pool),
                &addr,
                metrics_handle,
            )
            .await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            serve(
                InMemoryProductStore::new(),
                InMemoryOrderStore::new(),
                &addr,
                metrics_handle,
            )
            .await;
        }
    }
}
