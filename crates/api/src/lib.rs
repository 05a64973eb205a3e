//! HTTP API server with observability for the storefront.
//!
//! Provides REST endpoints for the product catalog and order placement,
//! with structured logging (tracing) and Prometheus metrics. Handlers
//! are generic over the storage backend, so the same router serves the
//! PostgreSQL deployment and the in-memory tests.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout::CheckoutWorkflow;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{OrderStore, ProductStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState<P: ProductStore, O: OrderStore> {
    pub products: P,
    pub orders: O,
    pub checkout: CheckoutWorkflow<P, O>,
}

/// Creates the application state over the given storage backends.
pub fn create_state<P, O>(products: P, orders: O) -> Arc<AppState<P, O>>
where
    P: ProductStore + Clone + 'static,
    O: OrderStore + Clone + 'static,
{
    let checkout = CheckoutWorkflow::new(products.clone(), orders.clone());
    Arc::new(AppState {
        products,
        orders,
        checkout,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<P, O>(state: Arc<AppState<P, O>>, metrics_handle: PrometheusHandle) -> Router
where
    P: ProductStore + Clone + 'static,
    O: OrderStore + Clone + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", post(routes::products::create::<P, O>))
        .route("/products", get(routes::products::list::<P, O>))
        .route("/orders", post(routes::orders::create::<P, O>))
        .route("/orders/{user_id}", get(routes::orders::list_by_user::<P, O>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
