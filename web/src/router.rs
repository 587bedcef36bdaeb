//! Route table.

use crate::handlers::{actors, config, health, metrics, tickets};
use crate::middleware::request_id;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete router.
///
/// Routes:
///
/// - `/config/init-config`, `/config/set-config`, `/config/get-config`
/// - `/tickets/add-tickets`, `/tickets/purchase-tickets`, `/tickets/status`
/// - `/vendors`, `/customers`
/// - `/health`, `/health/ready`, `/metrics`
pub fn build_router(state: AppState) -> Router {
    let config_routes = Router::new()
        .route("/init-config", post(config::init_config))
        .route("/set-config", post(config::set_config))
        .route("/get-config", get(config::get_config));

    let ticket_routes = Router::new()
        .route("/add-tickets", post(tickets::add_tickets))
        .route("/purchase-tickets", post(tickets::purchase_tickets))
        .route("/status", get(tickets::pool_status));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/metrics", get(metrics::render_metrics))
        .route("/vendors", post(actors::register_vendor))
        .route("/customers", post(actors::register_customer))
        .nest("/config", config_routes)
        .nest("/tickets", ticket_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
