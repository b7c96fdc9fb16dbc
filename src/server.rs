use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::constants::FETCH_FAILED_MESSAGE;
use crate::service::PriceService;

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "price-index",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus exposition of the recorded counters
async fn metrics_text() -> impl IntoResponse {
    match crate::metrics::render() {
        Some(body) => (StatusCode::OK, body).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

/// Today's catalog, falling back to yesterday's bulletin. Failures are
/// reported as a JSON error body, details stay in the logs.
async fn prices(Extension(service): Extension<Arc<PriceService>>) -> impl IntoResponse {
    match service.get_prices().await {
        Ok(data) => (StatusCode::OK, Json(serde_json::json!({ "data": data }))).into_response(),
        Err(e) => {
            error!("Price lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": FETCH_FAILED_MESSAGE })),
            )
                .into_response()
        }
    }
}

pub fn create_server(service: Arc<PriceService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/prices", get(prices))
        .route("/metrics", get(metrics_text))
        .layer(Extension(service))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified port
pub async fn start_server(service: Arc<PriceService>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server listening on {}", addr);
    println!("🚀 HTTP server running on http://localhost:{port}");
    println!("💚 Health check: http://localhost:{port}/health");
    println!("🧾 Prices:       http://localhost:{port}/api/prices");
    println!("📈 Metrics:      http://localhost:{port}/metrics");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
