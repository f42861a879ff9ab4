use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handlers::{self, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/send-whatsapp-text", post(handlers::send_text))
        .route("/send-whatsapp-img", post(handlers::send_image))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
