use axum::{
    Router,
    routing::{any, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::api;
use crate::state::AppState;
use std::sync::Arc;

/// Create the HTTP router
///
/// - `GET /` - health check
/// - `ANY /incoming-call-eleven` - TwiML webhook for inbound and answered outbound calls
/// - `POST /make-outbound-call` - dial a number and connect it to the agent
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/incoming-call-eleven", any(api::incoming_call))
        .route("/make-outbound-call", post(api::outbound_call))
        .layer(TraceLayer::new_for_http())
}
