use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::services::AnalyticsService;

/// Create routes for the analytics feature
///
/// Note: This feature requires authentication
pub fn routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route("/api/analytics", get(handlers::get_summary))
        .with_state(service)
}
