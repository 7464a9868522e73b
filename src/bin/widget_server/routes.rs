//! HTTP route registration for the widget server.

use axum::Router;
use axum::routing::{get, patch, post};

use super::*;

pub(super) fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/v1/widgets/:widget_id/items/query", post(query_items))
        .route(
            "/v1/widgets/:widget_id/items/:item_id/status/next",
            post(next_status),
        )
        .route(
            "/v1/widgets/:widget_id/items/:item_id/status",
            patch(set_status),
        )
        .fallback(unknown_route)
        .method_not_allowed_fallback(wrong_method)
        .with_state(state)
}
