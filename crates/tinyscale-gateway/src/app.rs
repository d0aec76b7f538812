use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, index_handler, resolve_handler, shorten_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/tiny", get(shorten_handler))
            .route("/tiny/", get(shorten_handler))
            .route("/long", get(resolve_handler))
            .route("/long/", get(resolve_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
