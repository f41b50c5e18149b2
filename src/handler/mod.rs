pub mod health;
pub mod media;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

/// Full application router. Every route rejects bodies above `max_upload_bytes`
/// with 413: declared lengths up front, streamed bodies while they are read.
pub fn app(state: Arc<AppState>) -> Router {
    let limit = usize::try_from(state.settings().max_upload_bytes).unwrap_or(usize::MAX);

    Router::new()
        .merge(health::routes(state.clone()))
        .merge(media::routes(state))
        .layer(DefaultBodyLimit::max(limit))
        .layer(RequestBodyLimitLayer::new(limit))
}
