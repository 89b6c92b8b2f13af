use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::AppState;

mod auth;
mod error;
mod handlers;
mod routes;

pub use auth::AuthSession;
pub use error::AppError;

pub fn router(state: AppState) -> Router {
    let upload_limit = state.upload_max_bytes;

    Router::new()
        .merge(routes::health())
        .merge(routes::session())
        .merge(routes::posts())
        .merge(routes::resources())
        .merge(routes::sync())
        .merge(routes::seeding())
        .merge(routes::uploads(upload_limit))
        .merge(routes::generation())
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
