use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::domain::resources::{Campaign, Channel, Hashtag, Idea, Label, Product, Resource};
use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn session() -> Router<AppState> {
    Router::new()
        .route("/v1/context", get(handlers::get_context))
        .route("/v1/permissions", get(handlers::get_permissions))
        .route("/v1/logout", post(handlers::logout))
        .route("/v1/overview", get(handlers::get_overview))
}

pub fn posts() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/v1/posts/calendar", get(handlers::post_calendar))
        .route(
            "/v1/posts/:id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/v1/posts/:id/publish", post(handlers::publish_post))
        .route("/v1/posts/:id/repost", post(handlers::repost_post))
        .route(
            "/v1/posts/:id/comments/:comment_id/reply",
            post(handlers::reply_to_comment),
        )
}

fn resource<R: Resource>() -> Router<AppState> {
    let collection = format!("/v1/{}", R::PATH);
    let item = format!("/v1/{}/:id", R::PATH);

    Router::new()
        .route(
            &collection,
            get(handlers::list_resources::<R>).post(handlers::create_resource::<R>),
        )
        .route(
            &item,
            get(handlers::get_resource::<R>)
                .put(handlers::update_resource::<R>)
                .delete(handlers::delete_resource::<R>),
        )
}

pub fn resources() -> Router<AppState> {
    Router::new()
        .merge(resource::<Campaign>())
        .merge(resource::<Hashtag>())
        .merge(resource::<Idea>())
        .merge(resource::<Label>())
        .merge(resource::<Channel>())
        .merge(resource::<Product>())
        .route("/v1/channels/connect", post(handlers::connect_channel))
}

pub fn sync() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/sync-configs",
            get(handlers::list_sync_configs).post(handlers::create_sync_config),
        )
        .route(
            "/v1/sync-configs/:id",
            axum::routing::put(handlers::update_sync_config)
                .delete(handlers::delete_sync_config),
        )
        .route(
            "/v1/sync-configs/:id/check-permission",
            post(handlers::check_sync_permission),
        )
}

pub fn seeding() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/seeding",
            get(handlers::list_seeding).post(handlers::create_seeding),
        )
        .route(
            "/v1/seeding/:id",
            get(handlers::get_seeding)
                .put(handlers::update_seeding)
                .delete(handlers::delete_seeding),
        )
        .route("/v1/seeding/:id/stats", get(handlers::seeding_stats))
}

pub fn uploads(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/v1/uploads", post(handlers::upload_file))
        .layer(DefaultBodyLimit::max(max_bytes))
}

pub fn generation() -> Router<AppState> {
    Router::new().route("/v1/generate", post(handlers::generate_content))
}
