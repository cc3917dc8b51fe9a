mod handlers;
mod pagination;

pub use pagination::Pagination;

use crate::config::Config;
use crate::db::Database;
use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Permissive CORS layer, or `None` when disabled so no CORS headers are
/// emitted at all.
fn cors_layer(enabled: bool) -> Option<CorsLayer> {
    enabled.then(|| {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    })
}

/// Start the API server
pub async fn start_api_server(db: Arc<Database>) -> Result<()> {
    let config = Config::get();

    // Create router with all routes
    let app = Router::new()
        // General routes
        .route("/health", get(handlers::health::health_check))
        // Auth routes
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        // User routes
        .route("/api/users", get(handlers::users::get_users))
        .route("/api/users/me", put(handlers::users::update_me))
        .route("/api/users/:username", get(handlers::users::get_user))
        .route(
            "/api/users/:username/posts",
            get(handlers::posts::get_user_posts),
        )
        // Social graph routes
        .route(
            "/api/users/:username/followers",
            get(handlers::social_graph::get_followers),
        )
        .route(
            "/api/users/:username/following",
            get(handlers::social_graph::get_following),
        )
        .route(
            "/api/users/:username/follow",
            post(handlers::social_graph::follow_user)
                .delete(handlers::social_graph::unfollow_user),
        )
        // Block routes
        .route(
            "/api/users/:username/block",
            post(handlers::blocking::block_user).delete(handlers::blocking::unblock_user),
        )
        .route("/api/blocks", get(handlers::blocking::get_blocks))
        // Post routes
        .route("/api/posts", post(handlers::posts::create_post))
        .route(
            "/api/posts/:id",
            get(handlers::posts::get_post).delete(handlers::posts::delete_post),
        )
        .route("/api/posts/:id/comments", get(handlers::posts::get_comments))
        // Engagement routes
        .route(
            "/api/posts/:id/like",
            post(handlers::engagement::like_post).delete(handlers::engagement::unlike_post),
        )
        .route("/api/posts/:id/likes", get(handlers::engagement::get_likes))
        .route(
            "/api/posts/:id/bookmark",
            post(handlers::engagement::bookmark_post)
                .delete(handlers::engagement::unbookmark_post),
        )
        .route("/api/bookmarks", get(handlers::engagement::get_bookmarks))
        // Feed route
        .route("/api/feed", get(handlers::feed::get_feed))
        // Search route
        .route("/api/search", get(handlers::search::search))
        // Tag routes
        .route("/api/tags/trending", get(handlers::tags::get_trending_tags))
        .route("/api/tags/:name/posts", get(handlers::tags::get_tag_posts))
        // Tracker routes
        .route("/api/trackers", post(handlers::trackers::register_tracker))
        .route(
            "/api/trackers/:token",
            axum::routing::delete(handlers::trackers::delete_tracker),
        )
        // Add state and middleware
        .with_state(db.get_pool().clone())
        .layer(TraceLayer::new_for_http());

    let app = match cors_layer(config.server.enable_cors) {
        Some(cors) => app.layer(cors),
        None => app,
    };

    // Get bind address
    let addr = format!("{}:{}", config.server.host, config.server.port).parse::<SocketAddr>()?;

    // Start server
    info!("Starting API server on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_disabled_adds_no_layer() {
        assert!(cors_layer(false).is_none());
        assert!(cors_layer(true).is_some());
    }
}
