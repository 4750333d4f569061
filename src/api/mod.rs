mod handlers;

use std::path::Path;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::db::Database;

pub use handlers::{
    ApiError, ALL_ARTICLES_DELETED, ARTICLE_ADDED, ARTICLE_DELETED, ARTICLE_NOT_FOUND,
    ARTICLE_UPDATED,
};

/// The article collection.
pub const ARTICLES: &str = "/articles";
/// A single article, addressed by its exact title.
pub const ARTICLE: &str = "/articles/{title}";
pub const HEALTH: &str = "/health";

pub fn create_router(db: Database) -> Router {
    with_layers(routes(), db)
}

/// Like [`create_router`], serving files from `static_dir` for any path that
/// is not an API route.
pub fn create_router_with_static(db: Database, static_dir: impl AsRef<Path>) -> Router {
    let routes = routes().fallback_service(ServeDir::new(static_dir));
    with_layers(routes, db)
}

fn routes() -> Router<Database> {
    Router::new()
        // Collection
        .route(ARTICLES, get(handlers::list_articles))
        .route(ARTICLES, post(handlers::create_article))
        .route(ARTICLES, delete(handlers::delete_all_articles))
        // Single article
        .route(ARTICLE, get(handlers::get_article))
        .route(ARTICLE, put(handlers::replace_article))
        .route(ARTICLE, patch(handlers::update_article))
        .route(ARTICLE, delete(handlers::delete_article))
        // Health
        .route(HEALTH, get(handlers::health))
}

fn with_layers(routes: Router<Database>, db: Database) -> Router {
    routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}
