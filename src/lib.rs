use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod validation;

use database::Store;
use middleware::{auth::require_bearer, log::log_route};

/// Shared handler state. The store is the only stateful collaborator; config
/// and the token secret are read through the config singleton.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

/// Build the full router. Public routes skip the bearer gate; every protected
/// route runs authenticate -> validate -> repository -> envelope.
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/register", post(handlers::auth::register))
        .route_layer(from_fn(log_route));

    let protected = Router::new()
        .route(
            "/categories",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::show)
                .put(handlers::categories::update)
                .delete(handlers::categories::destroy),
        )
        .route(
            "/posts",
            get(handlers::posts::list).post(handlers::posts::create),
        )
        .route(
            "/posts/:id",
            get(handlers::posts::show)
                .put(handlers::posts::update)
                .delete(handlers::posts::destroy),
        )
        .route(
            "/comments",
            get(handlers::comments::list).post(handlers::comments::create),
        )
        .route(
            "/comments/:id",
            get(handlers::comments::show)
                .put(handlers::comments::update)
                .delete(handlers::comments::destroy),
        )
        // The bearer gate is the outer layer so the route log can record the
        // acting identity it injects.
        .route_layer(from_fn(log_route))
        .route_layer(from_fn(require_bearer));

    Router::new()
        .nest("/api", public.merge(protected))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
