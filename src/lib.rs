use std::sync::Arc;

pub mod auth;
pub mod blog;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

/// The full application router on top of a shared state. Layers that only
/// matter in production (tracing, compression, path normalization) are added
/// in `main`, so tests drive exactly the routes.
pub fn app(state: Arc<state::State>) -> axum::Router {
    routes::route().with_state(state)
}
