use crate::state::NestedRouter;
use axum::routing::get;

mod index;
mod slug;

pub fn route() -> NestedRouter {
    axum::Router::new()
        .route("/", get(index::get))
        .route("/:slug", get(slug::get).post(slug::post))
}
