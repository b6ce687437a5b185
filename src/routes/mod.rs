use crate::state::NestedRouter;
use axum::response::Redirect;
use axum::routing::{get, post};

pub mod admin;
pub mod html;
pub mod login;
pub mod posts;

pub fn route() -> NestedRouter {
    axum::Router::new()
        .route("/", get(|| async { Redirect::to("/posts") }))
        .route("/posts", get(posts::index))
        .route("/posts/:slug", get(posts::get))
        .nest("/posts/admin", admin::route())
        .route("/login", get(login::get).post(login::post))
        .route("/logout", post(login::logout))
}
