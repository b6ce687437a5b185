use crate::blog::Slug;
use crate::routes::html;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// Request-level failures. Validation problems with the post form are not
/// errors: they come back as a regular page re-render with inline messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("login required")]
    Unauthorized,
    #[error("admin access required")]
    Forbidden,
    #[error("slug parameter is missing")]
    MissingSlug,
    #[error("no post with slug {0:?}")]
    PostNotFound(Slug),
    #[error("the form did not include an intent")]
    MissingIntent,
    #[error("unrecognized intent {0:?}")]
    UnknownIntent(String),
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),
    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Unauthorized => Redirect::to("/login").into_response(),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                html::page("Forbidden", "<h1>Forbidden</h1><p>This page is for admins.</p>"),
            )
                .into_response(),
            Error::MissingSlug => (
                StatusCode::BAD_REQUEST,
                html::page("Bad request", "<h1>Bad request</h1><p>No slug was given.</p>"),
            )
                .into_response(),
            Error::PostNotFound(slug) => (
                StatusCode::NOT_FOUND,
                html::page(
                    "Not found",
                    &format!(
                        "<h1>Not found</h1><p>Uh oh! No post with the slug \"{}\" exists!</p>",
                        html::text(&slug)
                    ),
                ),
            )
                .into_response(),
            Error::MissingIntent => (
                StatusCode::BAD_REQUEST,
                html::page(
                    "Bad request",
                    "<h1>Bad request</h1><p>The form did not include an intent.</p>",
                ),
            )
                .into_response(),
            Error::UnknownIntent(intent) => (
                StatusCode::BAD_REQUEST,
                html::page(
                    "Bad request",
                    &format!(
                        "<h1>Bad request</h1><p>\"{}\" is not something this form can do.</p>",
                        html::text(&intent)
                    ),
                ),
            )
                .into_response(),
            Error::Auth(err) => {
                tracing::error!("credential check failed: {err}");
                internal_error_response()
            }
            Error::Store(err) => {
                tracing::error!("post store failure: {err}");
                internal_error_response()
            }
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        html::page(
            "Something went wrong",
            "<h1>Something went wrong</h1><p>Try again in a moment.</p>",
        ),
    )
        .into_response()
}
