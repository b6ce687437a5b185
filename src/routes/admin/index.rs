use crate::error::Error;
use crate::routes::html;
use crate::state::SharedState;
use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;
use std::fmt::Write;

pub(super) async fn get(State(state): SharedState, jar: CookieJar) -> Result<Html<String>, Error> {
    crate::auth::require_admin_user(&state, &jar).await?;

    let mut posts = state.posts.list().await?;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut items = String::new();
    for post in &posts {
        let _ = write!(
            items,
            "<li><a href=\"/posts/admin/{}\">{}</a></li>\n",
            urlencoding::encode(&post.slug),
            html::text(&post.title),
        );
    }

    Ok(html::page(
        "Manage posts",
        &format!(
            "<h1>Manage posts</h1>\n\
             <ul>\n{items}</ul>\n\
             <p><a href=\"/posts/admin/new\">Create a new post</a></p>"
        ),
    ))
}
