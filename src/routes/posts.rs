use crate::blog::Slug;
use crate::error::Error;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::response::Html;
use std::fmt::Write;

pub(super) async fn index(State(state): SharedState) -> Result<Html<String>, Error> {
    let mut posts = state.posts.list().await?;
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut items = String::new();
    for post in &posts {
        let _ = write!(
            items,
            "<li><a href=\"/posts/{}\">{}</a></li>\n",
            urlencoding::encode(&post.slug),
            super::html::text(&post.title),
        );
    }

    Ok(super::html::page(
        "Posts",
        &format!("<h1>Posts</h1>\n<ul>\n{items}</ul>"),
    ))
}

pub(super) async fn get(
    State(state): SharedState,
    Path(slug): Path<Slug>,
) -> Result<Html<String>, Error> {
    let Some(post) = state.posts.get(&slug).await? else {
        return Err(Error::PostNotFound(slug));
    };

    let title = post.title;
    let markdown = post.markdown;
    let body = tokio::task::spawn_blocking(move || {
        comrak::markdown_to_html(&markdown, &comrak::Options::default())
    })
    .await
    .expect("task should not panic");

    Ok(super::html::page(
        &title,
        &format!("<h1>{}</h1>\n{body}", super::html::text(&title)),
    ))
}
