use crate::blog::Slug;
use crate::error::Error;
use crate::routes::html;
use crate::state::SharedState;
use crate::store::{NewPost, PostStore};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

/// The route parameter, parsed exactly once. `"new"` is reserved: it never
/// names a stored post, it means the form is creating one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostRef {
    New,
    Existing(Slug),
}

impl PostRef {
    pub fn from_param(param: &str) -> Result<PostRef, Error> {
        match param {
            "" => Err(Error::MissingSlug),
            "new" => Ok(PostRef::New),
            slug => Ok(PostRef::Existing(String::from(slug))),
        }
    }
}

/// What the submit button asked for. Anything the form doesn't produce is
/// rejected instead of being treated as an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Create,
    Update,
    Delete,
}

impl Intent {
    fn from_field(field: Option<&str>) -> Result<Intent, Error> {
        match field {
            Some("create") => Ok(Intent::Create),
            Some("update") => Ok(Intent::Update),
            Some("delete") => Ok(Intent::Delete),
            Some(other) => Err(Error::UnknownIntent(String::from(other))),
            None => Err(Error::MissingIntent),
        }
    }
}

/// Raw submission, before any validation.
#[derive(Debug, Default, Deserialize)]
pub struct PostForm {
    pub intent: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

/// One entry per required field, `None` when the field was fine.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub slug: Option<&'static str>,
    pub markdown: Option<&'static str>,
}

impl FieldErrors {
    pub fn any(&self) -> bool {
        self.title.is_some() || self.slug.is_some() || self.markdown.is_some()
    }
}

fn required(value: Option<&str>, message: &'static str) -> Option<&'static str> {
    match value {
        Some("") | None => Some(message),
        Some(_) => None,
    }
}

/// A blank field counts the same as a missing one.
pub fn validate(form: &PostForm) -> Result<NewPost, FieldErrors> {
    let errors = FieldErrors {
        title: required(form.title.as_deref(), "Title is required"),
        slug: required(form.slug.as_deref(), "Slug is required"),
        markdown: required(form.markdown.as_deref(), "Markdown is required"),
    };

    match (&form.title, &form.slug, &form.markdown) {
        (Some(title), Some(slug), Some(markdown)) if !errors.any() => Ok(NewPost {
            title: title.clone(),
            slug: slug.clone(),
            markdown: markdown.clone(),
        }),
        _ => Err(errors),
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Mutation done; send the browser back to the admin listing.
    Saved,
    /// Nothing was persisted; show the form again with these messages.
    Invalid(FieldErrors),
}

pub async fn dispatch<S>(
    posts: &S,
    post_ref: &PostRef,
    form: &PostForm,
) -> Result<ActionOutcome, Error>
where
    S: PostStore + ?Sized,
{
    let intent = Intent::from_field(form.intent.as_deref())?;

    if intent == Intent::Delete {
        // no validation and no existence check; the other fields are
        // irrelevant even when filled in
        if let PostRef::Existing(slug) = post_ref {
            posts.delete(slug).await?;
        }
        return Ok(ActionOutcome::Saved);
    }

    let fields = match validate(form) {
        Ok(it) => it,
        Err(errors) => return Ok(ActionOutcome::Invalid(errors)),
    };

    match post_ref {
        PostRef::New => {
            posts.create(fields).await?;
        }
        // keyed by the slug the browser posted to, never by the submitted
        // slug field: the field may be renaming the post
        PostRef::Existing(slug) => {
            posts.update(slug, fields).await?;
        }
    }

    Ok(ActionOutcome::Saved)
}

pub(super) async fn get(
    State(state): SharedState,
    jar: CookieJar,
    Path(param): Path<String>,
) -> Result<Html<String>, Error> {
    crate::auth::require_admin_user(&state, &jar).await?;

    match PostRef::from_param(&param)? {
        PostRef::New => Ok(render_form("", "", "", &FieldErrors::default(), true)),
        PostRef::Existing(slug) => {
            let Some(post) = state.posts.get(&slug).await? else {
                return Err(Error::PostNotFound(slug));
            };

            Ok(render_form(
                &post.title,
                &post.slug,
                &post.markdown,
                &FieldErrors::default(),
                false,
            ))
        }
    }
}

pub(super) async fn post(
    State(state): SharedState,
    jar: CookieJar,
    Path(param): Path<String>,
    Form(form): Form<PostForm>,
) -> Result<Response, Error> {
    crate::auth::require_admin_user(&state, &jar).await?;
    let post_ref = PostRef::from_param(&param)?;

    match dispatch(state.posts.as_ref(), &post_ref, &form).await? {
        ActionOutcome::Saved => Ok(Redirect::to(crate::blog::ADMIN_PATH).into_response()),
        ActionOutcome::Invalid(errors) => Ok(render_form(
            form.title.as_deref().unwrap_or(""),
            form.slug.as_deref().unwrap_or(""),
            form.markdown.as_deref().unwrap_or(""),
            &errors,
            post_ref == PostRef::New,
        )
        .into_response()),
    }
}

fn render_form(
    title: &str,
    slug: &str,
    markdown: &str,
    errors: &FieldErrors,
    is_new: bool,
) -> Html<String> {
    fn inline_error(error: Option<&str>) -> String {
        match error {
            Some(message) => format!("<em>{}</em> ", html::text(message)),
            None => String::new(),
        }
    }

    let heading = if is_new { "New post" } else { "Edit post" };
    let delete_button = if is_new {
        ""
    } else {
        "<button type=\"submit\" name=\"intent\" value=\"delete\">Delete</button>\n"
    };
    let (save_value, save_label) = if is_new {
        ("create", "Create a post")
    } else {
        ("update", "Update")
    };

    html::page(
        heading,
        &format!(
            "<h1>{heading}</h1>\n\
             <form method=\"post\">\n\
             <p><label>Post title: {title_error}\
             <input type=\"text\" name=\"title\" value=\"{title}\"></label></p>\n\
             <p><label>Post slug: {slug_error}\
             <input type=\"text\" name=\"slug\" value=\"{slug}\"></label></p>\n\
             <p><label for=\"markdown\">Markdown: {markdown_error}</label><br>\n\
             <textarea id=\"markdown\" name=\"markdown\" rows=\"20\">{markdown}</textarea></p>\n\
             <p>\n{delete_button}\
             <button type=\"submit\" name=\"intent\" value=\"{save_value}\">{save_label}</button>\n\
             </p>\n\
             </form>",
            title_error = inline_error(errors.title),
            slug_error = inline_error(errors.slug),
            markdown_error = inline_error(errors.markdown),
            title = html::attr(title),
            slug = html::attr(slug),
            markdown = html::text(markdown),
        ),
    )
}
