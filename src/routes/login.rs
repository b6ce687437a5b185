use crate::auth::{self, Auth};
use crate::error::Error;
use crate::state::SharedState;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub(super) async fn get() -> Html<String> {
    render_form(None)
}

pub(super) async fn post(
    State(state): SharedState,
    jar: CookieJar,
    Form(login): Form<LoginForm>,
) -> Result<Response, Error> {
    let auth = match Auth::validate(&state.data_dir, &login.username, login.password).await? {
        Some(it) => it,
        None => return Ok(render_form(Some("Invalid username or password")).into_response()),
    };

    let session_id = state.create_session(login.username, auth).await;
    let cookie = Cookie::build((auth::SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), Redirect::to(crate::blog::ADMIN_PATH)).into_response())
}

pub(super) async fn logout(State(state): SharedState, jar: CookieJar) -> Response {
    let jar = match jar.get(auth::SESSION_COOKIE) {
        Some(cookie) => {
            state.remove_session(cookie.value()).await;
            jar.remove(Cookie::build(auth::SESSION_COOKIE).path("/").build())
        }
        None => jar,
    };

    (jar, Redirect::to("/login")).into_response()
}

fn render_form(message: Option<&str>) -> Html<String> {
    let message = match message {
        Some(message) => format!("<p><em>{}</em></p>\n", super::html::text(message)),
        None => String::new(),
    };

    super::html::page(
        "Log in",
        &format!(
            "<h1>Log in</h1>\n\
             {message}\
             <form method=\"post\">\n\
             <p><label>Username: <input type=\"text\" name=\"username\"></label></p>\n\
             <p><label>Password: <input type=\"password\" name=\"password\"></label></p>\n\
             <p><button type=\"submit\">Log in</button></p>\n\
             </form>"
        ),
    )
}
