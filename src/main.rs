use axum::extract::Request;
use axum::ServiceExt;
use blog_admin::{app, auth, blog, state};
use std::sync::Arc;
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let data_dir =
        std::env::var("BLOG_DATA").unwrap_or_else(|_| String::from(blog::DATA_PATH));
    let state = Arc::new(state::State::new(&data_dir));

    bootstrap_admin(&state)
        .await
        .expect("error provisioning the bootstrap admin account");

    let compression = CompressionLayer::new().br(true);
    let app = NormalizePathLayer::trim_trailing_slash()
        .layer(app(state).layer(TraceLayer::new_for_http()).layer(compression));

    let listener = tokio::net::TcpListener::bind(std::net::SocketAddr::from(([0, 0, 0, 0], 8010)))
        .await
        .expect("error binding the listen socket");
    tracing::info!(
        "listening on {}",
        listener.local_addr().expect("socket should have an address")
    );

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .await
        .expect("Error serving app")
}

/// First-run convenience: `BLOG_ADMIN_USER`/`BLOG_ADMIN_PASSWORD` provision an
/// admin account if that username doesn't exist yet. Does nothing otherwise.
async fn bootstrap_admin(state: &state::State) -> Result<(), auth::AuthError> {
    let (Ok(username), Ok(password)) = (
        std::env::var("BLOG_ADMIN_USER"),
        std::env::var("BLOG_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    tokio::fs::create_dir_all(&state.data_dir).await?;

    if auth::Auth::write_entry(&state.data_dir, &username, password)
        .await?
        .is_none()
    {
        // account already provisioned
        return Ok(());
    }

    auth::save_user(
        &state.data_dir,
        &blog::User {
            username: username.clone(),
            name: username.clone(),
            is_admin: true,
        },
    )
    .await?;

    tracing::info!("created bootstrap admin account {username:?}");
    Ok(())
}
