use crate::blog::User;
use crate::error::Error;
use crate::state::State;
use argon2::{PasswordHasher, PasswordVerifier};
use axum_extra::extract::cookie::CookieJar;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};

pub const SESSION_COOKIE: &str = "session";

// dummy unit tuple so `Auth`s can't be instantiated outside of this file
pub struct Auth(());

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

async fn read_logins(data_dir: &Path) -> std::io::Result<HashMap<String, String>> {
    // TODO: improve the security of storing usernames and passwords
    let file = tokio::fs::File::open(data_dir.join("logins.txt")).await?;
    let reader = tokio::io::BufReader::new(file);
    let mut reader = reader.lines();

    let mut logins = HashMap::new();
    while let Some(line) = reader.next_line().await? {
        let (username, hash) = match line.split_once('\t') {
            Some(pair) => pair,
            None => continue,
        };
        logins.insert(String::from(username), String::from(hash));
    }

    Ok(logins)
}

fn hash_password(password: &str) -> argon2::password_hash::Result<String> {
    let salt =
        argon2::password_hash::SaltString::generate(&mut rand_chacha::ChaCha20Rng::from_entropy());

    Ok(argon2::Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}
fn verify_password(password: &str, hash: &str) -> argon2::password_hash::Result<bool> {
    let hash = argon2::password_hash::PasswordHash::new(hash)?;

    match argon2::Argon2::default().verify_password(password.as_bytes(), &hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(err),
    }
}

impl Auth {
    /// `Ok(Some(Auth))` if valid, `Ok(None)` if invalid, `Err` if logins.txt
    /// could not be read/argon2 verifying failed
    pub async fn validate(
        data_dir: &Path,
        username: &str,
        password: String,
    ) -> Result<Option<Auth>, AuthError> {
        let logins_file = read_logins(data_dir).await?;

        let Some(hash) = logins_file.get(username).cloned() else {
            return Ok(None);
        };

        let password_is_valid =
            tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .expect("task should not panic")?;

        if password_is_valid {
            Ok(Some(Auth(())))
        } else {
            Ok(None)
        }
    }

    /// `Ok(Some(Auth))` if created, `Ok(None)` if the username already exists,
    /// `Err` if logins.txt could not be written/argon2 hashing failed
    pub async fn write_entry(
        data_dir: &Path,
        username: &str,
        password: String,
    ) -> Result<Option<Auth>, AuthError> {
        let logins_file = match read_logins(data_dir).await {
            Ok(it) => it,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        if logins_file.get(username).is_some() {
            return Ok(None);
        }

        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .expect("task should not panic")?;

        tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(data_dir.join("logins.txt"))
            .await?
            .write_all(format!("{username}\t{hash}\n").as_bytes())
            .await?;

        Ok(Some(Auth(())))
    }
}

pub async fn load_user(data_dir: &Path, username: &str) -> Result<Option<User>, AuthError> {
    let file = match tokio::fs::read(data_dir.join("user").join(format!("{username}.json"))).await {
        Ok(it) => it,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    Ok(Some(serde_json::from_slice(&file)?))
}

pub async fn save_user(data_dir: &Path, user: &User) -> Result<(), AuthError> {
    let user_dir = data_dir.join("user");
    tokio::fs::create_dir_all(&user_dir).await?;

    tokio::fs::write(
        user_dir.join(format!("{}.json", user.username)),
        serde_json::to_vec(user)?,
    )
    .await?;

    Ok(())
}

/// Both admin handlers call this before touching anything else. Without a
/// live session the browser is sent to the login form; a valid session that
/// belongs to a non-admin gets a 403 instead.
pub async fn require_admin_user(state: &State, jar: &CookieJar) -> Result<User, Error> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Err(Error::Unauthorized);
    };
    let Some(session) = state.get_session(cookie.value()).await else {
        return Err(Error::Unauthorized);
    };
    let Some(user) = load_user(&state.data_dir, &session.for_username).await? else {
        return Err(Error::Unauthorized);
    };

    if !user.is_admin {
        return Err(Error::Forbidden);
    }

    Ok(user)
}
