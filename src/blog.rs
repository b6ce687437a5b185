use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Primary key of a post. Mutable through the edit form: an update may
/// re-key the post under a new slug.
pub type Slug = String;
pub type SessionID = String;

pub const DATA_PATH: &str = "/var/lib/blog-admin";

/// Where the browser lands after any successful admin mutation.
pub const ADMIN_PATH: &str = "/posts/admin";

pub const SESSION_ID_BYTES: usize = 32;
pub const SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: Slug,
    pub title: String,
    pub markdown: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub is_admin: bool,
}

pub fn get_random_hex_string<const LEN: usize>() -> String {
    let mut bytes = [0u8; LEN];
    rand_chacha::ChaCha20Rng::from_entropy().fill_bytes(&mut bytes);

    bytes.iter().fold(String::new(), |mut output, b| {
        let _ = write!(output, "{b:02x}");
        output
    })
}
