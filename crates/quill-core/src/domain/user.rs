use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Filename recorded for accounts that never uploaded a profile picture.
/// The file itself ships with the frontend; it is never written or deleted.
pub const DEFAULT_AVATAR: &str = "default.jpg";

/// User entity - an account that can log in and author posts.
///
/// `name`, `nickname` and `email` are each unique across the store.
/// `name` is the login name; `nickname` is the handle used in public URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_filename: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new regular user with generated ID and timestamps.
    ///
    /// Admin accounts are provisioned from configuration at startup,
    /// never through this constructor.
    pub fn new(name: String, nickname: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            nickname,
            email,
            password_hash,
            avatar_filename: DEFAULT_AVATAR.to_string(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// True while the account still wears the default profile picture.
    pub fn has_default_avatar(&self) -> bool {
        self.avatar_filename == DEFAULT_AVATAR
    }
}
