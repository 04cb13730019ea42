//! User model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of a generated API key in hex characters.
pub const API_KEY_LENGTH: usize = 64;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Secret presented as `Authorization: ApiKey <key>`.
    pub api_key: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// New user for creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// API key; generated when not supplied.
    pub api_key: String,
}

impl NewUser {
    /// Create a new user with a freshly generated API key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: generate_api_key(),
        }
    }

    /// Use a specific API key instead of a generated one.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }
}

/// Generate a random API key: SHA-256 of 32 random bytes, hex encoded.
pub fn generate_api_key() -> String {
    let seed: [u8; 32] = rand::random();
    format!("{:x}", Sha256::digest(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_api_key_format() {
        let key = generate_api_key();
        assert_eq!(key.len(), API_KEY_LENGTH);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_api_key_unique() {
        assert_ne!(generate_api_key(), generate_api_key());
    }

    #[test]
    fn test_new_user() {
        let user = NewUser::new("alice");
        assert_eq!(user.name, "alice");
        assert_eq!(user.api_key.len(), API_KEY_LENGTH);

        let user = NewUser::new("bob").with_api_key("fixed");
        assert_eq!(user.api_key, "fixed");
    }
}
