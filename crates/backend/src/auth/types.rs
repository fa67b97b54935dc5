//! Auth-related types and configuration.

use serde::{Deserialize, Serialize};

// Re-export shared types for convenience
pub use shared_types::{AuthUserResponse, TokenResponse};

/// JWT Claims structure
///
/// `sub` and `id` are optional so that tokens lacking them decode and can be
/// rejected as unauthenticated rather than as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: Option<String>,
    /// User id
    pub id: Option<i32>,
    /// Expiration timestamp
    pub exp: i64,
}

/// Validated caller identity, projected from token claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub user_id: i32,
}

impl From<AuthUser> for AuthUserResponse {
    fn from(user: AuthUser) -> Self {
        AuthUserResponse {
            username: user.username,
            id: user.user_id,
        }
    }
}

/// Transient login input; never persisted or logged.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Auth configuration handed to the gateway at construction
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}
