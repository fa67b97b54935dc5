//! Login and bearer-token authentication over the store, hasher and token services.

use std::sync::Arc;

use chrono::Duration;

use super::error::AuthError;
use super::jwt::{TokenIssuer, TokenVerifier};
use super::password::PasswordHasher;
use super::store::CredentialStore;
use super::types::{AuthConfig, AuthUser, Credentials, TokenResponse};

/// Plaintext behind the digest checked when the username is unknown.
const DUMMY_PASSWORD: &str = "no-such-user-placeholder";

/// Entry point for the two auth flows.
///
/// Holds only read-only state, so one instance is shared by every request.
#[derive(Clone)]
pub struct AuthGateway {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    token_ttl: Duration,
    /// Same cost as real digests, so a miss costs as much as a wrong password.
    dummy_digest: Arc<str>,
}

impl AuthGateway {
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let dummy_digest = hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            hasher,
            issuer: TokenIssuer::new(&config.jwt_secret),
            verifier: TokenVerifier::new(&config.jwt_secret),
            token_ttl: config.token_ttl,
            dummy_digest: dummy_digest.into(),
        })
    }

    /// Check a username/password pair and issue an access token.
    ///
    /// Unknown users and wrong passwords both yield `InvalidCredentials`,
    /// and both pay for one bcrypt verification.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, AuthError> {
        let user = self
            .store
            .find_by_username(&credentials.username)
            .await
            .map_err(AuthError::Store)?;

        let digest = match &user {
            Some(user) => user.hashed_password.clone(),
            None => self.dummy_digest.to_string(),
        };
        let password_matches = self.verify_password(&credentials.password, digest).await?;

        let user = match user {
            Some(user) if password_matches => user,
            _ => {
                tracing::warn!("Failed login attempt for: {}", credentials.username);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.issuer.issue(&user.username, user.id, self.token_ttl)?;

        tracing::info!("Successful login for: {}", user.username);
        Ok(TokenResponse::bearer(token))
    }

    /// Resolve a bearer token to the caller's identity.
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.verifier.verify(token)
    }

    /// Hash a password for storage on registration.
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password)).await?
    }

    /// bcrypt is CPU-bound for tens of milliseconds; keep it off the async workers.
    async fn verify_password(&self, password: &str, digest: String) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        let password = password.to_string();
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&password, &digest)).await?)
    }
}
