//! Authentication failures and their HTTP mapping.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::ErrorResponse;

/// Body detail for rejected logins.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Could not validate user";
/// Body detail for rejected bearer tokens.
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate user.";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; the two are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, mis-signed or expired bearer token.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Token could not be serialized or signed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Password could not be hashed.
    #[error("failed to hash password: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Token expiry falls outside the representable time range.
    #[error("token lifetime out of range")]
    TokenLifetime,

    /// Credential store lookup failed.
    #[error("credential store error: {0}")]
    Store(#[source] anyhow::Error),

    /// A blocking bcrypt task panicked or was cancelled.
    #[error("password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            AuthError::Unauthenticated => UNAUTHENTICATED_MESSAGE,
            AuthError::Signing(_)
            | AuthError::Hashing(_)
            | AuthError::TokenLifetime
            | AuthError::Store(_)
            | AuthError::Task(_) => {
                tracing::error!("Auth internal error: {:?}", self);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Internal server error".to_string(),
                        details: None,
                    }),
                )
                    .into_response();
            }
        };

        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(ErrorResponse {
                error: message.to_string(),
                details: None,
            }),
        )
            .into_response()
    }
}
