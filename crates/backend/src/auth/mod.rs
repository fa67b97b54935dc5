//! Authentication module for username/password login with JWT bearer tokens.
//!
//! This module provides:
//! - bcrypt password hashing and verification
//! - JWT token issuance and validation
//! - `AuthGateway`, which runs the login and authenticate flows
//! - an `AuthUser` extractor for protecting routes

mod error;
mod extract;
mod gateway;
mod handlers;
mod jwt;
mod password;
mod store;
pub mod types;

pub use error::AuthError;
pub use extract::extract_bearer_token;
pub use gateway::AuthGateway;
pub use handlers::{auth_me, create_user, list_users, login_for_access_token};
pub use jwt::{TokenIssuer, TokenVerifier};
pub use password::PasswordHasher;
pub use store::{CredentialStore, PgCredentialStore};
pub use types::{AuthUser, Credentials};

#[cfg(test)]
pub(crate) use gateway::tests as test_support;
