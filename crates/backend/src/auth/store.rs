//! Credential lookup used by the login flow.

use async_trait::async_trait;
use shared_types::User;

use crate::db::{self, users, DbPool};

/// Source of user records for credential checks.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by exact username. `Ok(None)` when no such user exists.
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
}

/// Postgres-backed store; one pooled connection per lookup.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: DbPool,
}

impl PgCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        // The connection goes back to the pool when `conn` drops, whichever way we leave.
        let mut conn = db::get_conn(&self.pool).await?;
        users::get_by_username(&mut conn, username).await
    }
}
