//! Process-wide configuration, read from flags or environment variables.

use anyhow::bail;
use clap::Parser;
use std::net::SocketAddr;

use crate::auth::types::AuthConfig;

/// Login tokens live this long unless overridden.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 20;
/// Upper bound on the token lifetime (one week).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-backend")]
#[command(about = "Todo API with username/password login and bearer tokens")]
pub struct AppConfig {
    /// Postgres connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Connect to Postgres through rustls using the webpki root store.
    #[arg(long, env = "DATABASE_TLS", default_value_t = false)]
    pub database_tls: bool,

    /// Do not create missing tables at startup (schema managed with `diesel migration run`).
    #[arg(long, env = "SKIP_MIGRATIONS", default_value_t = false)]
    pub skip_migrations: bool,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    pub db_pool_size: usize,

    /// Symmetric secret used to sign and verify access tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of tokens issued by `POST /auth/token` (1..=10080 minutes).
    #[arg(long, env = "TOKEN_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)]
    pub token_ttl_minutes: i64,

    /// bcrypt work factor for newly hashed passwords (4..=31).
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Address the HTTP server listens on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind_addr: SocketAddr,

    /// Comma-separated list of allowed CORS origins. Permissive when unset.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS")]
    pub cors_allowed_origins: Option<String>,
}

impl AppConfig {
    /// Derive the auth settings, rejecting values that would weaken tokens or hashes.
    pub fn auth_config(&self) -> anyhow::Result<AuthConfig> {
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET cannot be empty");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                self.bcrypt_cost
            );
        }
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.token_ttl_minutes) {
            bail!(
                "TOKEN_TTL_MINUTES must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_MINUTES,
                self.token_ttl_minutes
            );
        }

        Ok(AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl: chrono::Duration::minutes(self.token_ttl_minutes),
            bcrypt_cost: self.bcrypt_cost,
        })
    }
}
