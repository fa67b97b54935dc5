use anyhow::Context;
use diesel::prelude::*;
use diesel_async::{
    pooled_connection::{
        deadpool::{Object, Pool, PoolError},
        AsyncDieselConnectionManager, ManagerConfig,
    },
    AsyncPgConnection, RunQueryDsl, SimpleAsyncConnection,
};
use shared_types::{Todo, User};

use crate::config::AppConfig;
use crate::models::{NewTodo, NewUser, TodoChanges};

pub type DbPool = Pool<AsyncPgConnection>;
pub type DbConn = Object<AsyncPgConnection>;

async fn establish_tls_connection(config: String) -> diesel::ConnectionResult<AsyncPgConnection> {
    // Set up rustls TLS configuration
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

    let (client, connection) = tokio_postgres::connect(&config, tls)
        .await
        .map_err(|e| diesel::ConnectionError::BadConnection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Connection error: {}", e);
        }
    });

    AsyncPgConnection::try_from(client).await
}

/// Build the connection pool. No connection is opened until the first checkout.
pub fn establish_connection_pool(config: &AppConfig) -> anyhow::Result<DbPool> {
    let manager = if config.database_tls {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup =
            Box::new(|url| Box::pin(establish_tls_connection(url.to_string())));
        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
            &config.database_url,
            manager_config,
        )
    } else {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url)
    };

    let pool = Pool::builder(manager)
        .max_size(config.db_pool_size)
        .build()?;

    Ok(pool)
}

/// Check a connection out of the pool.
///
/// The returned guard hands the connection back to the pool when dropped,
/// on success and error paths alike.
pub async fn get_conn(pool: &DbPool) -> Result<DbConn, PoolError> {
    pool.get().await
}

/// Whether an error came from a unique constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<diesel::result::Error>(),
        Some(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        ))
    )
}

/// Schema DDL in application order. Every statement is `IF NOT EXISTS`, so
/// reapplying is a no-op and the diesel CLI can still run the same files.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "create_users",
        include_str!("../migrations/2024-01-01-000000_create_users/up.sql"),
    ),
    (
        "create_todos",
        include_str!("../migrations/2024-01-02-000000_create_todos/up.sql"),
    ),
];

/// Create any missing tables.
pub async fn apply_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = get_conn(pool).await?;
    for (name, sql) in MIGRATIONS {
        conn.batch_execute(sql)
            .await
            .with_context(|| format!("Migration {} failed", name))?;
        tracing::info!("Applied migration {}", name);
    }
    Ok(())
}

// User database operations
pub mod users {
    use super::*;

    pub async fn list_all(conn: &mut AsyncPgConnection) -> anyhow::Result<Vec<User>> {
        use crate::schema::users::dsl::*;

        let items = users.order_by(id.asc()).load::<User>(conn).await?;

        Ok(items)
    }

    pub async fn get_by_username(
        conn: &mut AsyncPgConnection,
        name: &str,
    ) -> anyhow::Result<Option<User>> {
        use crate::schema::users::dsl::*;

        let user = users
            .filter(username.eq(name))
            .first::<User>(conn)
            .await
            .optional()?;

        Ok(user)
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_user: NewUser<'_>,
    ) -> anyhow::Result<User> {
        use crate::schema::users::dsl::*;

        let user = diesel::insert_into(users)
            .values(&new_user)
            .get_result::<User>(conn)
            .await?;

        Ok(user)
    }
}

// Todo database operations, always scoped to an owner
pub mod todos {
    use super::*;

    pub async fn list_for_owner(
        conn: &mut AsyncPgConnection,
        owner: i32,
    ) -> anyhow::Result<Vec<Todo>> {
        use crate::schema::todos::dsl::*;

        let items = todos
            .filter(owner_id.eq(owner))
            .order_by(id.asc())
            .load::<Todo>(conn)
            .await?;

        Ok(items)
    }

    pub async fn get_for_owner(
        conn: &mut AsyncPgConnection,
        todo_id: i32,
        owner: i32,
    ) -> anyhow::Result<Option<Todo>> {
        use crate::schema::todos::dsl::*;

        let todo = todos
            .filter(id.eq(todo_id))
            .filter(owner_id.eq(owner))
            .first::<Todo>(conn)
            .await
            .optional()?;

        Ok(todo)
    }

    pub async fn create(
        conn: &mut AsyncPgConnection,
        new_todo: NewTodo<'_>,
    ) -> anyhow::Result<Todo> {
        use crate::schema::todos::dsl::*;

        let todo = diesel::insert_into(todos)
            .values(&new_todo)
            .get_result::<Todo>(conn)
            .await?;

        Ok(todo)
    }

    pub async fn update(
        conn: &mut AsyncPgConnection,
        todo_id: i32,
        owner: i32,
        changes: TodoChanges<'_>,
    ) -> anyhow::Result<Option<Todo>> {
        use crate::schema::todos::dsl::*;

        let updated = diesel::update(todos.filter(id.eq(todo_id)).filter(owner_id.eq(owner)))
            .set(&changes)
            .get_result::<Todo>(conn)
            .await
            .optional()?;

        Ok(updated)
    }

    /// Returns whether a row was deleted.
    pub async fn delete(
        conn: &mut AsyncPgConnection,
        todo_id: i32,
        owner: i32,
    ) -> anyhow::Result<bool> {
        use crate::schema::todos::dsl::*;

        let deleted = diesel::delete(todos.filter(id.eq(todo_id)).filter(owner_id.eq(owner)))
            .execute(conn)
            .await?;

        Ok(deleted > 0)
    }
}
