//! Session storage.
//!
//! Session records are kept in SQLite through `tower-sessions-sqlx-store`.
//! The store implements
//! [`ExpiredDeletion`](tower_sessions::session_store::ExpiredDeletion), so the server runs
//! `continuously_delete_expired` next to it and abandoned records (an OAuth
//! redirect that never came back, a session left to expire) are removed.

use std::time::Duration;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower_sessions_sqlx_store::SqliteStore;

use super::AuthError;

/// How often expired session records are swept.
pub const EXPIRED_SESSION_SWEEP: Duration = Duration::from_secs(60);

/// Open the session database.
///
/// One connection is kept open for the life of the pool so an in-memory
/// database is not dropped between requests.
pub async fn connect_session_database(url: &str) -> Result<SqlitePool, AuthError> {
    SqlitePoolOptions::new()
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(url)
        .await
        .map_err(|e| AuthError::Session(format!("Failed to open session database: {}", e)))
}

/// Session store over `pool`, with its table created.
pub async fn session_store(pool: SqlitePool) -> Result<SqliteStore, AuthError> {
    let store = SqliteStore::new(pool);
    store
        .migrate()
        .await
        .map_err(|e| AuthError::Session(format!("Failed to migrate session store: {}", e)))?;
    Ok(store)
}
