//! Database migration command.
//!
//! Applies `crates/site/migrations/` and creates the session table used by
//! `tower-sessions-sqlx-store`. Safe to re-run; applied migrations are
//! skipped.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CommandError, connect};

/// Run all site migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running site migrations...");
    sqlx::migrate!("../site/migrations").run(&pool).await?;

    tracing::info!("Creating session store schema...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
