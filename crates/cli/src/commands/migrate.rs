//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! fd-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DIARY_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migrations live in `crates/api/migrations/`.

use super::{CommandError, connect};

/// Run the diary database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running diary migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Diary migrations complete!");
    Ok(())
}
