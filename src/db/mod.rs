pub mod models;
pub mod reader;
pub mod writer;

pub use models::PumpSignalRow;
pub use writer::SignalWriter;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

/// Opens (creating if needed) the signal journal and applies its migrations.
pub async fn open_journal(path: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(opts).await?;
    sqlx::migrate!("./migrations/signals").run(&pool).await?;
    info!("[JOURNAL] ready at {path}");
    Ok(pool)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Single-connection in-memory journal with migrations applied.
    pub(crate) async fn memory_journal() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations/signals").run(&pool).await.unwrap();
        pool
    }
}
