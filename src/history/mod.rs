pub mod sqlite;

pub use sqlite::SqliteHistory;

use crate::error::Result;
use crate::types::{OpenInterestRecord, PositioningRecord, PriceRecord};

/// Read side of the market history. Implementations return rows newest-first;
/// an empty result is not an error.
pub trait HistoryStore {
    /// Up to `limit` most recent price rows for an exact ticker.
    async fn recent_prices(&self, ticker: &str, limit: u32) -> Result<Vec<PriceRecord>>;

    /// Most recent open interest row whose contract code starts with `ticker`.
    async fn latest_open_interest(&self, ticker: &str) -> Result<Option<OpenInterestRecord>>;

    /// Most recent positioning row whose contract code starts with `ticker`.
    async fn latest_positioning(&self, ticker: &str) -> Result<Option<PositioningRecord>>;
}
