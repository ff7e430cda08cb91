//! Data access for the dashboard.
//!
//! Widgets never touch storage directly: they describe what they need as a
//! [`Query`], the [`Fetcher`] runs it against a [`DataProvider`] off the
//! event-loop thread, and the reply comes back through a channel.

pub mod fetch;
mod sqlite;

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;

use crate::models::{HourlySteps, Metric, Sample};

pub use fetch::{FetchReply, FetchRequest, Fetcher, Payload, Query};
pub use sqlite::SqliteProvider;

/// Failure while loading chart data. Local to the widget that asked.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("malformed {field} value {value:?}")]
    Malformed { field: &'static str, value: String },
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of time-bucketed metric series.
///
/// All timestamps are interpreted in local time for bucketing and display.
pub trait DataProvider: Send + Sync {
    /// Hourly step sums for the half-open local day range
    /// `[today + day_start, today + day_end)`. May return fewer than 24 rows.
    fn query_hourly_steps(
        &self,
        day_start: i32,
        day_end: i32,
    ) -> Result<Vec<HourlySteps>, ProviderError>;

    /// Like [`DataProvider::query_hourly_steps`], with offsets resolved
    /// against `today` instead of the provider's clock.
    fn query_hourly_steps_on(
        &self,
        _today: NaiveDate,
        day_start: i32,
        day_end: i32,
    ) -> Result<Vec<HourlySteps>, ProviderError> {
        self.query_hourly_steps(day_start, day_end)
    }

    /// Raw readings of `metric` with `start <= timestamp < end`.
    fn query_raw_series(
        &self,
        metric: Metric,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<Sample>, ProviderError>;
}
