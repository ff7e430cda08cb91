//! Off-thread fetch dispatch.
//!
//! Requests run on tokio's blocking pool and their replies come back over an
//! unbounded channel that the event loop drains once per iteration. Outside a
//! runtime (unit tests) requests run inline, so the reply is available on the
//! next `drain`.
//!
//! Every request carries the widget's generation counter at the time it was
//! issued; widgets drop replies whose generation is no longer current.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use tokio::sync::mpsc;
use tracing::debug;

use super::{DataProvider, ProviderError};
use crate::models::{HourlySteps, Metric, Sample};
use crate::ui::ZoneId;

/// What a widget needs loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Offsets relative to `today`, the day the widget anchored the window to.
    HourlySteps {
        today: NaiveDate,
        day_start: i32,
        day_end: i32,
    },
    Series {
        metric: Metric,
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub target: ZoneId,
    pub generation: u64,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Hourly(Vec<HourlySteps>),
    Series(Vec<Sample>),
}

#[derive(Debug)]
pub struct FetchReply {
    pub target: ZoneId,
    pub generation: u64,
    pub result: Result<Payload, ProviderError>,
}

/// Run a request synchronously against `provider`.
pub fn execute(provider: &dyn DataProvider, request: FetchRequest) -> FetchReply {
    let result = match request.query {
        Query::HourlySteps {
            today,
            day_start,
            day_end,
        } => provider
            .query_hourly_steps_on(today, day_start, day_end)
            .map(Payload::Hourly),
        Query::Series { metric, start, end } => provider
            .query_raw_series(metric, start, end)
            .map(Payload::Series),
    };
    FetchReply {
        target: request.target,
        generation: request.generation,
        result,
    }
}

/// Owns the provider handle and the reply channel.
pub struct Fetcher {
    provider: Arc<dyn DataProvider>,
    tx: mpsc::UnboundedSender<FetchReply>,
    rx: mpsc::UnboundedReceiver<FetchReply>,
}

impl Fetcher {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { provider, tx, rx }
    }

    /// Start a request; its reply shows up in a later [`Fetcher::drain`].
    pub fn dispatch(&self, request: FetchRequest) {
        debug!(
            target_widget = ?request.target,
            generation = request.generation,
            query = ?request.query,
            "dispatching fetch"
        );
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    let _ = tx.send(execute(provider.as_ref(), request));
                });
            }
            Err(_) => {
                let _ = tx.send(execute(provider.as_ref(), request));
            }
        }
    }

    pub fn dispatch_all(&self, requests: impl IntoIterator<Item = FetchRequest>) {
        for request in requests {
            self.dispatch(request);
        }
    }

    /// Collect every reply that has arrived so far without blocking.
    pub fn drain(&mut self) -> Vec<FetchReply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        replies
    }
}
