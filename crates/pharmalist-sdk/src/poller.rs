//! Fixed-interval re-fetch of list summaries

use crate::{ListService, SdkError};
use pharmalist_domain::{DomainKey, ListSummary};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Interval between two fetches unless configured otherwise
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest interval accepted by [`ListPoller::every`]
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Periodically fetches `list(domain)` and hands each result to a callback
///
/// The first fetch happens immediately. Failed fetches are passed to the
/// callback as errors and polling continues.
///
/// # Examples
///
/// ```no_run
/// use pharmalist_sdk::{ListPoller, PharmaClient};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), pharmalist_sdk::SdkError> {
/// let client = Arc::new(PharmaClient::new("http://localhost:8000")?);
/// let handle = ListPoller::new(client).start(|result| match result {
///     Ok(lists) => println!("{} lists", lists.len()),
///     Err(e) => eprintln!("refresh failed: {e}"),
/// });
///
/// // Polling stops when the handle is cancelled or dropped
/// handle.cancel();
/// # Ok(())
/// # }
/// ```
pub struct ListPoller<L: ?Sized> {
    service: Arc<L>,
    domain: Option<DomainKey>,
    interval: Duration,
}

impl<L> ListPoller<L>
where
    L: ListService + ?Sized + 'static,
{
    /// Poll every list with the default interval
    pub fn new(service: Arc<L>) -> Self {
        Self {
            service,
            domain: None,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Only fetch lists of one domain
    pub fn in_domain(mut self, domain: Option<DomainKey>) -> Self {
        self.domain = domain;
        self
    }

    /// Change the interval between fetches
    ///
    /// Intervals shorter than [`MIN_POLL_INTERVAL`], zero included, are
    /// raised to it.
    pub fn every(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Start polling on the current tokio runtime
    ///
    /// Cancelling does not abort a fetch that is already in flight; its
    /// result is discarded and `on_update` is not called again.
    pub fn start<F>(self, mut on_update: F) -> PollHandle
    where
        F: FnMut(Result<Vec<ListSummary>, SdkError>) + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let Self {
            service,
            domain,
            interval: period,
        } = self;

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval = ?period, domain = ?domain, "list poller started");

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = service.list(domain).await;
                if cancelled.is_cancelled() {
                    debug!("poller cancelled during fetch, discarding result");
                    break;
                }
                if let Err(e) = &result {
                    warn!(error = %e, "list refresh failed");
                }
                on_update(result);
            }

            info!("list poller stopped");
        });

        PollHandle {
            token,
            task: Some(task),
        }
    }
}

/// Subscription returned by [`ListPoller::start`]
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Stop polling; no further results are delivered
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and wait for the polling task to finish
    ///
    /// Waits for a fetch that is already in flight.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "list poller task failed");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
