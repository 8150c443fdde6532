// ── Refresh controller ──
//
// Owns the fetch → shape → publish cycle for the dashboard. Results fan
// out through `watch` channels so any number of views can observe the
// latest snapshot, the current error, and the refresh state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stockdash_api::FeedClient;

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::sleep_check::SleepCheck;
use crate::snapshot::DashboardSnapshot;

// ── State ────────────────────────────────────────────────────────

/// Whether a fetch is in flight. The manual trigger is disabled while
/// `Fetching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Fetching,
}

/// What a single refresh attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new snapshot was published.
    Updated,
    /// The fetch failed; the error channel carries the message.
    Failed,
    /// Another refresh was already in flight, nothing was done.
    Skipped,
}

// ── Dashboard ────────────────────────────────────────────────────

/// Cheaply cloneable handle to the refresh controller.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    feed: FeedClient,
    sleep: SleepCheck,
    state: watch::Sender<RefreshState>,
    snapshot: watch::Sender<Option<Arc<DashboardSnapshot>>>,
    error: watch::Sender<Option<String>>,
    sleeping: watch::Sender<bool>,
    in_flight: AtomicBool,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard {
    /// Build the feed and sleep clients from `config`. Does not fetch;
    /// call [`start()`](Self::start).
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let transport = config.transport();
        let feed = FeedClient::new(config.feed_url.clone(), &transport)?;
        let sleep = SleepCheck::new(config.proxy_url.clone(), config.sleep_cache_ttl, &transport)?;
        Ok(Self::with_parts(config, feed, sleep))
    }

    /// Assemble a controller around pre-built clients.
    pub fn with_parts(config: DashboardConfig, feed: FeedClient, sleep: SleepCheck) -> Self {
        let (state, _) = watch::channel(RefreshState::Idle);
        let (snapshot, _) = watch::channel(None);
        let (error, _) = watch::channel(None);
        let (sleeping, _) = watch::channel(false);

        Self {
            inner: Arc::new(DashboardInner {
                config,
                feed,
                sleep,
                state,
                snapshot,
                error,
                sleeping,
                in_flight: AtomicBool::new(false),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Run the initial refresh, then start the periodic timer.
    ///
    /// Returns the initial refresh's outcome; a failed first fetch still
    /// starts the timer so the dashboard recovers on its own.
    pub async fn start(&self) -> RefreshOutcome {
        let outcome = self.refresh().await;

        let interval = self.inner.config.refresh_interval;
        if interval.is_zero() {
            debug!("refresh timer disabled");
        } else {
            let dash = self.clone();
            let cancel = self.inner.cancel.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(refresh_task(dash, interval, cancel)));
            info!(interval = ?interval, "refresh timer started");
        }

        outcome
    }

    /// Stop the timer and wait for it to exit. An in-flight fetch is not
    /// interrupted.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard stopped");
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch the feed once and publish the result.
    ///
    /// Shares a reentrancy guard with the timer: a call made while another
    /// refresh is in flight returns [`RefreshOutcome::Skipped`] at once.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = FetchGuard::acquire(&self.inner) else {
            debug!("refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        self.inner.error.send_replace(None);

        match self.inner.feed.fetch().await {
            Ok(feed) => {
                let cfg = &self.inner.config;
                let snapshot =
                    DashboardSnapshot::build(&feed, cfg.limits, cfg.activity_limit, Utc::now());
                debug!(
                    samples = snapshot.history_len,
                    points = snapshot.chart.len(),
                    positions = snapshot.positions.len(),
                    activities = snapshot.activities.len(),
                    "feed refreshed"
                );
                self.inner.snapshot.send_replace(Some(Arc::new(snapshot)));
                self.spawn_sleep_check();
                RefreshOutcome::Updated
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "feed refresh failed");
                self.inner.error.send_replace(Some(err.to_string()));
                RefreshOutcome::Failed
            }
        }
    }

    /// Start a refresh in the background. Returns `false` without spawning
    /// anything when one is already in flight.
    pub fn trigger(&self) -> bool {
        if self.is_fetching() {
            return false;
        }
        let dash = self.clone();
        tokio::spawn(async move {
            dash.refresh().await;
        });
        true
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Best-effort sleep-status update. Detached: failures are logged and
    /// never reach the error channel.
    fn spawn_sleep_check(&self) {
        let dash = self.clone();
        tokio::spawn(async move {
            match dash.inner.sleep.check().await {
                Ok(sleeping) => {
                    dash.inner.sleeping.send_replace(sleeping);
                }
                Err(e) => warn!(error = %e, "sleep-status check failed"),
            }
        });
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn state(&self) -> watch::Receiver<RefreshState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> watch::Receiver<Option<Arc<DashboardSnapshot>>> {
        self.inner.snapshot.subscribe()
    }

    /// Message of the most recent failed refresh, cleared when the next
    /// one starts.
    pub fn error(&self) -> watch::Receiver<Option<String>> {
        self.inner.error.subscribe()
    }

    pub fn sleeping(&self) -> watch::Receiver<bool> {
        self.inner.sleeping.subscribe()
    }

    /// Completion time of the latest published snapshot.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner
            .snapshot
            .borrow()
            .as_ref()
            .map(|s| s.updated_at)
    }
}

// ── Reentrancy guard ─────────────────────────────────────────────

/// Held for the duration of one refresh. Dropping it re-enables the
/// trigger on every exit path.
struct FetchGuard<'a> {
    inner: &'a DashboardInner,
}

impl<'a> FetchGuard<'a> {
    fn acquire(inner: &'a DashboardInner) -> Option<Self> {
        inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        inner.state.send_replace(RefreshState::Fetching);
        Some(Self { inner })
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.inner.state.send_replace(RefreshState::Idle);
        self.inner.in_flight.store(false, Ordering::Release);
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Re-run the refresh cycle every `period` until cancelled.
async fn refresh_task(dashboard: Dashboard, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // the initial refresh already ran

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if dashboard.refresh().await == RefreshOutcome::Skipped {
                    debug!("timer tick skipped, manual refresh in flight");
                }
            }
        }
    }
}
