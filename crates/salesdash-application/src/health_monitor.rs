//! Backend health monitor.
//!
//! Polls the health endpoint on an interval and on demand, keeps the latest
//! normalized [`HealthSnapshot`], and owns the disclosure state of the
//! details popover.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use salesdash_core::disclosure::DisclosureState;
use salesdash_core::health::{HealthSnapshot, OverallStatus, normalize_health};
use salesdash_core::service::HealthService;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::deadline::with_deadline;

const HEALTH_ENDPOINT: &str = "health";
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a health monitor. Clones share the same monitor.
///
/// The polling task only holds a weak reference, so dropping the last handle
/// also stops the schedule.
#[derive(Clone)]
pub struct HealthMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    health_service: Arc<dyn HealthService>,
    request_timeout: Duration,
    snapshot: watch::Sender<HealthSnapshot>,
    details: watch::Sender<DisclosureState>,
    schedule: Mutex<Option<JoinHandle<()>>>,
    /// Sequence handed to the next poll.
    next_seq: AtomicU64,
    /// Sequence of the poll whose result is currently shown.
    applied_seq: AtomicU64,
    shut_down: AtomicBool,
}

impl HealthMonitor {
    pub fn new(health_service: Arc<dyn HealthService>, request_timeout: Duration) -> Self {
        let (snapshot, _) = watch::channel(HealthSnapshot::default());
        let (details, _) = watch::channel(DisclosureState::new());
        Self {
            inner: Arc::new(MonitorInner {
                health_service,
                request_timeout,
                snapshot,
                details,
                schedule: Mutex::new(None),
                next_seq: AtomicU64::new(1),
                applied_seq: AtomicU64::new(0),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Returns a copy of the latest snapshot.
    pub fn snapshot(&self) -> HealthSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Polls the health endpoint once and returns the resulting snapshot.
    ///
    /// Never fails: transport and parse errors produce an `offline` snapshot.
    pub async fn poll(&self) -> HealthSnapshot {
        self.inner.poll().await
    }

    /// Polls now and then every `interval` until [`HealthMonitor::stop_polling`].
    ///
    /// Replaces any schedule already running. Must be called from within a
    /// tokio runtime.
    pub fn start_polling(&self, interval: Duration) {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(run_schedule(weak, interval));

        let previous = self.inner.lock_schedule().replace(handle);
        if let Some(previous) = previous {
            previous.abort();
            tracing::debug!(target: "health", "Replaced existing polling schedule");
        }
        tracing::info!(target: "health", "Polling started ({:?} interval)", interval);
    }

    /// Cancels the polling schedule. Safe to call when not polling.
    pub fn stop_polling(&self) {
        self.inner.stop_schedule();
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .lock_schedule()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Runs one extra poll in the background without touching the schedule.
    pub fn refresh_now(&self) -> JoinHandle<HealthSnapshot> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.poll().await })
    }

    /// Tears the monitor down: stops polling and ignores any late results.
    pub fn shutdown(&self) {
        self.inner.shut_down.store(true, Ordering::SeqCst);
        self.inner.stop_schedule();
        self.inner.details.send_modify(|details| details.dismiss());
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }

    // ============================================================================
    // Details popover
    // ============================================================================

    pub fn details_state(&self) -> DisclosureState {
        *self.inner.details.borrow()
    }

    pub fn subscribe_details(&self) -> watch::Receiver<DisclosureState> {
        self.inner.details.subscribe()
    }

    pub fn toggle_details(&self) {
        self.inner.details.send_modify(|details| details.toggle_open());
    }

    pub fn toggle_details_expanded(&self) {
        self.inner
            .details
            .send_modify(|details| details.toggle_expand());
    }

    pub fn dismiss_details(&self) {
        self.inner.details.send_modify(|details| details.dismiss());
    }

    /// Host callback for an interaction outside the details popover.
    pub fn on_outside_interaction(&self) -> bool {
        let mut dismissed = false;
        self.inner.details.send_if_modified(|details| {
            dismissed = details.on_outside_interaction();
            dismissed
        });
        dismissed
    }
}

async fn run_schedule(monitor: Weak<MonitorInner>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(inner) = monitor.upgrade() else {
            tracing::debug!(target: "health", "Monitor dropped, polling task exiting");
            break;
        };
        // Run the poll as its own task so stopping the schedule never cancels
        // a request halfway and leaves the snapshot stuck in `Checking`.
        let poll = tokio::spawn(async move { inner.poll().await });
        let _ = poll.await;
    }
}

impl MonitorInner {
    async fn poll(&self) -> HealthSnapshot {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        self.snapshot.send_if_modified(|snapshot| {
            if self.shut_down.load(Ordering::SeqCst)
                || seq <= self.applied_seq.load(Ordering::SeqCst)
            {
                return false;
            }
            snapshot.overall_status = OverallStatus::Checking;
            true
        });

        let result = with_deadline(
            HEALTH_ENDPOINT,
            self.request_timeout,
            self.health_service.fetch_health(),
        )
        .await;
        let checked_at = chrono::Utc::now();

        let snapshot = match result.and_then(|report| {
            normalize_health(&report.payload, Some(report.latency), checked_at)
        }) {
            Ok(snapshot) => {
                tracing::debug!(
                    target: "health",
                    "Poll #{} resolved: {:?}",
                    seq,
                    snapshot.overall_status
                );
                snapshot
            }
            Err(e) => {
                tracing::warn!(target: "health", "Poll #{} failed: {}", seq, e);
                HealthSnapshot::offline(e.to_string(), checked_at)
            }
        };

        self.publish(seq, snapshot.clone());
        snapshot
    }

    /// Replaces the visible snapshot unless a newer poll already landed or the
    /// monitor was shut down.
    fn publish(&self, seq: u64, snapshot: HealthSnapshot) {
        let applied = self.snapshot.send_if_modified(|current| {
            if self.shut_down.load(Ordering::SeqCst)
                || seq <= self.applied_seq.load(Ordering::SeqCst)
            {
                return false;
            }
            self.applied_seq.store(seq, Ordering::SeqCst);
            *current = snapshot;
            true
        });

        if !applied {
            tracing::debug!(target: "health", "Discarding stale result of poll #{}", seq);
        }
    }

    fn lock_schedule(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.schedule.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn stop_schedule(&self) {
        if let Some(handle) = self.lock_schedule().take() {
            handle.abort();
            tracing::info!(target: "health", "Polling stopped");
        }
    }
}

impl Drop for MonitorInner {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_schedule().take() {
            handle.abort();
        }
    }
}
