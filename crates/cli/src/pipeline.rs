//! One poll cycle: FETCH → FILTER → LOAD_PREVIOUS → RECONCILE → FORMAT →
//! NOTIFY → PERSIST.
//!
//! A fetch failure aborts the whole cycle before any state is touched — a
//! transient upstream outage must never read as "everything disappeared".
//! Notification failures are per-message and never stop the cycle, so the
//! new snapshot is still persisted and stale records are not re-reported
//! next time one send fails.

use tracing::{info, warn};

use fogowatch_feed::{FeedClient, FeedError};
use fogowatch_notify::{Notification, Notifier};
use fogowatch_recon::format::compose_all;
use fogowatch_recon::reconcile;
use fogowatch_store::{SnapshotStore, StoreError};

use crate::config::Settings;

/// Error that aborts or fails a cycle. Partial notification failures are
/// not in here — they are counted in the report instead.
#[derive(Debug)]
pub enum CycleError {
    Fetch(FeedError),
    Persist(StoreError),
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CycleError::Fetch(e) => write!(f, "fetch failed: {e}"),
            CycleError::Persist(e) => write!(f, "persist failed: {e}"),
        }
    }
}

impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CycleError::Fetch(e) => Some(e),
            CycleError::Persist(e) => Some(e),
        }
    }
}

/// What one cycle did, for the log line at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub relevant: usize,
    pub appeared: usize,
    pub disappeared: usize,
    pub changed: usize,
    pub notified: usize,
    pub notify_failures: usize,
}

/// Run one poll cycle. Single-threaded and blocking; the caller owns
/// scheduling and never overlaps cycles.
pub fn run_cycle(
    settings: &Settings,
    feed: &FeedClient,
    store: &SnapshotStore,
    notifier: &dyn Notifier,
) -> Result<CycleReport, CycleError> {
    info!(url = %settings.feed_url, "fetching live fire records");
    let live = feed.fetch().map_err(CycleError::Fetch)?;
    let fetched = live.len();

    let relevant = settings.relevance.filter(&live);
    info!(fetched, relevant = relevant.len(), "filtered to watch area");

    let previous = store.load();
    let changes = reconcile(&previous, &relevant);
    info!(
        appeared = changes.appeared.len(),
        disappeared = changes.disappeared.len(),
        changed = changes.changed.len(),
        "reconciled against previous snapshot"
    );

    let mut notified = 0;
    let mut notify_failures = 0;
    for (subject, message) in compose_all(&changes) {
        let notification = Notification {
            to: settings.notify.recipients.clone(),
            subject,
            message,
        };
        match notifier.send(&notification) {
            Ok(()) => {
                info!(subject = %notification.subject, "notification sent");
                notified += 1;
            }
            Err(e) => {
                warn!(subject = %notification.subject, error = %e, "notification failed; continuing");
                notify_failures += 1;
            }
        }
    }

    // Persist regardless of notification outcome, so the next cycle does
    // not re-report records whose notification merely failed to send.
    store.save(&relevant).map_err(CycleError::Persist)?;

    Ok(CycleReport {
        fetched,
        relevant: relevant.len(),
        appeared: changes.appeared.len(),
        disappeared: changes.disappeared.len(),
        changed: changes.changed.len(),
        notified,
        notify_failures,
    })
}
