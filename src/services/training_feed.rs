//! Live, month-windowed view of a user's trainings.
//!
//! One broad subscription covers the user's whole collection; the month
//! filter is applied client-side on every snapshot because the store's
//! query layer only supports equality predicates. Cost therefore grows
//! with lifetime history, not with the visible month, a known limitation
//! of the store's query capabilities.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::{MonthWindow, Training, OWNER_FIELD};
use crate::remote::{Document, DocumentStore, Snapshot};
use crate::services::training_service::TRAININGS_COLLECTION;

struct FeedState {
    month: MonthWindow,
    /// Most recent raw snapshot, kept so a month change can republish
    /// without waiting for the store.
    latest: Option<Snapshot>,
    closed: bool,
}

struct FeedInner {
    publisher: watch::Sender<Vec<Training>>,
    state: Mutex<FeedState>,
}

impl FeedInner {
    /// Publications from both paths (snapshot delivery and month changes)
    /// happen under the state lock, which makes them totally ordered: the
    /// last month set and the latest snapshot received are what end up
    /// published.
    fn apply_snapshot(&self, snapshot: Snapshot) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            // A delivery racing close is discarded, not queued.
            return;
        }
        let visible = project(&snapshot, state.month);
        state.latest = Some(snapshot);
        self.publisher.send_replace(visible);
    }

    fn set_month(&self, month: MonthWindow) {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return;
        }
        state.month = month;
        if let Some(snapshot) = &state.latest {
            let visible = project(snapshot, month);
            self.publisher.send_replace(visible);
        }
    }
}

/// Parse, filter, and order a raw snapshot for display.
fn project(snapshot: &[Document], month: MonthWindow) -> Vec<Training> {
    let mut trainings: Vec<Training> = snapshot
        .iter()
        .filter_map(|document| {
            match Training::parse(document.id.clone(), document.data.clone()) {
                Ok(training) => Some(training),
                Err(err) => {
                    // One malformed record must not take down the batch.
                    tracing::warn!(id = %document.id, %err, "skipping malformed training document");
                    None
                }
            }
        })
        .filter(|training| month.contains(training.date))
        .collect();

    // Sort by date descending (most recent first); the sort is stable, so
    // equal timestamps keep their snapshot order.
    trainings.sort_by(|a, b| b.date.cmp(&a.date));
    trainings
}

/// Continuously updated list of one user's trainings for a selected month.
///
/// Open a feed per list screen, hand the [`watch::Receiver`] to the UI, and
/// close it when the screen goes away.
pub struct TrainingFeed {
    inner: Arc<FeedInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TrainingFeed {
    /// Subscribe to `user_id`'s trainings, initially windowed to `month`.
    ///
    /// Must be called from within a tokio runtime; snapshot delivery runs on
    /// a spawned task until [`close`](Self::close).
    pub fn open(store: &dyn DocumentStore, user_id: &str, month: MonthWindow) -> Self {
        let mut snapshots = store.subscribe(TRAININGS_COLLECTION, OWNER_FIELD, user_id);
        let (publisher, _) = watch::channel(Vec::new());

        let inner = Arc::new(FeedInner {
            publisher,
            state: Mutex::new(FeedState {
                month,
                latest: None,
                closed: false,
            }),
        });

        let worker = Arc::clone(&inner);
        let task = tokio::spawn(async move {
            while let Some(snapshot) = snapshots.recv().await {
                worker.apply_snapshot(snapshot);
            }
        });

        Self {
            inner,
            task: Mutex::new(Some(task)),
        }
    }

    /// Latest published list; the receiver observes every subsequent
    /// publication.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Training>> {
        self.inner.publisher.subscribe()
    }

    /// Change the visible month without re-subscribing.
    ///
    /// When a snapshot has already been delivered it is re-filtered and
    /// republished before this call returns, so the UI never shows one
    /// month's data under another month's label.
    pub fn set_month(&self, month: MonthWindow) {
        self.inner.set_month(month);
    }

    /// Cancel the subscription. No publication happens after this returns,
    /// including from a delivery already in flight. Safe to call repeatedly.
    pub fn close(&self) {
        self.inner.state.lock().unwrap().closed = true;
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
    }
}

impl Drop for TrainingFeed {
    fn drop(&mut self) {
        self.close();
    }
}
