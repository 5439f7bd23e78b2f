//! Timer registry poller: tick scheduling and per-entry refresh tasks.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::discovery::discover_investment_ids;
use crate::display::{CompletionNotifier, Severity, TimerDisplay, COMPLETION_MESSAGE};
use crate::registry::{apply_status, fallback_status, TimerEntry, TimerRegistry};
use crate::source::StatusSource;
use crate::units::REFERENCE_TOTAL_SECS;

const REGISTRY_LOCK: &str = "registry lock should not be poisoned";
const TICK_TASK_LOCK: &str = "tick task lock should not be poisoned";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub tick_interval_ms: u64,
    pub reference_total_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            reference_total_secs: REFERENCE_TOTAL_SECS,
        }
    }
}

/// Owns the registry and drives the once-per-tick refresh pass. Constructed
/// once at application start and passed by reference; there is no ambient
/// singleton.
pub struct TimerPoller {
    inner: Arc<PollerInner>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

struct PollerInner {
    registry: Mutex<TimerRegistry>,
    source: Arc<dyn StatusSource>,
    display: Arc<dyn TimerDisplay>,
    notifier: Arc<dyn CompletionNotifier>,
    config: PollerConfig,
}

impl TimerPoller {
    pub fn new(
        config: PollerConfig,
        source: Arc<dyn StatusSource>,
        display: Arc<dyn TimerDisplay>,
        notifier: Arc<dyn CompletionNotifier>,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                registry: Mutex::new(TimerRegistry::new()),
                source,
                display,
                notifier,
                config,
            }),
            tick_task: Mutex::new(None),
        }
    }

    /// Spawns the periodic tick task; the first pass fires immediately.
    /// Idempotent while a tick task is live.
    pub fn start(&self) {
        let mut guard = self.tick_task.lock().expect(TICK_TASK_LOCK);
        if guard.is_some() {
            return;
        }

        info!(
            event = "poller.start",
            tick_interval_ms = self.inner.config.tick_interval_ms
        );
        let inner = Arc::clone(&self.inner);
        *guard = Some(tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_millis(inner.config.tick_interval_ms.max(1)));
            loop {
                ticker.tick().await;
                refresh_all(&inner).await;
            }
        }));
    }

    /// Halts the periodic tick. In-flight refreshes are not cancelled; their
    /// render step re-checks the registry.
    pub fn stop(&self) {
        if let Some(handle) = self.tick_task.lock().expect(TICK_TASK_LOCK).take() {
            handle.abort();
            info!(event = "poller.stop");
        }
    }

    /// Tracks `id` with no known schedule and refreshes it immediately.
    /// No-op when the entry is already completed.
    pub fn register(&self, id: &str) {
        let now_ms = Utc::now().timestamp_millis();
        let should_refresh = self
            .inner
            .registry
            .lock()
            .expect(REGISTRY_LOCK)
            .register(id, now_ms);
        if should_refresh {
            self.spawn_refresh(id);
        }
    }

    /// Tracks `id` with a known start and duration (enabling the fallback
    /// path), overwriting any previous entry, then refreshes immediately.
    pub fn add_timer(&self, id: &str, start_time_ms: i64, duration_ms: i64) {
        let now_ms = Utc::now().timestamp_millis();
        self.inner
            .registry
            .lock()
            .expect(REGISTRY_LOCK)
            .add_timer(id, start_time_ms, duration_ms, now_ms);
        self.spawn_refresh(id);
    }

    /// Registers every id found in the markup. Returns how many distinct
    /// markers the scan produced.
    pub fn register_discovered(&self, markup: &str) -> usize {
        let ids = discover_investment_ids(markup);
        for id in &ids {
            self.register(id);
        }
        ids.len()
    }

    /// Idempotent; an in-flight refresh for `id` resolves without rendering.
    pub fn remove(&self, id: &str) -> bool {
        self.inner.registry.lock().expect(REGISTRY_LOCK).remove(id)
    }

    /// Stops the tick and drops every entry; used at teardown.
    pub fn clear_all(&self) {
        self.stop();
        let dropped = self.inner.registry.lock().expect(REGISTRY_LOCK).clear();
        info!(event = "registry.cleared", dropped);
    }

    pub fn is_any_active(&self) -> bool {
        self.inner
            .registry
            .lock()
            .expect(REGISTRY_LOCK)
            .any_active()
    }

    /// Snapshot of one tracked entry, if any.
    pub fn status_of(&self, id: &str) -> Option<TimerEntry> {
        self.inner
            .registry
            .lock()
            .expect(REGISTRY_LOCK)
            .get(id)
            .cloned()
    }

    /// One refresh pass over all non-completed entries, each as its own
    /// task. Safe to call concurrently with the periodic tick: refreshes are
    /// independent and idempotent per entry.
    pub async fn refresh_all(&self) {
        refresh_all(&self.inner).await;
    }

    fn spawn_refresh(&self, id: &str) {
        let inner = Arc::clone(&self.inner);
        let id = id.to_string();
        tokio::spawn(async move {
            refresh_entry(inner, id).await;
        });
    }
}

async fn refresh_all(inner: &Arc<PollerInner>) {
    let ids = inner.registry.lock().expect(REGISTRY_LOCK).active_ids();

    let mut tasks = Vec::with_capacity(ids.len());
    for id in ids {
        let inner = Arc::clone(inner);
        tasks.push(tokio::spawn(async move {
            refresh_entry(inner, id).await;
        }));
    }
    for task in tasks {
        let _ = task.await;
    }
}

async fn refresh_entry(inner: Arc<PollerInner>, id: String) {
    let snapshot = {
        let registry = inner.registry.lock().expect(REGISTRY_LOCK);
        match registry.get(&id) {
            Some(entry) if !entry.is_completed => entry.clone(),
            _ => return,
        }
    };

    let outcome = match inner.source.fetch_status(&id).await {
        Ok(payload) => payload.into_outcome(),
        Err(err) => {
            warn!(event = "status.fallback", investment_id = %id, error = %err);
            fallback_status(&snapshot, Utc::now().timestamp_millis())
        }
    };

    let now_ms = Utc::now().timestamp_millis();
    let applied = {
        let mut registry = inner.registry.lock().expect(REGISTRY_LOCK);
        // The entry may have been removed while the fetch was in flight;
        // in that case nothing may be rendered.
        let Some(entry) = registry.get_mut(&id) else {
            debug!(event = "refresh.dropped", investment_id = %id);
            return;
        };
        apply_status(entry, &outcome, now_ms, inner.config.reference_total_secs)
    };

    let Some(applied) = applied else { return };
    inner.display.render(&id, &applied.view);
    if applied.completed_now {
        info!(event = "timer.completed", investment_id = %id);
        inner.notifier.notify(COMPLETION_MESSAGE, Severity::Success);
    }
}
