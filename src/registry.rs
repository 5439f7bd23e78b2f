//! Timer entries, the registry map and the pure refresh transition.

use std::collections::HashMap;

use crate::display::{ProgressBand, TimerView};
use crate::status::StatusOutcome;
use crate::units::{progress_pct, TimeParts};

/// One tracked investment's timer state.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerEntry {
    pub id: String,
    /// Present only for entries added with a known schedule; discovery
    /// entries leave the server as the sole source of truth.
    pub start_time_ms: Option<i64>,
    pub duration_ms: Option<i64>,
    pub last_update_ms: i64,
    pub is_completed: bool,
}

impl TimerEntry {
    pub fn bare(id: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            start_time_ms: None,
            duration_ms: None,
            last_update_ms: now_ms,
            is_completed: false,
        }
    }

    pub fn with_schedule(
        id: impl Into<String>,
        start_time_ms: i64,
        duration_ms: i64,
        now_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            start_time_ms: Some(start_time_ms),
            duration_ms: Some(duration_ms),
            last_update_ms: now_ms,
            is_completed: false,
        }
    }
}

/// Local estimate used when the remote status call fails. Without a known
/// schedule the entry reads as pending, never an error.
pub fn fallback_status(entry: &TimerEntry, now_ms: i64) -> StatusOutcome {
    let (Some(start), Some(duration)) = (entry.start_time_ms, entry.duration_ms) else {
        return StatusOutcome::Pending;
    };

    let elapsed = now_ms.saturating_sub(start);
    let remaining_ms = duration.saturating_sub(elapsed).max(0);
    if remaining_ms == 0 {
        StatusOutcome::Completed { final_amount: None }
    } else {
        StatusOutcome::Running {
            remaining: TimeParts::from_millis(remaining_ms as u64),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshApplied {
    pub view: TimerView,
    /// True only on the refresh that first observed completion; the
    /// completion notification fires exactly once off this flag.
    pub completed_now: bool,
}

/// Applies one refresh outcome to an entry and derives the view to render.
///
/// Returns `None` for an already-terminal entry: `is_completed` never
/// regresses, no matter what the outcome says, and nothing is re-rendered.
pub fn apply_status(
    entry: &mut TimerEntry,
    outcome: &StatusOutcome,
    now_ms: i64,
    reference_total_secs: u64,
) -> Option<RefreshApplied> {
    if entry.is_completed {
        return None;
    }
    entry.last_update_ms = now_ms;

    let applied = match outcome {
        StatusOutcome::Completed { final_amount } => {
            entry.is_completed = true;
            RefreshApplied {
                view: TimerView::Completed {
                    final_amount: *final_amount,
                },
                completed_now: true,
            }
        }
        StatusOutcome::Running { remaining } => {
            let progress = progress_pct(remaining.total_seconds(), reference_total_secs);
            RefreshApplied {
                view: TimerView::Running {
                    remaining: *remaining,
                    progress_pct: progress,
                    band: ProgressBand::for_progress(progress),
                },
                completed_now: false,
            }
        }
        StatusOutcome::Pending => RefreshApplied {
            view: TimerView::Pending,
            completed_now: false,
        },
    };

    Some(applied)
}

/// In-memory map from investment id to timer state. Purely in-process;
/// rebuilt from the page/server on every run.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    entries: HashMap<String, TimerEntry>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bare registration. Returns whether a refresh should follow: false
    /// only when the id is already tracked and completed.
    pub fn register(&mut self, id: &str, now_ms: i64) -> bool {
        match self.entries.get(id) {
            Some(entry) if entry.is_completed => false,
            Some(_) => true,
            None => {
                self.entries
                    .insert(id.to_string(), TimerEntry::bare(id, now_ms));
                true
            }
        }
    }

    /// Scheduled registration; a later registration overwrites wholesale.
    pub fn add_timer(&mut self, id: &str, start_time_ms: i64, duration_ms: i64, now_ms: i64) {
        self.entries.insert(
            id.to_string(),
            TimerEntry::with_schedule(id, start_time_ms, duration_ms, now_ms),
        );
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    pub fn get(&self, id: &str) -> Option<&TimerEntry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TimerEntry> {
        self.entries.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn any_active(&self) -> bool {
        self.entries.values().any(|entry| !entry.is_completed)
    }

    /// Ids still worth refreshing, completed entries excluded.
    pub fn active_ids(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|entry| !entry.is_completed)
            .map(|entry| entry.id.clone())
            .collect()
    }
}
