//! Investment countdown timer core.
//!
//! Maintains a registry of tracked investments, refreshes each non-completed
//! entry's remaining time from a status endpoint once per second and falls
//! back to a local estimate when the call fails. Display and completion
//! notification sit behind trait seams, so the refresh transition itself is
//! pure and testable without any UI.

mod discovery;
mod display;
mod observability;
mod poller;
mod registry;
mod source;
mod status;
mod units;

pub use discovery::{discover_investment_ids, INVESTMENT_ID_MARKER};
pub use display::{
    CompletionNotifier, LogDisplay, LogNotifier, ProgressBand, Severity, TimerDisplay, TimerView,
    COMPLETION_MESSAGE,
};
pub use observability::{
    init_logging, log_app_start, log_source_configured, logging_config_from_env, LogFormat,
    LoggingConfig, LoggingInitError,
};
pub use poller::{PollerConfig, TimerPoller};
pub use registry::{
    apply_status, fallback_status, RefreshApplied, TimerEntry, TimerRegistry,
};
pub use source::{HttpStatusSource, HttpStatusSourceConfig, StatusSource};
pub use status::{StatusFetchError, StatusOutcome, StatusPayload};
pub use units::{progress_pct, TimeParts, REFERENCE_TOTAL_SECS};
