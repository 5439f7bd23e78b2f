//! View models and the outbound display/notification seams.

use tracing::info;

use crate::units::TimeParts;

/// One-shot message fired when an investment reaches its terminal state.
pub const COMPLETION_MESSAGE: &str =
    "Investment completed! Check your wallet for the doubled amount.";

/// Progress-bar color band derived from the elapsed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Info,
    Warning,
    Success,
}

impl ProgressBand {
    pub fn for_progress(progress_pct: f64) -> Self {
        if progress_pct < 30.0 {
            Self::Info
        } else if progress_pct < 70.0 {
            Self::Warning
        } else {
            Self::Success
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Info => "bg-info",
            Self::Warning => "bg-warning",
            Self::Success => "bg-success",
        }
    }
}

/// What a display surface should show for one entry after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerView {
    Completed {
        final_amount: Option<f64>,
    },
    Running {
        remaining: TimeParts,
        progress_pct: f64,
        band: ProgressBand,
    },
    /// No remaining-time data from either source; awaiting confirmation.
    Pending,
}

/// Thin rendering adapter. Implementations own the actual surface and may
/// ignore ids they have no target for.
pub trait TimerDisplay: Send + Sync + 'static {
    fn render(&self, id: &str, view: &TimerView);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Outbound toast/banner surface owned by the surrounding UI.
pub trait CompletionNotifier: Send + Sync + 'static {
    fn notify(&self, message: &str, severity: Severity);
}

/// Default display: structured log lines instead of a UI surface.
#[derive(Debug, Default, Clone)]
pub struct LogDisplay;

impl TimerDisplay for LogDisplay {
    fn render(&self, id: &str, view: &TimerView) {
        match view {
            TimerView::Completed {
                final_amount: Some(amount),
            } => info!(
                event = "timer.render",
                investment_id = id,
                state = "completed",
                final_amount = *amount
            ),
            TimerView::Completed { final_amount: None } => info!(
                event = "timer.render",
                investment_id = id,
                state = "completed"
            ),
            TimerView::Running {
                remaining,
                progress_pct,
                band,
            } => info!(
                event = "timer.render",
                investment_id = id,
                state = "running",
                remaining = %remaining.format_compact(),
                progress_pct = *progress_pct,
                band = band.css_class()
            ),
            TimerView::Pending => info!(
                event = "timer.render",
                investment_id = id,
                state = "pending"
            ),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl CompletionNotifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        info!(
            event = "notification",
            severity = severity.as_str(),
            message
        );
    }
}
