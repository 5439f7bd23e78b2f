//! Pure countdown arithmetic: unit decomposition, formatting and progress.

use serde::{Deserialize, Serialize};

/// Seconds in the fixed 7-day window the progress bar is measured against.
pub const REFERENCE_TOTAL_SECS: u64 = 7 * 24 * 60 * 60;

const SECS_PER_DAY: u64 = 24 * 60 * 60;
const SECS_PER_HOUR: u64 = 60 * 60;
const SECS_PER_MINUTE: u64 = 60;

/// Remaining time broken into display units, as served by the status
/// endpoint and as produced by the fallback calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeParts {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Floor-division decomposition; sub-second precision is dropped.
    pub fn from_millis(ms: u64) -> Self {
        let total_seconds = ms / 1_000;
        Self {
            days: total_seconds / SECS_PER_DAY,
            hours: (total_seconds % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total_seconds % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total_seconds % SECS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds
    }

    /// Whether every sub-day unit is inside its carry range.
    pub fn is_canonical(&self) -> bool {
        self.hours < 24 && self.minutes < 60 && self.seconds < 60
    }

    /// Compact single-line form: the two or three most significant units.
    pub fn format_compact(&self) -> String {
        if self.days > 0 {
            format!("{}d {}h {}m", self.days, self.hours, self.minutes)
        } else if self.hours > 0 {
            format!("{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else {
            format!("{}m {}s", self.minutes, self.seconds)
        }
    }
}

/// Elapsed share of `total_secs` given the remaining seconds, clamped to
/// `[0, 100]`. A zero total reads as fully elapsed.
pub fn progress_pct(remaining_secs: u64, total_secs: u64) -> f64 {
    if total_secs == 0 {
        return 100.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs) as f64;
    ((elapsed / total_secs as f64) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposition_matches_floor_division() {
        let parts = TimeParts::from_millis(604_200_000);
        assert_eq!(
            parts,
            TimeParts {
                days: 6,
                hours: 23,
                minutes: 50,
                seconds: 0
            }
        );
    }

    #[test]
    fn decomposition_round_trips_on_integer_seconds() {
        let samples: [u64; 9] = [
            0,
            1,
            999,
            1_000,
            59_999,
            86_400_000,
            604_200_000,
            604_800_000,
            u64::MAX / 1_000,
        ];
        for ms in samples {
            let parts = TimeParts::from_millis(ms);
            assert!(parts.is_canonical(), "non-canonical parts for {ms}ms");
            assert_eq!(parts.total_seconds(), ms / 1_000, "round trip for {ms}ms");
        }
    }

    #[test]
    fn sub_second_remainder_is_dropped() {
        assert_eq!(TimeParts::from_millis(999), TimeParts::ZERO);
        assert_eq!(TimeParts::from_millis(1_001).seconds, 1);
    }

    #[test]
    fn canonical_check_rejects_carry_overflow() {
        let bad = TimeParts {
            days: 0,
            hours: 24,
            minutes: 0,
            seconds: 0,
        };
        assert!(!bad.is_canonical());
        assert!(TimeParts::ZERO.is_canonical());
    }

    #[test]
    fn compact_format_picks_most_significant_units() {
        let days = TimeParts {
            days: 6,
            hours: 23,
            minutes: 50,
            seconds: 12,
        };
        assert_eq!(days.format_compact(), "6d 23h 50m");

        let hours = TimeParts {
            days: 0,
            hours: 3,
            minutes: 4,
            seconds: 5,
        };
        assert_eq!(hours.format_compact(), "3h 4m 5s");

        let minutes = TimeParts {
            days: 0,
            hours: 0,
            minutes: 9,
            seconds: 30,
        };
        assert_eq!(minutes.format_compact(), "9m 30s");
    }

    #[test]
    fn progress_is_clamped_to_percent_range() {
        assert_eq!(progress_pct(0, REFERENCE_TOTAL_SECS), 100.0);
        assert_eq!(progress_pct(REFERENCE_TOTAL_SECS, REFERENCE_TOTAL_SECS), 0.0);
        assert_eq!(
            progress_pct(REFERENCE_TOTAL_SECS * 2, REFERENCE_TOTAL_SECS),
            0.0
        );
        assert_eq!(progress_pct(5, 0), 100.0);

        let halfway = progress_pct(REFERENCE_TOTAL_SECS / 2, REFERENCE_TOTAL_SECS);
        assert!((halfway - 50.0).abs() < 1e-9);
    }
}
