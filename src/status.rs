//! Wire model of the investment status endpoint and its normalized outcome.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::TimeParts;

/// Raw JSON body of `GET /api/investment_status/{id}`. Unknown extra fields
/// (e.g. a human-readable `status` string) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub time_remaining: Option<TimeParts>,
    pub is_completed: bool,
    #[serde(default)]
    pub final_amount: Option<f64>,
}

impl StatusPayload {
    /// Rejects bodies outside the three known response shapes. Callers treat
    /// a rejection exactly like a transport failure.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(parts) = &self.time_remaining {
            if !parts.is_canonical() {
                return Err(format!(
                    "non-canonical time_remaining {}d {}h {}m {}s",
                    parts.days, parts.hours, parts.minutes, parts.seconds
                ));
            }
        }
        Ok(())
    }

    /// Normalizes the payload; a completed flag wins over any remaining time
    /// the body may also carry.
    pub fn into_outcome(self) -> StatusOutcome {
        if self.is_completed {
            StatusOutcome::Completed {
                final_amount: self.final_amount,
            }
        } else if let Some(remaining) = self.time_remaining {
            StatusOutcome::Running { remaining }
        } else {
            StatusOutcome::Pending
        }
    }
}

/// One refresh's worth of truth about an investment, either remote or from
/// the local fallback calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    Completed { final_amount: Option<f64> },
    Running { remaining: TimeParts },
    Pending,
}

#[derive(Debug, Error)]
pub enum StatusFetchError {
    #[error("status transport error: {0}")]
    Transport(String),
    #[error("status endpoint returned HTTP {0}")]
    HttpStatus(u16),
    #[error("status payload did not match a known shape: {0}")]
    MalformedPayload(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_payload_parses_and_normalizes() {
        let payload: StatusPayload = serde_json::from_str(
            r#"{"status":"active","is_completed":false,
                "time_remaining":{"days":6,"hours":23,"minutes":50,"seconds":0},
                "final_amount":null}"#,
        )
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(
            payload.into_outcome(),
            StatusOutcome::Running {
                remaining: TimeParts {
                    days: 6,
                    hours: 23,
                    minutes: 50,
                    seconds: 0
                }
            }
        );
    }

    #[test]
    fn completed_payload_carries_final_amount() {
        let payload: StatusPayload =
            serde_json::from_str(r#"{"is_completed":true,"final_amount":200.0}"#).unwrap();

        assert_eq!(
            payload.into_outcome(),
            StatusOutcome::Completed {
                final_amount: Some(200.0)
            }
        );
    }

    #[test]
    fn completed_flag_wins_over_remaining_time() {
        let payload: StatusPayload = serde_json::from_str(
            r#"{"is_completed":true,
                "time_remaining":{"days":0,"hours":0,"minutes":1,"seconds":0}}"#,
        )
        .unwrap();

        assert!(matches!(
            payload.into_outcome(),
            StatusOutcome::Completed { final_amount: None }
        ));
    }

    #[test]
    fn null_remaining_is_pending() {
        let payload: StatusPayload =
            serde_json::from_str(r#"{"is_completed":false,"time_remaining":null}"#).unwrap();

        assert_eq!(payload.into_outcome(), StatusOutcome::Pending);
    }

    #[test]
    fn non_canonical_units_fail_validation() {
        let payload: StatusPayload = serde_json::from_str(
            r#"{"is_completed":false,
                "time_remaining":{"days":0,"hours":30,"minutes":0,"seconds":0}}"#,
        )
        .unwrap();

        let err = payload.validate().unwrap_err();
        assert!(err.contains("non-canonical"));
    }

    #[test]
    fn missing_remaining_field_defaults_to_none() {
        let payload: StatusPayload = serde_json::from_str(r#"{"is_completed":false}"#).unwrap();
        assert_eq!(payload.time_remaining, None);
        assert_eq!(payload.into_outcome(), StatusOutcome::Pending);
    }
}
