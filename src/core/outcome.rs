//! UI-facing result of an action

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of every failure message shown to the user
pub const ERROR_PREFIX: &str = "ERROR: ";

/// The single result every user action terminates with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    /// Text shown to the user (ledger response or error message)
    pub result: String,
    pub is_error: bool,
    pub is_success: bool,
    /// Wall-clock time spent on the action
    pub execution_time_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl TransactionOutcome {
    pub fn success(result: String) -> Self {
        Self {
            result,
            is_error: false,
            is_success: true,
            execution_time_ms: 0,
            completed_at: Utc::now(),
        }
    }

    /// A failed action; `message` is prefixed with `ERROR: ` unless it already is
    pub fn failure(message: &str) -> Self {
        let result = if message.starts_with(ERROR_PREFIX) {
            message.to_string()
        } else {
            format!("{}{}", ERROR_PREFIX, message)
        };

        Self {
            result,
            is_error: true,
            is_success: false,
            execution_time_ms: 0,
            completed_at: Utc::now(),
        }
    }

    /// A transaction the ledger rejected; the raw response is kept for diagnosis
    pub fn rejected(raw_response: String) -> Self {
        Self {
            result: raw_response,
            is_error: true,
            is_success: false,
            execution_time_ms: 0,
            completed_at: Utc::now(),
        }
    }

    pub fn with_execution_time(mut self, millis: u64) -> Self {
        self.execution_time_ms = millis;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_prefix() {
        let outcome = TransactionOutcome::failure("Seed cannot be empty");
        assert_eq!(outcome.result, "ERROR: Seed cannot be empty");
        assert!(outcome.is_error);
        assert!(!outcome.is_success);

        let already = TransactionOutcome::failure("ERROR: boom");
        assert_eq!(already.result, "ERROR: boom");
    }

    #[test]
    fn test_success_and_rejected_flags() {
        let ok = TransactionOutcome::success("{}".to_string()).with_execution_time(15);
        assert!(ok.is_success && !ok.is_error);
        assert_eq!(ok.execution_time_ms, 15);

        let rejected = TransactionOutcome::rejected("{\"result\":\"tecNO_DST\"}".to_string());
        assert!(rejected.is_error && !rejected.is_success);
        assert!(rejected.result.contains("tecNO_DST"));
    }
}
