//! Ingestion and query entry points of the signal pipeline.
//!
//! Inbound adapters (the stdin loop, pollers, tests) drive the pipeline
//! through [`SignalService`] and never touch its in-memory state directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BotId, Stage, StrategyId};
use crate::error::{Error, Result, SignalError};

/// An outcome event as received from a caller.
///
/// `value` is kept as raw JSON so that validation happens inside the
/// pipeline, before any state is touched.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutcomeRequest {
    #[serde(default)]
    pub bot_id: Option<BotId>,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl OutcomeRequest {
    /// Request for a known bot with a numeric value.
    #[must_use]
    pub fn for_bot(bot_id: BotId, value: f64) -> Self {
        Self {
            bot_id: Some(bot_id),
            game_type: None,
            value: serde_json::json!(value),
        }
    }

    /// Request resolved to the default bot of a game type.
    #[must_use]
    pub fn for_game(game_type: impl Into<String>, value: f64) -> Self {
        Self {
            bot_id: None,
            game_type: Some(game_type.into()),
            value: serde_json::json!(value),
        }
    }

    /// Parse the outcome value.
    ///
    /// Accepts JSON numbers and numeric strings such as `"1.85"` or `"2.1x"`.
    /// Non-finite values are rejected.
    pub fn parse_value(&self) -> std::result::Result<f64, SignalError> {
        let parsed = match &self.value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                let trimmed = trimmed
                    .strip_suffix('x')
                    .or_else(|| trimmed.strip_suffix('X'))
                    .unwrap_or(trimmed);
                trimmed.parse::<f64>().ok()
            }
            _ => None,
        };

        match parsed {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(SignalError::InvalidPayload(format!(
                "invalid multiplier: {}",
                self.value
            ))),
        }
    }
}

/// Per-strategy status within an event report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// A pre-signal was handed off.
    Pre,
    /// A confirmed signal was handed off.
    Confirmed,
    /// The ledger already recorded this stage for this event.
    Suppressed,
    /// The hand-off or its bookkeeping failed.
    Error,
}

/// What happened for one (strategy, stage) pair during an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub strategy_id: StrategyId,
    pub name: String,
    pub stage: Stage,
    pub tail: usize,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Persisted game result, when one was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<i32>,
}

/// Result of processing one outcome event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub bot_id: BotId,
    pub game_type: String,
    pub event_index: u64,
    pub value: f64,
    pub buffer_len: usize,
    pub outcomes: Vec<StrategyOutcome>,
}

impl IngestReport {
    /// Outcomes with the given status.
    pub fn with_status(&self, status: OutcomeStatus) -> impl Iterator<Item = &StrategyOutcome> {
        self.outcomes.iter().filter(move |o| o.status == status)
    }

    /// Number of messages handed off during this event.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Pre | OutcomeStatus::Confirmed))
            .count()
    }
}

/// Structured error returned by the entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// One retained history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub bot_id: BotId,
    pub event_index: u64,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Distribution of retained values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
}

/// Statistics summary for a game type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub game_type: String,
    pub total_count: usize,
    /// Newest first.
    pub recent: Vec<HistoryEntry>,
    pub last_update: Option<DateTime<Utc>>,
    pub distribution: Option<Distribution>,
}

/// Driving port of the signal pipeline.
#[async_trait]
pub trait SignalService: Send + Sync {
    /// Process one outcome event.
    ///
    /// Event-level failures (`InvalidPayload`, `NoEligibleBot`, unknown bot)
    /// are returned as `Err` with no state change. Per-strategy failures are
    /// reported inside the returned report.
    async fn ingest(&self, request: OutcomeRequest) -> Result<IngestReport>;

    /// Summary of the retained history for a game type.
    fn summary(&self, game_type: &str) -> StatsSummary;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: serde_json::Value) -> OutcomeRequest {
        OutcomeRequest {
            value,
            ..Default::default()
        }
    }

    #[test]
    fn parses_numbers_and_numeric_strings() {
        assert_eq!(request(serde_json::json!(1.7)).parse_value(), Ok(1.7));
        assert_eq!(request(serde_json::json!(" 2.35 ")).parse_value(), Ok(2.35));
        assert_eq!(request(serde_json::json!("3.1x")).parse_value(), Ok(3.1));
        assert_eq!(request(serde_json::json!(2)).parse_value(), Ok(2.0));
    }

    #[test]
    fn rejects_non_numeric_values() {
        for value in [
            serde_json::json!("abc"),
            serde_json::json!(null),
            serde_json::json!(true),
            serde_json::json!([1.0]),
            serde_json::json!("NaN"),
        ] {
            let err = request(value).parse_value().unwrap_err();
            assert!(matches!(err, SignalError::InvalidPayload(_)));
        }
    }

    #[test]
    fn request_deserializes_with_optional_fields() {
        let req: OutcomeRequest = serde_json::from_str(r#"{"value": 1.5}"#).unwrap();
        assert!(req.bot_id.is_none());
        assert!(req.game_type.is_none());

        let req: OutcomeRequest =
            serde_json::from_str(r#"{"bot_id": 4, "game_type": "aviator", "value": "1.5"}"#)
                .unwrap();
        assert_eq!(req.bot_id, Some(BotId::new(4)));
    }

    #[test]
    fn error_body_carries_kind() {
        let err: Error = SignalError::NoEligibleBot("aviator".into()).into();
        let body = ErrorBody::from(&err);
        assert_eq!(body.kind, "no_eligible_bot");
        assert!(body.message.contains("aviator"));
    }
}
