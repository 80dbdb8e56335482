//! Inbound (driving) ports consumed by inbound adapters.
//!
//! - [`signal`]: outcome ingestion and statistics query

pub mod signal;

pub use signal::{
    Distribution, ErrorBody, HistoryEntry, IngestReport, OutcomeRequest, OutcomeStatus,
    SignalService, StatsSummary, StrategyOutcome,
};
