//! The signal-detection and notification pipeline.
//!
//! - [`ring`], [`counter`], [`ledger`]: per-bot in-memory state pieces
//! - [`state`]: the process-wide owner of that state
//! - [`matcher`]: pattern evaluation
//! - [`filter`]: active-window check
//! - [`format`]: message rendering
//! - [`scorer`]: confidence scorers
//! - [`dispatcher`]: the per-event state machine

pub mod counter;
pub mod dispatcher;
pub mod filter;
pub mod format;
pub mod ledger;
pub mod matcher;
pub mod ring;
pub mod scorer;
pub mod state;

pub use dispatcher::{Clock, DispatchSettings, SignalDispatcher};
pub use scorer::{SeededScorer, TailScorer};
pub use state::SignalState;
