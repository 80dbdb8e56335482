//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!        stdin / poller                      sqlite / memory
//!              │                                   ▲
//!              ▼                                   │
//!      ┌───────────────┐    ┌──────────────┐   ┌────────────┐
//!      │ SignalService │───▶│ Application  │──▶│ConfigStore │
//!      └───────────────┘    │              │   └────────────┘
//!                           │              │   ┌────────────┐
//!                           │              │──▶│ Messenger  │──▶ telegram / log
//!                           └──────────────┘   └────────────┘
//! ```

pub mod inbound;
pub mod outbound;

pub use inbound::{IngestReport, OutcomeRequest, SignalService, StatsSummary};
pub use outbound::messenger::{Delivery, Messenger};
pub use outbound::scorer::{ConfidenceScorer, ScoreInput};
pub use outbound::source::OutcomeSource;
pub use outbound::store::{BotStore, ConfigStore, GameResultStore, StrategyStore};
