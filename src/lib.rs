//! Roasbot - game-outcome pattern detection with Telegram signal dispatch.
//!
//! Outcome events (crash multipliers and similar) are fed in one at a time.
//! Each event is matched against the configured strategies of its bot; when a
//! pattern is about to complete or completes, a formatted signal is handed to
//! a messenger exactly once and the dispatch is recorded.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Pure value types: bots, strategies, patterns, results
//! - [`port`] - Inbound entry points and outbound collaborator traits
//! - [`application`] - The signal pipeline, statistics, catalog, pollers
//! - [`adapter`] - SQLite and in-memory stores, Telegram and log messengers,
//!   and the CLI
//! - [`infrastructure`] - Configuration and the composition root
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Deliver signals through the Telegram Bot API
//! - `testkit` - Builders and a recording messenger for tests
//!
//! # Example
//!
//! ```no_run
//! use roasbot::infrastructure::bootstrap::App;
//! use roasbot::infrastructure::config::settings::Config;
//! use roasbot::port::inbound::signal::{OutcomeRequest, SignalService};
//!
//! # async fn demo() -> roasbot::error::Result<()> {
//! let app = App::build(Config::load("config.toml")?)?;
//! let report = app
//!     .dispatcher
//!     .ingest(OutcomeRequest::for_game("aviator", 1.42))
//!     .await?;
//! println!("{} signal(s) dispatched", report.dispatched());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
