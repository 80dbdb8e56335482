//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`]: builders for bots, strategies, and creation requests.
//! - [`messenger`]: a [`Messenger`](crate::port::outbound::messenger::Messenger)
//!   that records every hand-off and can be told to fail.

pub mod domain;
pub mod messenger;
