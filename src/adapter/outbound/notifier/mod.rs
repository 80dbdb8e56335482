//! Messaging adapters.
//!
//! Implements the [`Messenger`](crate::port::outbound::messenger::Messenger)
//! port for the Telegram Bot API and for a log-only fallback.

pub mod log;

#[cfg(feature = "telegram")]
pub mod telegram;
