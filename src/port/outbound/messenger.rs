//! Messaging port for signal hand-off.
//!
//! The pipeline formats a message and hands it to a [`Messenger`]. The
//! transport (Telegram, a log line, a test recorder) lives in adapters.

use async_trait::async_trait;

use crate::domain::Credentials;
use crate::error::Result;

/// Outcome of a hand-off that did not raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: bool,
    pub detail: String,
}

impl Delivery {
    #[must_use]
    pub fn delivered(detail: impl Into<String>) -> Self {
        Self {
            delivered: true,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn rejected(detail: impl Into<String>) -> Self {
        Self {
            delivered: false,
            detail: detail.into(),
        }
    }
}

/// Port for delivering a pre-formatted text to a messaging destination.
///
/// A returned `Delivery { delivered: false, .. }` is a soft failure: callers
/// log it and do not retry. `Err` covers transport failures.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `text` to the destination named by `credentials`.
    async fn send(&self, credentials: &Credentials, text: &str) -> Result<Delivery>;

    /// Name for logs.
    fn name(&self) -> &'static str;
}
