//! Log-only messenger.
//!
//! Used when Telegram delivery is disabled (or compiled out). Every message
//! is written to the tracing output and reported as delivered, so the
//! pipeline behaves exactly as it would with a live transport.

use async_trait::async_trait;
use tracing::info;

use crate::domain::Credentials;
use crate::error::Result;
use crate::port::outbound::messenger::{Delivery, Messenger};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogMessenger;

#[async_trait]
impl Messenger for LogMessenger {
    async fn send(&self, credentials: &Credentials, text: &str) -> Result<Delivery> {
        info!(
            destination = %credentials.destination,
            chars = text.chars().count(),
            text = %text,
            "Signal message"
        );
        Ok(Delivery::delivered("logged"))
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
