//! Recording messenger for dispatch assertions.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::Credentials;
use crate::error::{Error, Result};
use crate::port::outbound::messenger::{Delivery, Messenger};

/// A message captured by [`RecordingMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub destination: String,
    pub text: String,
}

enum Scripted {
    Reject(String),
    Fail(String),
}

/// Thread-safe messenger that records deliveries instead of sending them.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<SentMessage>>,
    script: Mutex<VecDeque<Scripted>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next send return an undelivered response with `detail`.
    pub fn fail_next(&self, detail: &str) {
        self.script
            .lock()
            .push_back(Scripted::Reject(detail.to_string()));
    }

    /// Make the next send raise a messaging error.
    pub fn error_next(&self, message: &str) {
        self.script
            .lock()
            .push_back(Scripted::Fail(message.to_string()));
    }

    /// Number of delivered messages.
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn messages(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn last(&self) -> Option<SentMessage> {
        self.sent.lock().last().cloned()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, credentials: &Credentials, text: &str) -> Result<Delivery> {
        let scripted = self.script.lock().pop_front();
        match scripted {
            Some(Scripted::Reject(detail)) => Ok(Delivery::rejected(detail)),
            Some(Scripted::Fail(message)) => Err(Error::Messaging(message)),
            None => {
                self.sent.lock().push(SentMessage {
                    destination: credentials.destination.clone(),
                    text: text.to_string(),
                });
                Ok(Delivery::delivered("recorded"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
