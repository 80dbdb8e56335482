//! Infrastructure configuration modules.

pub mod logging;
pub mod poller;
pub mod settings;
pub mod signal;
pub mod telegram;
