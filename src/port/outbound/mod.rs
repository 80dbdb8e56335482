//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators of the signal pipeline:
//! configuration storage, message delivery, confidence scoring, and the
//! outcome feed used by pollers.

pub mod messenger;
pub mod scorer;
pub mod source;
pub mod store;
