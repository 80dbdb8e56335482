//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! through ports.

pub mod catalog;
pub mod poller;
pub mod signal;
pub mod statistics;
