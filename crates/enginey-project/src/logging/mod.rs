//! Logger setup for tools that load YScript projects.
//!
//! The front-end crates only emit through the `log` facade; binaries call
//! [`init_logging`] once to pick a backend and filter.

mod init;

pub use init::{LoggingConfig, init_logging};
