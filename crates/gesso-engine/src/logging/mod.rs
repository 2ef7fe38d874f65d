//! Logging utilities.
//!
//! This module centralizes logger initialization and keeps the engine on
//! the standard `log` facade; hosts that bring their own backend can
//! simply skip [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
