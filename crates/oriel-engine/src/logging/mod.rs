//! Logging utilities.
//!
//! Centralizes logger initialization; everything else uses the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
