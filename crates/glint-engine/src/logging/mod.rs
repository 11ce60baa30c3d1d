//! Logging setup.
//!
//! The crate logs through the `log` facade only; [`init_logging`] is a
//! convenience for binaries that want the `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
