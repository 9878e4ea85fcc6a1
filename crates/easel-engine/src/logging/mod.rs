//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; `env_logger` is installed here, once, by the binary.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
