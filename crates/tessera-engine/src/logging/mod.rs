//! Logging setup.
//!
//! The engine logs through the `log` facade only. Binaries pick the backend;
//! `init_logging` installs `env_logger` for the common case.

mod init;

pub use init::{init_logging, LoggingConfig};
