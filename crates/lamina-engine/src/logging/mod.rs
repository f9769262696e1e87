//! Logger bootstrap.
//!
//! Library code logs through the `log` facade only; binaries opt into the
//! `env_logger` backend by calling `init_logging` early in `main`.

mod init;

pub use init::{LoggingConfig, init_logging};
