//! Logging utilities
//!
//! The library itself only talks to the `log` facade; binaries pick the
//! backend by calling [`init`] (or installing their own logger) once at
//! startup.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}
