//! Logging and run observability.

mod logging;

pub use logging::setup_logging;
