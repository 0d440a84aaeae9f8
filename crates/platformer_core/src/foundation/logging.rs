//! Logging utilities and structured logging support
//!
//! The library only emits through the `log` facade. Binaries pick a backend
//! by calling [`init_with_level`] once at startup.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system with a fallback filter
///
/// `RUST_LOG` still wins when set; otherwise `default_filter` (for example
/// `"info"` or `"platformer_core=debug"`) is used.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    // Repeated initialization is ignored
    let _ = env_logger::Builder::from_env(env).try_init();
}
