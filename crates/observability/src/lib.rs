//! Logging setup shared by every binary and test harness.

pub mod subscriber;

pub use subscriber::{LogFormat, init_with};

/// Initialize process-wide logging using `RUST_LOG` and `GRIDPASS_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init_with(LogFormat::from_env());
}
