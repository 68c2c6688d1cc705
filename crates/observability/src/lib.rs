//! Tracing and logging (shared setup).

pub use self::tracing::{LogFormat, ParseLogFormatError};

/// Initialize process-wide logging with the default (JSON) format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    self::tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
