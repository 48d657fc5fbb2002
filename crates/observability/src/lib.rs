//! Process-wide logging setup.

pub mod tracing;

/// Initialize tracing/logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
