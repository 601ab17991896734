//! Process-wide logging setup shared by every binary in the workspace.

/// Subscriber construction (filters, formatting).
pub mod tracing;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}
