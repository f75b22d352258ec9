//! Public surface for KarmaLens.
//!
//! Re-exports the building blocks and provides a small initialization
//! helper to keep consumer setup consistent.

pub use karmalens_config as config;
pub use karmalens_core as core;
pub use karmalens_memory as memory;
pub use karmalens_runner as runner;
pub use karmalens_tools as tools;

/// Initialize env_logger once; later calls are no-ops.
///
/// Binaries are expected to call this early in startup so log output is
/// wired up before the first external call.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
