//! Settings for the karmalens workspace.
//!
//! Every credential and identifier comes from the process environment,
//! loaded once at startup. Nothing here performs network calls; validation
//! happens before any client is constructed.

mod env;
mod error;
mod model;

pub use error::ConfigError;
pub use model::{MemorySettings, RedditSettings, RunnerSettings, Settings};
