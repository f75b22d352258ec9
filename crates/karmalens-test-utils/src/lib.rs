//! Test helpers shared across KarmaLens crates.

pub mod chat;
pub mod memory;
pub mod tools;

pub use chat::{FailingChat, FixedChat, RecordingChat};
pub use memory::{FailingMemoryStore, RecordingMemoryStore};
pub use tools::StaticToolset;
