//! Memory records, the store boundary, and the session memory manager.

mod error;
mod manager;
mod model;
mod scope;
mod store;

pub use error::MemoryStoreError;
pub use manager::MemoryManager;
pub use model::{EngagementMetrics, MemoryMessage, MemoryRecord, PostSnapshot};
pub use scope::UserScope;
pub use store::{HttpMemoryStore, MemoryStore};
