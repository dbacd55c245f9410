//! Durable key/value persistence for settings and cache entries.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::Result;

/// A key/value store holding JSON documents.
///
/// Implementations use interior mutability so one store can be shared
/// between the settings and the cache.
pub trait Store: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Insert or replace the value under `key`.
    fn put(&self, key: &str, value: &Value) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
