//! Persistent key-value storage for the session

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

use crate::error::ClientError;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, ClientError>;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";
/// Key holding the serialized user profile
pub const USER_KEY: &str = "user";

/// String key-value store surviving restarts
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}
