//! Core trait for the key-value storage layers.
//!
//! The `KeyValueStore` trait provides a domain-agnostic key-value interface.
//! Both storage layers (the moka-backed memory layer and the durable disk
//! layer) implement this trait, so callers can stack them without caring
//! which backend sits behind a key.
//!
//! # Design Principles
//!
//! - **String keys**: Human-readable for debugging, flexible for any domain
//! - **Vec<u8> values**: Raw bytes, no serialization opinions imposed
//! - **Minimal interface**: Only essential operations
//! - **Dyn-compatible**: Uses `Pin<Box<dyn Future>>` for trait object support
//!
//! A failed deserialization of a stored value is a caller concern: from the
//! store's point of view the key exists and the bytes are returned. Callers
//! that cannot parse a value treat it as a miss and re-derive it.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error while reading or writing the backing storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped onto the backing storage.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Generic key-value storage interface.
///
/// Implementations must be `Send + Sync` so a store can be shared across
/// async tasks behind an `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Store a value with the given key, replacing any existing value.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Retrieve a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` if the key exists
    /// - `Ok(None)` if the key is not found
    /// - `Err(_)` if an error occurs
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>>;

    /// Delete a value by key.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the key existed and was deleted
    /// - `Ok(false)` if the key did not exist
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>>;

    /// Check if a key exists without retrieving the value.
    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, StoreError>>;
}
