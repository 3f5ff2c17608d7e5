//! Storage module for signer and key persistence

pub mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
