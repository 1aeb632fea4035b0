#![forbid(unsafe_code)]

pub mod records;
pub mod store;

pub use records::{DisplaySettingsRecord, SessionStateRecord};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
