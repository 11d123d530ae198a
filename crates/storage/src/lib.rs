#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{AttemptLog, InMemoryAttemptLog, Storage, StorageError};
