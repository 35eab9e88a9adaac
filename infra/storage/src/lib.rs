//! Sandboxed document storage.
//!
//! The booking backend keeps its state in a handful of small documents (the event
//! settings and the registration ledger). This crate gives those documents a safe home:
//!
//! - **Sandbox**: every path is resolved under a canonical root; absolute paths and `..`
//!   escapes are rejected.
//! - **Atomic writes**: a document is written to a unique temp file, `fsync`ed, then
//!   renamed over the target, so readers only ever see a complete old or new version.
//! - **Self-healing**: orphaned temp files from a crash are swept on startup.
//! - **JSON helpers**: [`Storage::save_json`] writes serde types; [`Storage::read_optional`]
//!   treats a missing document as `None`.
//!
//! # Example
//!
//! ```rust
//! use slotbook_storage::{Storage, StorageError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("data");
//!     let storage = Storage::builder().root(&root).create(true).connect().await?;
//!
//!     storage.save_json("registrations.json", &vec!["a", "b"]).await?;
//!     let raw = storage.read_optional("registrations.json").await?.unwrap();
//!     let back: Vec<String> = serde_json::from_slice(&raw).unwrap();
//!     assert_eq!(back, ["a", "b"]);
//!
//!     assert!(storage.read_optional("missing.json").await?.is_none());
//!     Ok(())
//! }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod security;

pub use builder::StorageBuilder;
pub use engine::Storage;
pub use error::{StorageError, StorageErrorExt};
