//! Whole-snapshot persistence boundary.
//!
//! The booking system is saved and restored as one unit; there is no partial
//! save or load. The on-disk shape is the explicit, versioned schema in
//! [`schema`], never a dump of the in-memory types.

pub mod file;
pub mod in_memory;
pub mod schema;
pub mod r#trait;

pub use file::{JsonFileSnapshotStore, load_snapshot, save_snapshot};
pub use in_memory::InMemorySnapshotStore;
pub use schema::{SCHEMA_VERSION, SnapshotRecord};
pub use r#trait::{SnapshotStore, StorageError};
