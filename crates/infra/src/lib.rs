//! Infrastructure layer: snapshot persistence, configuration and the
//! lock-guarded booking service.

pub mod config;
pub mod service;
pub mod snapshot_store;


pub use config::{BookingConfig, ConfigError};
pub use service::{BookingService, ServiceError, ServiceResult};
pub use snapshot_store::{
    InMemorySnapshotStore, JsonFileSnapshotStore, SnapshotStore, StorageError, load_snapshot,
    save_snapshot,
};
