use std::sync::Arc;

use thiserror::Error;

use gridpass_booking::BookingSystem;

/// Persistence failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the durable artifact failed.
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact could not be parsed, has an unknown schema version, or its
    /// internal references do not resolve.
    #[error("corrupt or incompatible snapshot: {0}")]
    CorruptOrIncompatibleData(String),
}

impl StorageError {
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptOrIncompatibleData(msg.into())
    }

    /// True when nothing has been saved at the location yet.
    pub fn is_missing(&self) -> bool {
        matches!(self, StorageError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Durable home for a booking system snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Replace whatever was stored with `system`.
    fn save(&self, system: &BookingSystem) -> Result<(), StorageError>;

    /// Reconstruct the last saved system.
    fn load(&self) -> Result<BookingSystem, StorageError>;

    /// Whether a snapshot has been saved.
    fn exists(&self) -> bool;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn save(&self, system: &BookingSystem) -> Result<(), StorageError> {
        (**self).save(system)
    }

    fn load(&self) -> Result<BookingSystem, StorageError> {
        (**self).load()
    }

    fn exists(&self) -> bool {
        (**self).exists()
    }
}
