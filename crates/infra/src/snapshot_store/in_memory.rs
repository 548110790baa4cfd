use std::io;
use std::sync::RwLock;

use gridpass_booking::BookingSystem;

use super::r#trait::{SnapshotStore, StorageError};
use super::schema;

/// In-memory snapshot store.
///
/// Keeps the encoded bytes rather than a clone, so saves and loads go through
/// the same schema as the file store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    bytes: RwLock<Option<Vec<u8>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored bytes verbatim (e.g. to simulate a damaged artifact).
    pub fn put_raw(&self, bytes: Vec<u8>) -> Result<(), StorageError> {
        let mut guard = self.bytes.write().map_err(|_| poisoned())?;
        *guard = Some(bytes);
        Ok(())
    }
}

fn poisoned() -> StorageError {
    StorageError::Io(io::Error::other("lock poisoned"))
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, system: &BookingSystem) -> Result<(), StorageError> {
        let encoded = schema::encode(system)?;
        self.put_raw(encoded)
    }

    fn load(&self) -> Result<BookingSystem, StorageError> {
        let guard = self.bytes.read().map_err(|_| poisoned())?;
        match guard.as_deref() {
            Some(bytes) => schema::decode(bytes),
            None => Err(StorageError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no snapshot saved",
            ))),
        }
    }

    fn exists(&self) -> bool {
        self.bytes.read().map(|b| b.is_some()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reports_missing() {
        let store = InMemorySnapshotStore::new();
        assert!(!store.exists());
        assert!(store.load().unwrap_err().is_missing());
    }

    #[test]
    fn save_then_load() {
        let store = InMemorySnapshotStore::new();
        let system = BookingSystem::seeded().unwrap();
        store.save(&system).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), system);
    }

    #[test]
    fn damaged_bytes_are_corrupt() {
        let store = InMemorySnapshotStore::new();
        store.put_raw(b"{\"schema_version\":1}".to_vec()).unwrap();
        assert!(matches!(
            store.load().unwrap_err(),
            StorageError::CorruptOrIncompatibleData(_)
        ));
    }
}
