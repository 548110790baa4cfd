use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use gridpass_booking::BookingSystem;

use super::r#trait::{SnapshotStore, StorageError};
use super::schema;

/// Write `system` to `destination`, replacing any prior content.
///
/// The snapshot is written to a sibling temporary file first and renamed into
/// place, so a crash mid-write never leaves a truncated snapshot behind.
pub fn save_snapshot(system: &BookingSystem, destination: &Path) -> Result<(), StorageError> {
    let bytes = schema::encode(system)?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(destination);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, destination)?;

    tracing::info!(
        path = %destination.display(),
        bytes = bytes.len(),
        orders = system.ledger().len(),
        "snapshot saved"
    );
    Ok(())
}

/// Read and re-link a system previously written by [`save_snapshot`].
pub fn load_snapshot(source: &Path) -> Result<BookingSystem, StorageError> {
    let bytes = fs::read(source)?;
    let system = schema::decode(&bytes).inspect_err(|err| {
        tracing::warn!(path = %source.display(), error = %err, "snapshot rejected");
    })?;

    tracing::info!(
        path = %source.display(),
        tickets = system.catalog().len(),
        users = system.directory().len(),
        orders = system.ledger().len(),
        "snapshot loaded"
    );
    Ok(system)
}

fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

/// Snapshot store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn save(&self, system: &BookingSystem) -> Result<(), StorageError> {
        save_snapshot(system, &self.path)
    }

    fn load(&self) -> Result<BookingSystem, StorageError> {
        load_snapshot(&self.path)
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}
