use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io failure for '{store}': {source}")]
    Io {
        store: String,
        #[source]
        source: io::Error,
    },

    #[error("snapshot encode failure for '{store}': {source}")]
    Encode {
        store: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable storage for named JSON blobs. Object-safe so deployments can
/// swap the filesystem out for a memory-only adapter.
pub trait SnapshotBackend: Send + Sync {
    fn read(&self, name: &str) -> Result<Option<String>, SnapshotError>;
    fn write(&self, name: &str, payload: &str) -> Result<(), SnapshotError>;
}

/// One `<name>.json` file per store under a data directory. Writes go
/// through a temp file and rename so a crashed write never truncates an
/// existing snapshot.
pub struct FsBackend {
    dir: PathBuf,
}

impl FsBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl SnapshotBackend for FsBackend {
    fn read(&self, name: &str) -> Result<Option<String>, SnapshotError> {
        match fs::read_to_string(self.path(name)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SnapshotError::Io {
                store: name.to_string(),
                source: err,
            }),
        }
    }

    fn write(&self, name: &str, payload: &str) -> Result<(), SnapshotError> {
        let io_err = |source| SnapshotError::Io {
            store: name.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        fs::write(&tmp, payload).map_err(io_err)?;
        fs::rename(&tmp, self.path(name)).map_err(io_err)?;
        Ok(())
    }
}

/// Memory-only adapter for tests and read-only deployments: nothing is
/// loaded at startup and writes outlive nothing but the process.
#[derive(Default)]
pub struct MemoryBackend {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotBackend for MemoryBackend {
    fn read(&self, name: &str) -> Result<Option<String>, SnapshotError> {
        let blobs = self.blobs.lock().expect("snapshot map poisoned");
        Ok(blobs.get(name).cloned())
    }

    fn write(&self, name: &str, payload: &str) -> Result<(), SnapshotError> {
        let mut blobs = self.blobs.lock().expect("snapshot map poisoned");
        blobs.insert(name.to_string(), payload.to_string());
        Ok(())
    }
}

/// Load/save of a named JSON document. Loads are lenient (a missing or
/// corrupt snapshot yields `None` and a warning); saves are fire-and-forget:
/// a failed write is logged and swallowed, leaving the in-memory state
/// authoritative for the rest of the process.
#[derive(Clone)]
pub struct SnapshotStore {
    backend: Arc<dyn SnapshotBackend>,
}

impl SnapshotStore {
    pub fn new(backend: Arc<dyn SnapshotBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        match self.backend.read(name) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(store = name, %err, "discarding unreadable snapshot");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(store = name, %err, "snapshot read failed");
                None
            }
        }
    }

    pub fn persist<T: Serialize + ?Sized>(&self, name: &str, value: &T) {
        let payload = match serde_json::to_string_pretty(value) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(store = name, %err, "snapshot encode failed");
                return;
            }
        };
        if let Err(err) = self.backend.write(name, &payload) {
            tracing::warn!(store = name, %err, "snapshot write failed; continuing unpersisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("summit-store-{tag}-{}-{nanos}", std::process::id()))
    }

    #[test]
    fn test_fs_round_trip() {
        let dir = unique_dir("roundtrip");
        let store = SnapshotStore::new(Arc::new(FsBackend::new(&dir)));

        assert_eq!(store.load::<Vec<u32>>("numbers"), None);

        store.persist("numbers", &vec![1u32, 2, 3]);
        assert_eq!(store.load::<Vec<u32>>("numbers"), Some(vec![1, 2, 3]));

        // Overwrite replaces, not appends
        store.persist("numbers", &vec![9u32]);
        assert_eq!(store.load::<Vec<u32>>("numbers"), Some(vec![9]));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_snapshot_is_discarded() {
        let backend = Arc::new(MemoryBackend::new());
        backend.write("events", "{ not json").unwrap();

        let store = SnapshotStore::new(backend);
        assert_eq!(store.load::<Vec<u32>>("events"), None);
    }

    #[test]
    fn test_memory_backend_isolated_per_name() {
        let store = SnapshotStore::in_memory();
        store.persist("a", &1u32);
        store.persist("b", &2u32);

        assert_eq!(store.load::<u32>("a"), Some(1));
        assert_eq!(store.load::<u32>("b"), Some(2));
        assert_eq!(store.load::<u32>("c"), None);
    }
}
