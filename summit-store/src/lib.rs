pub mod app_config;
pub mod snapshot;

pub use app_config::SummitConfig;
pub use snapshot::{FsBackend, MemoryBackend, SnapshotBackend, SnapshotError, SnapshotStore};
