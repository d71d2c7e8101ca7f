use async_trait::async_trait;
use eyre::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Maximum number of announced contracts kept in state
pub const RETENTION_CAP: usize = 200;

/// Contracts already alerted on, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnouncedState {
    #[serde(default)]
    pub recents: Vec<String>,
}

impl AnnouncedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact-match membership scan; empty entries are ignored
    pub fn contains(&self, address: &str) -> bool {
        self.recents
            .iter()
            .any(|recent| !recent.is_empty() && recent == address)
    }

    pub fn record(&mut self, address: String) {
        self.recents.push(address);
    }

    /// Drops the two oldest entries once over the cap. The trim is a fixed
    /// two-element step per run, so a single run may leave the list over the
    /// cap; kept as-is for behavioral compatibility.
    pub fn trim(&mut self) {
        if self.recents.len() > RETENTION_CAP {
            self.recents.drain(..2);
        }
    }
}

/// Durable blob store keyed by (bucket, key)
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns None when the blob does not exist
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()>;
}

/// Blob store rooted in a local directory, one file per (bucket, key)
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn blob_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.blob_path(bucket, key);
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        let path = self.blob_path(bucket, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        Ok(())
    }
}

/// Load the announced state, falling back to an empty one when the blob is
/// missing or unreadable.
pub async fn load_state(store: &dyn BlobStore, bucket: &str, key: &str) -> AnnouncedState {
    match store.get(bucket, key).await {
        Ok(Some(data)) => match serde_json::from_slice(&data) {
            Ok(state) => state,
            Err(e) => {
                warn!("Undecodable announced state at {}/{}: {}", bucket, key, e);
                AnnouncedState::new()
            }
        },
        Ok(None) => {
            info!("No announced state at {}/{}, starting fresh", bucket, key);
            AnnouncedState::new()
        }
        Err(e) => {
            warn!("Failed to read announced state at {}/{}: {}", bucket, key, e);
            AnnouncedState::new()
        }
    }
}

/// Persist the announced state as a JSON blob
pub async fn save_state(
    store: &dyn BlobStore,
    bucket: &str,
    key: &str,
    state: &AnnouncedState,
) -> Result<()> {
    let data = serde_json::to_vec(state)?;
    store.put(bucket, key, data).await
}
