use async_trait::async_trait;
use fs2::FileExt;
use nd_core::{ArticleStore, Error, Result, StoreSnapshot, TopicNewsGroup};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const DEFAULT_PATH: &str = "articles.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u64,
    topics: Vec<TopicNewsGroup>,
}

impl StoreFile {
    fn parse(read: std::io::Result<Vec<u8>>) -> Result<Self> {
        match read {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Store kept as one JSON document, replaced atomically on every save.
///
/// Saves hold an exclusive lock on a sibling `.lock` file from the version
/// check until the new document is renamed into place, so writers in other
/// instances or processes see each other's versions.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create store directory {}: {}", parent.display(), e))
            })?;
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn default_path() -> &'static Path {
        Path::new(DEFAULT_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        file.lock_exclusive()?;
        Ok(file)
    }

    /// Blocking check-and-write; the lock is released when `_lock` drops.
    fn save_locked(&self, topics: Vec<TopicNewsGroup>, expected_version: u64) -> Result<u64> {
        let _lock = self.lock()?;

        let current = StoreFile::parse(std::fs::read(&self.path))?;
        if current.version != expected_version {
            return Err(Error::MergeConflict {
                expected: expected_version,
                found: current.version,
            });
        }

        let next = StoreFile {
            version: current.version + 1,
            topics,
        };
        let mut temp = NamedTempFile::new_in(self.dir())?;
        serde_json::to_writer_pretty(&mut temp, &next)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        debug!(
            "💾 Wrote {} topics to {} (version {})",
            next.topics.len(),
            self.path.display(),
            next.version
        );

        Ok(next.version)
    }
}

#[async_trait]
impl ArticleStore for JsonFileStorage {
    async fn load(&self) -> Result<StoreSnapshot> {
        let file = StoreFile::parse(tokio::fs::read(&self.path).await)?;
        Ok(StoreSnapshot {
            topics: file.topics,
            version: file.version,
        })
    }

    async fn save(&self, topics: &[TopicNewsGroup], expected_version: u64) -> Result<u64> {
        let storage = self.clone();
        let topics = topics.to_vec();
        tokio::task::spawn_blocking(move || storage.save_locked(topics, expected_version))
            .await
            .map_err(|e| Error::Storage(format!("Store writer task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "json"
    }
}
