use async_trait::async_trait;
use nd_core::{ArticleStore, Error, Result, StoreSnapshot, TopicNewsGroup};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    topics: Vec<TopicNewsGroup>,
    version: u64,
}

impl MemoryStore {
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            topics: self.topics.clone(),
            version: self.version,
        }
    }

    pub fn replace(&mut self, topics: &[TopicNewsGroup], expected_version: u64) -> Result<u64> {
        if self.version != expected_version {
            return Err(Error::MergeConflict {
                expected: expected_version,
                found: self.version,
            });
        }
        self.topics = topics.to_vec();
        self.version += 1;
        Ok(self.version)
    }
}

/// Process-local store, mostly for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub async fn new() -> Result<Self> {
        Ok(Self::default())
    }

    pub async fn with_topics(topics: Vec<TopicNewsGroup>) -> Result<Self> {
        Ok(Self {
            store: Arc::new(RwLock::new(MemoryStore { topics, version: 0 })),
        })
    }
}

#[async_trait]
impl ArticleStore for MemoryStorage {
    async fn load(&self) -> Result<StoreSnapshot> {
        let store = self.store.read().await;
        Ok(store.snapshot())
    }

    async fn save(&self, topics: &[TopicNewsGroup], expected_version: u64) -> Result<u64> {
        let mut store = self.store.write().await;
        store.replace(topics, expected_version)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
