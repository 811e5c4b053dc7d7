use async_trait::async_trait;
use crate::types::TopicNewsGroup;
use crate::Result;

/// The persisted topic groups together with the version they were read at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    pub topics: Vec<TopicNewsGroup>,
    pub version: u64,
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Load every persisted topic group.
    async fn load(&self) -> Result<StoreSnapshot>;

    /// Replace the persisted groups, provided nobody saved since `expected_version`.
    ///
    /// Returns the new version. A stale `expected_version` yields
    /// [`Error::MergeConflict`](crate::Error::MergeConflict) and leaves the store untouched.
    async fn save(&self, topics: &[TopicNewsGroup], expected_version: u64) -> Result<u64>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}
