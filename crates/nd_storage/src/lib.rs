use nd_core::{ArticleStore, Error, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

/// Build a store by name: `memory` or `json`. `json` without a path uses `articles.json`.
pub async fn create_storage(kind: &str, path: Option<&Path>) -> Result<Arc<dyn ArticleStore>> {
    let storage: Arc<dyn ArticleStore> = match (kind, path) {
        ("memory", _) => Arc::new(MemoryStorage::new().await?),
        ("json", path) => {
            let path = path.unwrap_or(JsonFileStorage::default_path());
            Arc::new(JsonFileStorage::open(path).await?)
        }
        (other, _) => {
            return Err(Error::Configuration(format!(
                "Unknown storage backend: {} (expected memory or json)",
                other
            )))
        }
    };
    info!("💾 Using {} storage", storage.name());
    Ok(storage)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::create_storage;
    pub use nd_core::{ArticleStore, StoreSnapshot};
}
