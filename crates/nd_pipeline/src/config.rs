use nd_cluster::ClusterConfig;
use nd_core::{Error, Result};
use nd_sections::SectionLimits;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a run needs besides the batch and the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    pub cluster: ClusterConfig,
    pub section_limits: SectionLimits,
}

impl PipelineConfig {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Configuration(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            Error::Configuration(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.cluster.validate()
    }
}
