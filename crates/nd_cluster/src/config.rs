use nd_core::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;
pub const DEFAULT_MAX_CLUSTER_SIZE: usize = 10;
pub const DEFAULT_DESCRIPTION_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Minimum similarity for two articles to count as the same story.
    pub similarity_threshold: f64,
    /// Hard cap on members per cluster; full clusters stop accepting articles.
    pub max_cluster_size: usize,
    /// Publishers favoured when picking a representative. Matched case-insensitively.
    pub preferred_publishers: Vec<String>,
    /// Share of the score taken from description overlap, the rest from titles.
    pub description_weight: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_cluster_size: DEFAULT_MAX_CLUSTER_SIZE,
            preferred_publishers: Vec::new(),
            description_weight: DEFAULT_DESCRIPTION_WEIGHT,
        }
    }
}

impl ClusterConfig {
    pub fn new(similarity_threshold: f64, max_cluster_size: usize) -> Self {
        Self {
            similarity_threshold,
            max_cluster_size,
            ..Default::default()
        }
    }

    pub fn with_preferred_publishers<I, S>(mut self, publishers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_publishers = publishers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description_weight(mut self, weight: f64) -> Self {
        self.description_weight = weight;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::Configuration(format!(
                "similarityThreshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.max_cluster_size < 1 {
            return Err(Error::Configuration(
                "maxClusterSize must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.description_weight) {
            return Err(Error::Configuration(format!(
                "descriptionWeight must be within [0, 1], got {}",
                self.description_weight
            )));
        }
        Ok(())
    }

    pub fn is_preferred(&self, publisher: &str) -> bool {
        let publisher = publisher.trim();
        self.preferred_publishers
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(publisher))
    }
}
