use chrono::Utc;
use nd_cluster::cluster;
use nd_core::{ArticleStore, ArticlesSummary, PreprocessStats, RawArticle, Result, Section, TopicNewsGroup};
use nd_sections::merge::sort_topics;
use nd_sections::{
    classify_with_plan, group_by_slug, merge, select_for_sections, summarize, ClassifiedArticle,
    SectionPlan,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::logging::Logger;

/// What one fetch batch did to the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub stats: PreprocessStats,
    pub appended_articles: usize,
    pub summary: ArticlesSummary,
    pub store_version: u64,
    /// This run's representatives per section, ranked and capped by the section limits.
    pub digest: BTreeMap<Section, Vec<ClassifiedArticle>>,
}

/// Runs cluster, classify and merge for each fetched batch against one store.
///
/// The store must not be merged into by two runs at once; a run that loses
/// the race fails with a merge conflict and leaves the store as the winner wrote it.
pub struct PipelineManager {
    storage: Arc<dyn ArticleStore>,
    config: PipelineConfig,
}

impl PipelineManager {
    pub fn new(storage: Arc<dyn ArticleStore>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { storage, config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn run(&self, batch: &[RawArticle], plan: Option<&SectionPlan>) -> Result<RunReport> {
        let logger = Logger::new().with_prefix(format!("[run {}]", Utc::now().format("%Y%m%d-%H%M%S")));
        logger.info(&format!("📰 Processing batch of {} articles", batch.len()));

        let outcome = cluster(batch, &self.config.cluster)?;
        if outcome.stats.malformed_count > 0 {
            logger.warn(&format!(
                "⚠️ Skipped {} malformed articles of {}",
                outcome.stats.malformed_count, outcome.stats.original_count
            ));
        }

        let classified: Vec<ClassifiedArticle> = outcome
            .representatives
            .into_iter()
            .map(|article| {
                let classification = classify_with_plan(&article, plan);
                ClassifiedArticle { article, classification }
            })
            .collect();
        let appended = group_by_slug(&classified);
        let digest = select_for_sections(classified, &self.config.section_limits);

        let merge_logger = logger.clone().with_prefix("[merge]".to_string());
        let snapshot = self.storage.load().await?;
        merge_logger.debug(&format!(
            "Loaded {} topics at version {} from {} storage",
            snapshot.topics.len(),
            snapshot.version,
            self.storage.name()
        ));

        let merged = merge(snapshot.topics, appended);
        let store_version = match self.storage.save(&merged.topics, snapshot.version).await {
            Ok(version) => version,
            Err(e) => {
                merge_logger.error(&format!("Store left unchanged: {}", e));
                return Err(e);
            }
        };
        let summary = summarize(&merged.topics);

        logger.info(&format!(
            "✨ Stored {} new articles; store has {} articles in {} topics from {} publishers",
            merged.appended_articles, summary.total_articles, summary.total_topics, summary.total_publishers
        ));

        Ok(RunReport {
            stats: outcome.stats,
            appended_articles: merged.appended_articles,
            summary,
            store_version,
            digest,
        })
    }

    /// Stored groups ordered by publisher then topic.
    pub async fn topics(&self) -> Result<Vec<TopicNewsGroup>> {
        let mut topics = self.storage.load().await?.topics;
        sort_topics(&mut topics);
        Ok(topics)
    }

    pub async fn summary(&self) -> Result<ArticlesSummary> {
        Ok(summarize(&self.topics().await?))
    }
}
