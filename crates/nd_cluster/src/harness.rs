//! Synthetic batches for exercising the clustering engine outside production.

use chrono::{Duration, TimeZone, Utc};
use nd_core::{PreprocessStats, RawArticle, Result};
use serde::Serialize;

use crate::config::ClusterConfig;
use crate::engine::cluster;

/// Rough prompt cost of sending one article to a language model.
const TOKENS_PER_ARTICLE_OVERHEAD: usize = 12;
const CHARS_PER_TOKEN: usize = 4;

pub struct StoryTemplate {
    pub topic: &'static str,
    pub slug: &'static str,
    pub hint: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const STORY_TEMPLATES: [StoryTemplate; 8] = [
    StoryTemplate {
        topic: "Elections",
        slug: "elections",
        hint: "politics",
        title: "Senate passes sweeping election security bill",
        description: "Lawmakers approved new funding for voting machines and audits ahead of November.",
    },
    StoryTemplate {
        topic: "Economy",
        slug: "economy",
        hint: "business",
        title: "Federal Reserve holds interest rates steady",
        description: "Policymakers signalled patience as inflation cooled for a third straight month.",
    },
    StoryTemplate {
        topic: "Technology",
        slug: "technology",
        hint: "tech",
        title: "Chipmaker unveils faster AI processor",
        description: "The new silicon promises double the throughput for datacenter workloads.",
    },
    StoryTemplate {
        topic: "Space",
        slug: "space",
        hint: "science",
        title: "NASA probe captures images of distant comet",
        description: "Astronomers expect the icy visitor to brighten during its closest approach.",
    },
    StoryTemplate {
        topic: "Health",
        slug: "health",
        hint: "health",
        title: "Regulators approve updated flu vaccine",
        description: "Pharmacies begin offering shots next week across every state.",
    },
    StoryTemplate {
        topic: "Football",
        slug: "football",
        hint: "sports",
        title: "Underdog club clinches championship title",
        description: "Fans flooded downtown streets after a dramatic penalty shootout victory.",
    },
    StoryTemplate {
        topic: "Film",
        slug: "film",
        hint: "entertainment",
        title: "Festival jury awards documentary top prize",
        description: "Critics praised the director's intimate portrait of coastal fishermen.",
    },
    StoryTemplate {
        topic: "Diplomacy",
        slug: "diplomacy",
        hint: "world",
        title: "Leaders sign border ceasefire agreement",
        description: "Envoys brokered the deal after weeks of negotiations in Geneva.",
    },
];

pub const PUBLISHERS: [&str; 15] = [
    "BBC",
    "Reuters",
    "CNN",
    "Associated Press",
    "NPR",
    "Al Jazeera",
    "The Guardian",
    "Bloomberg",
    "Fox News",
    "NBC News",
    "CBS News",
    "ABC News",
    "Politico",
    "Axios",
    "USA Today",
];

/// Deterministic batch: article `i` covers template `i % 8` from publisher `i % 15`.
pub fn generate_batch(count: usize) -> Vec<RawArticle> {
    let base = Utc.with_ymd_and_hms(2024, 10, 1, 6, 0, 0).single().unwrap_or_default();
    (0..count)
        .map(|i| {
            let template = &STORY_TEMPLATES[i % STORY_TEMPLATES.len()];
            let publisher = PUBLISHERS[i % PUBLISHERS.len()];
            let domain = publisher.to_lowercase().replace(' ', "");
            RawArticle::new(
                template.title,
                &format!("https://{}.example.com/{}/{}", domain, template.slug, i),
                publisher,
                base + Duration::minutes(i as i64),
            )
            .with_description(&format!("{} Reported by {}.", template.description, publisher))
            .with_topic(template.topic, template.slug)
            .with_hints(&[template.hint])
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsEstimate {
    pub tokens_before: usize,
    pub tokens_after: usize,
    pub tokens_saved: usize,
    pub percent_saved: f64,
}

impl SavingsEstimate {
    pub fn between(before: &[RawArticle], after: &[RawArticle]) -> Self {
        let tokens_before: usize = before.iter().map(estimate_tokens).sum();
        let tokens_after: usize = after.iter().map(estimate_tokens).sum();
        let tokens_saved = tokens_before.saturating_sub(tokens_after);
        let percent_saved = if tokens_before == 0 {
            0.0
        } else {
            (tokens_saved as f64 / tokens_before as f64 * 1000.0).round() / 10.0
        };
        Self {
            tokens_before,
            tokens_after,
            tokens_saved,
            percent_saved,
        }
    }
}

fn estimate_tokens(article: &RawArticle) -> usize {
    let chars = article.title.chars().count() + article.description.chars().count();
    TOKENS_PER_ARTICLE_OVERHEAD + chars.div_ceil(CHARS_PER_TOKEN)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub config: ClusterConfig,
    pub stats: PreprocessStats,
    pub savings: SavingsEstimate,
    pub representatives: Vec<RawArticle>,
}

/// Cluster a generated batch of `count` articles and estimate what it saves downstream.
pub fn simulate(count: usize, config: &ClusterConfig) -> Result<SimulationReport> {
    let batch = generate_batch(count);
    let outcome = cluster(&batch, config)?;
    Ok(SimulationReport {
        config: config.clone(),
        stats: outcome.stats,
        savings: SavingsEstimate::between(&batch, &outcome.representatives),
        representatives: outcome.representatives,
    })
}
