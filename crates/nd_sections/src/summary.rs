use nd_core::{ArticlesSummary, TopicNewsGroup};
use std::collections::HashSet;

pub fn summarize(topics: &[TopicNewsGroup]) -> ArticlesSummary {
    let publishers: HashSet<&str> = topics.iter().map(|t| t.publisher.as_str()).collect();
    ArticlesSummary {
        total_articles: topics.iter().map(|t| t.items.len()).sum(),
        total_topics: topics.len(),
        total_publishers: publishers.len(),
    }
}
