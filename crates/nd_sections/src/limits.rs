use nd_core::{normalize_link, Section};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

use crate::classifier::ClassifiedArticle;

const DEFAULT_LIMITS: [(Section, usize); 9] = [
    (Section::Politics, 6),
    (Section::Business, 5),
    (Section::Technology, 5),
    (Section::Science, 4),
    (Section::Health, 4),
    (Section::Sports, 4),
    (Section::Entertainment, 3),
    (Section::World, 6),
    (Section::General, 8),
];

/// Maximum number of articles surfaced per section.
///
/// Deserializes from a partial map; sections left out keep their default cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Section, usize>", into = "BTreeMap<Section, usize>")]
pub struct SectionLimits(BTreeMap<Section, usize>);

impl Default for SectionLimits {
    fn default() -> Self {
        Self(DEFAULT_LIMITS.into_iter().collect())
    }
}

impl From<BTreeMap<Section, usize>> for SectionLimits {
    fn from(overrides: BTreeMap<Section, usize>) -> Self {
        let mut limits = Self::default();
        limits.0.extend(overrides);
        limits
    }
}

impl From<SectionLimits> for BTreeMap<Section, usize> {
    fn from(limits: SectionLimits) -> Self {
        limits.0
    }
}

impl SectionLimits {
    pub fn limit(&self, section: Section) -> usize {
        self.0.get(&section).copied().unwrap_or(0)
    }

    pub fn set(&mut self, section: Section, limit: usize) {
        self.0.insert(section, limit);
    }
}

/// Ordering used whenever a section is truncated: explicit assignments first,
/// then newest first, then by normalized link so the result never depends on input order.
pub fn rank(a: &ClassifiedArticle, b: &ClassifiedArticle) -> Ordering {
    let key = |c: &ClassifiedArticle| {
        (
            Reverse(c.classification.is_explicit()),
            Reverse(c.article.pub_date),
            c.article.link.as_deref().map(normalize_link),
        )
    };
    key(a).cmp(&key(b))
}

/// Buckets articles by section, each bucket ranked and capped to its limit.
pub fn select_for_sections(
    articles: Vec<ClassifiedArticle>,
    limits: &SectionLimits,
) -> BTreeMap<Section, Vec<ClassifiedArticle>> {
    let mut buckets: BTreeMap<Section, Vec<ClassifiedArticle>> = BTreeMap::new();
    for article in articles {
        buckets
            .entry(article.classification.section)
            .or_default()
            .push(article);
    }

    for (section, bucket) in buckets.iter_mut() {
        bucket.sort_by(rank);
        let limit = limits.limit(*section);
        if bucket.len() > limit {
            tracing::debug!("✂️ Truncating {} from {} to {}", section, bucket.len(), limit);
            bucket.truncate(limit);
        }
    }
    buckets.retain(|_, bucket| !bucket.is_empty());
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classification, Origin};
    use chrono::{Duration, TimeZone, Utc};
    use nd_core::RawArticle;

    fn classified(link: &str, hours: i64, section: Section, origin: Origin) -> ClassifiedArticle {
        let date = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap() + Duration::hours(hours);
        ClassifiedArticle {
            article: RawArticle::new("Story", link, "AP", date),
            classification: Classification { section, origin },
        }
    }

    #[test]
    fn test_partial_limits_keep_defaults() {
        let limits: SectionLimits = serde_json::from_str(r#"{"sports": 1}"#).unwrap();
        assert_eq!(limits.limit(Section::Sports), 1);
        assert_eq!(limits.limit(Section::World), 6);
    }

    #[test]
    fn test_hinted_articles_survive_truncation_before_newer_ones() {
        let mut limits = SectionLimits::default();
        limits.set(Section::Sports, 2);
        let articles = vec![
            classified("https://a.com/old-hinted", 1, Section::Sports, Origin::Hint),
            classified("https://a.com/newest", 9, Section::Sports, Origin::Keyword),
            classified("https://a.com/newer", 5, Section::Sports, Origin::Keyword),
            classified("https://a.com/politics", 3, Section::Politics, Origin::Fallback),
        ];

        let selected = select_for_sections(articles, &limits);
        let sports: Vec<&str> = selected[&Section::Sports]
            .iter()
            .map(|c| c.article.link.as_deref().unwrap())
            .collect();
        assert_eq!(sports, vec!["https://a.com/old-hinted", "https://a.com/newest"]);
        assert_eq!(selected[&Section::Politics].len(), 1);
    }

    #[test]
    fn test_ranking_ignores_input_order() {
        let a = classified("https://a.com/a", 4, Section::World, Origin::Keyword);
        let b = classified("https://a.com/b", 4, Section::World, Origin::Keyword);
        let limits = SectionLimits::default();
        let forward = select_for_sections(vec![a.clone(), b.clone()], &limits);
        let backward = select_for_sections(vec![b, a], &limits);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_zero_limit_drops_section() {
        let mut limits = SectionLimits::default();
        limits.set(Section::General, 0);
        let selected = select_for_sections(
            vec![classified("https://a.com/x", 0, Section::General, Origin::Fallback)],
            &limits,
        );
        assert!(selected.is_empty());
    }
}
