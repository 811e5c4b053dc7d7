use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// An article as handed over by the feed fetcher.
///
/// `link` and `pub_date` are optional on the wire; records missing either are
/// malformed and get skipped by the clustering engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub section_hints: Vec<String>,
}

impl RawArticle {
    pub fn new(title: &str, link: &str, publisher: &str, pub_date: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            link: Some(link.to_string()),
            publisher: publisher.to_string(),
            source: publisher.to_string(),
            pub_date: Some(pub_date),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_topic(mut self, topic: &str, slug: &str) -> Self {
        self.topic = topic.to_string();
        self.slug = slug.to_string();
        self
    }

    pub fn with_hints(mut self, hints: &[&str]) -> Self {
        for hint in hints {
            if !self.section_hints.iter().any(|h| h == hint) {
                self.section_hints.push(hint.to_string());
            }
        }
        self
    }

    /// Returns the link and publication date, or the reason the record is unusable.
    pub fn required_fields(&self, index: usize) -> Result<(&str, DateTime<Utc>)> {
        let link = self
            .link
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| Error::MalformedRecord {
                index,
                reason: "missing link".to_string(),
            })?;
        let pub_date = self.pub_date.ok_or_else(|| Error::MalformedRecord {
            index,
            reason: format!("missing pubDate for {}", link),
        })?;
        Ok((link, pub_date))
    }
}

/// Editorial sections. `General` is the wildcard every unmatched article lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Politics,
    Business,
    Technology,
    Science,
    Health,
    Sports,
    Entertainment,
    World,
    General,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Politics,
        Section::Business,
        Section::Technology,
        Section::Science,
        Section::Health,
        Section::Sports,
        Section::Entertainment,
        Section::World,
        Section::General,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Politics => "politics",
            Section::Business => "business",
            Section::Technology => "technology",
            Section::Science => "science",
            Section::Health => "health",
            Section::Sports => "sports",
            Section::Entertainment => "entertainment",
            Section::World => "world",
            Section::General => "general",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Section::ALL
            .iter()
            .copied()
            .find(|section| section.key() == wanted)
            .ok_or_else(|| Error::Configuration(format!("Unknown section: {}", s)))
    }
}

/// A stored article inside a [`TopicNewsGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub publisher: String,
    pub source: String,
    pub pub_date: DateTime<Utc>,
    pub section: Section,
}

impl NewsItem {
    pub fn from_raw(article: &RawArticle, index: usize, section: Section) -> Result<Self> {
        let (link, pub_date) = article.required_fields(index)?;
        Ok(Self {
            title: article.title.clone(),
            description: article.description.clone(),
            link: link.to_string(),
            publisher: article.publisher.clone(),
            source: article.source.clone(),
            pub_date,
            section,
        })
    }
}

/// Persisted bucket of articles sharing a `slug`, newest item first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicNewsGroup {
    pub topic: String,
    pub slug: String,
    pub publisher: String,
    #[serde(default)]
    pub section_hints: Vec<String>,
    #[serde(default)]
    pub items: Vec<NewsItem>,
}

impl TopicNewsGroup {
    pub fn new(topic: &str, slug: &str, publisher: &str) -> Self {
        Self {
            topic: topic.to_string(),
            slug: slug.to_string(),
            publisher: publisher.to_string(),
            section_hints: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Adds hints not already present, keeping first-seen order.
    pub fn absorb_hints<'a>(&mut self, hints: impl IntoIterator<Item = &'a String>) {
        for hint in hints {
            if !self.section_hints.contains(hint) {
                self.section_hints.push(hint.clone());
            }
        }
    }
}

/// Statistics of one clustering run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessStats {
    pub original_count: usize,
    pub malformed_count: usize,
    pub after_dedupe_count: usize,
    pub cluster_count: usize,
    pub representative_count: usize,
    pub reduction_percent: u32,
}

impl PreprocessStats {
    pub fn reduction(original_count: usize, representative_count: usize) -> u32 {
        if original_count == 0 {
            return 0;
        }
        let removed = original_count.saturating_sub(representative_count) as f64;
        (removed / original_count as f64 * 100.0).round() as u32
    }
}

/// Read-only projection over the current topic groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesSummary {
    pub total_articles: usize,
    pub total_topics: usize,
    pub total_publishers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_section_round_trips_through_key() {
        for section in Section::ALL {
            assert_eq!(section.key().parse::<Section>().unwrap(), section);
        }
        assert!("weather".parse::<Section>().is_err());
    }

    #[test]
    fn test_required_fields() {
        let date = Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap();
        let article = RawArticle::new("Title", "https://example.com/a", "BBC", date);
        assert_eq!(article.required_fields(0).unwrap(), ("https://example.com/a", date));

        let mut no_link = article.clone();
        no_link.link = Some("   ".to_string());
        assert!(matches!(
            no_link.required_fields(3),
            Err(Error::MalformedRecord { index: 3, .. })
        ));

        let mut no_date = article;
        no_date.pub_date = None;
        assert!(no_date.required_fields(0).is_err());
    }

    #[test]
    fn test_feed_json_uses_camel_case() {
        let json = r#"{
            "title": "Rates held",
            "link": "https://example.com/rates",
            "publisher": "NPR",
            "pubDate": "2024-10-02T07:30:00Z",
            "sectionHints": ["business"]
        }"#;
        let article: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.section_hints, vec!["business".to_string()]);
        assert!(article.pub_date.is_some());
        assert!(article.description.is_empty());
    }

    #[test]
    fn test_reduction_percent() {
        assert_eq!(PreprocessStats::reduction(0, 0), 0);
        assert_eq!(PreprocessStats::reduction(120, 16), 87);
        assert_eq!(PreprocessStats::reduction(3, 2), 33);
        assert_eq!(PreprocessStats::reduction(8, 8), 0);
    }
}
