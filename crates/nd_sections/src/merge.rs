use nd_core::{normalize_link, NewsItem, Section, TopicNewsGroup};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::classifier::ClassifiedArticle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub topics: Vec<TopicNewsGroup>,
    pub appended_articles: usize,
}

/// Folds freshly classified groups into the stored ones.
///
/// Every link ends up stored at most once across all groups, items within a
/// group are newest first, and groups come back ordered by publisher then
/// topic. Merging the same `appended` twice only changes the store once.
pub fn merge(existing: Vec<TopicNewsGroup>, appended: Vec<TopicNewsGroup>) -> MergeOutcome {
    let mut seen: HashSet<String> = HashSet::new();
    let mut topics: Vec<TopicNewsGroup> = Vec::with_capacity(existing.len() + appended.len());
    let mut by_slug: HashMap<String, usize> = HashMap::new();

    for mut group in existing {
        let before = group.items.len();
        group.items.retain(|item| seen.insert(normalize_link(&item.link)));
        if group.items.len() != before {
            warn!(
                "⚠️ Dropped {} repeated links from stored topic {}",
                before - group.items.len(),
                group.slug
            );
        }
        sort_by_recency(&mut group.items);
        by_slug.entry(group.slug.clone()).or_insert(topics.len());
        topics.push(group);
    }

    let mut appended_articles = 0;
    for group in appended {
        let TopicNewsGroup {
            topic,
            slug,
            publisher,
            section_hints,
            items,
        } = group;

        let fresh: Vec<NewsItem> = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(normalize_link(&item.link));
                if !fresh {
                    debug!("⏭️ Already stored: {}", item.link);
                }
                fresh
            })
            .collect();

        match by_slug.get(&slug).copied() {
            Some(index) => {
                let target = &mut topics[index];
                target.absorb_hints(&section_hints);
                if !fresh.is_empty() {
                    appended_articles += fresh.len();
                    target.items.extend(fresh);
                    sort_by_recency(&mut target.items);
                }
            }
            None if fresh.is_empty() => {}
            None => {
                appended_articles += fresh.len();
                let mut created = TopicNewsGroup::new(&topic, &slug, &publisher);
                created.absorb_hints(&section_hints);
                created.items = fresh;
                sort_by_recency(&mut created.items);
                by_slug.insert(slug, topics.len());
                topics.push(created);
            }
        }
    }

    sort_topics(&mut topics);
    info!(
        "🗂️ Merged {} new articles into {} topics",
        appended_articles,
        topics.len()
    );

    MergeOutcome {
        topics,
        appended_articles,
    }
}

/// Stable, so items sharing a timestamp keep their relative order.
pub fn sort_by_recency(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
}

pub fn sort_topics(topics: &mut [TopicNewsGroup]) {
    topics.sort_by(|a, b| {
        (&a.publisher, &a.topic, &a.slug).cmp(&(&b.publisher, &b.topic, &b.slug))
    });
}

/// Builds appendable groups from classified articles, one per slug in first-seen order.
///
/// Articles without a slug are grouped under their section key. Articles
/// missing a link or date are skipped.
pub fn group_by_slug(articles: &[ClassifiedArticle]) -> Vec<TopicNewsGroup> {
    let mut groups: Vec<TopicNewsGroup> = Vec::new();
    let mut by_slug: HashMap<String, usize> = HashMap::new();

    for (index, classified) in articles.iter().enumerate() {
        let article = &classified.article;
        let section = classified.classification.section;
        let item = match NewsItem::from_raw(article, index, section) {
            Ok(item) => item,
            Err(e) => {
                warn!("⚠️ Not grouping article: {}", e);
                continue;
            }
        };

        let (topic, slug) = topic_and_slug(&article.topic, &article.slug, section);
        let position = *by_slug.entry(slug.clone()).or_insert_with(|| {
            groups.push(TopicNewsGroup::new(&topic, &slug, &article.publisher));
            groups.len() - 1
        });
        let group = &mut groups[position];
        group.absorb_hints(&article.section_hints);
        group.items.push(item);
    }

    for group in groups.iter_mut() {
        sort_by_recency(&mut group.items);
    }
    groups
}

fn topic_and_slug(topic: &str, slug: &str, section: Section) -> (String, String) {
    let slug = slug.trim();
    if !slug.is_empty() {
        let topic = if topic.trim().is_empty() { slug } else { topic.trim() };
        return (topic.to_string(), slug.to_string());
    }
    (section.key().to_string(), section.key().to_string())
}
