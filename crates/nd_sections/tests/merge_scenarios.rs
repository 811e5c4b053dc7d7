use chrono::{DateTime, TimeZone, Utc};
use nd_core::{ArticlesSummary, NewsItem, Section, TopicNewsGroup};
use nd_sections::{merge, summarize};

fn date(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, day, hour, minute, 0).unwrap()
}

fn item(link: &str, publisher: &str, pub_date: DateTime<Utc>, section: Section) -> NewsItem {
    NewsItem {
        title: link.rsplit('/').next().unwrap_or_default().to_string(),
        description: String::new(),
        link: link.to_string(),
        publisher: publisher.to_string(),
        source: publisher.to_string(),
        pub_date,
        section,
    }
}

fn group(topic: &str, slug: &str, publisher: &str, items: Vec<NewsItem>) -> TopicNewsGroup {
    let mut group = TopicNewsGroup::new(topic, slug, publisher);
    group.items = items;
    group
}

fn stored_tech() -> Vec<TopicNewsGroup> {
    vec![group(
        "Tech",
        "tech",
        "Wired",
        vec![item("https://news.example.com/tech-1", "Wired", date(1, 8, 0), Section::Technology)],
    )]
}

fn incoming() -> Vec<TopicNewsGroup> {
    vec![
        group(
            "Tech",
            "tech",
            "Wired",
            vec![
                item("https://news.example.com/tech-1", "Wired", date(2, 9, 0), Section::Technology),
                item("https://news.example.com/tech-2", "Wired", date(2, 7, 30), Section::Technology),
            ],
        ),
        group(
            "Business",
            "business",
            "Bloomberg",
            vec![item("https://news.example.com/business-1", "Bloomberg", date(2, 6, 0), Section::Business)],
        ),
    ]
}

#[test]
fn test_merge_appends_only_unseen_links() {
    let outcome = merge(stored_tech(), incoming());
    assert_eq!(outcome.appended_articles, 2);
    assert_eq!(outcome.topics.len(), 2);

    let tech = outcome.topics.iter().find(|t| t.slug == "tech").unwrap();
    let links: Vec<&str> = tech.items.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(
        links,
        vec!["https://news.example.com/tech-2", "https://news.example.com/tech-1"]
    );
    // The stored copy wins over the re-fetched duplicate.
    assert_eq!(tech.items[1].pub_date, date(1, 8, 0));

    let business = outcome.topics.iter().find(|t| t.slug == "business").unwrap();
    assert_eq!(business.items.len(), 1);

    assert_eq!(
        summarize(&outcome.topics),
        ArticlesSummary {
            total_articles: 3,
            total_topics: 2,
            total_publishers: 2,
        }
    );
}

#[test]
fn test_repeat_merge_changes_nothing() {
    let first = merge(stored_tech(), incoming());
    let second = merge(first.topics.clone(), incoming());
    assert_eq!(second.appended_articles, 0);
    assert_eq!(second.topics, first.topics);
}

#[test]
fn test_items_stay_newest_first_across_many_runs() {
    let mut topics = stored_tech();
    for day in 2..10 {
        let batch = vec![group(
            "Tech",
            "tech",
            "Wired",
            vec![
                item(&format!("https://news.example.com/tech-early-{}", day), "Wired", date(day, 1, 0), Section::Technology),
                item(&format!("https://news.example.com/tech-late-{}", day), "Wired", date(day, 23, 0), Section::Technology),
            ],
        )];
        let outcome = merge(topics, batch);
        assert_eq!(outcome.appended_articles, 2);
        topics = outcome.topics;
        for group in &topics {
            assert!(group.items.windows(2).all(|w| w[0].pub_date >= w[1].pub_date));
        }
    }
    assert_eq!(summarize(&topics).total_articles, 17);
}

#[test]
fn test_merge_into_empty_store() {
    let outcome = merge(vec![], incoming());
    assert_eq!(outcome.appended_articles, 3);
    assert_eq!(outcome.topics[0].publisher, "Bloomberg");
    assert_eq!(outcome.topics[1].publisher, "Wired");
}
