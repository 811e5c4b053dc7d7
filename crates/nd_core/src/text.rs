use lazy_static::lazy_static;
use std::collections::HashSet;
use url::Url;

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in",
        "is", "it", "its", "of", "on", "or", "says", "that", "the", "this", "to", "was",
        "were", "will", "with",
    ]
    .into_iter()
    .collect();
}

const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "dclid", "msclkid", "yclid", "igshid", "mc_cid", "mc_eid", "ref",
    "ref_src", "cmp", "cmpid", "ncid", "ocid", "smid", "_ga", "at_medium", "at_campaign",
];

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

/// Canonical form of an article link, used as its identity.
///
/// Drops tracking parameters and the fragment, lowercases scheme and host,
/// sorts the remaining query parameters and strips trailing slashes. Links
/// that do not parse as absolute URLs are only trimmed.
///
/// The query is re-encoded as a form, so `?id` becomes `?id=` and `%20`
/// becomes `+`. The result is a comparison key, not a link to hand back to
/// readers; stored items keep the link as fetched.
pub fn normalize_link(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut parsed = match Url::parse(trimmed) {
        Ok(url) if !url.cannot_be_a_base() => url,
        _ => return trimmed.trim_end_matches('/').to_string(),
    };

    parsed.set_fragment(None);

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();
    parsed.set_query(None);
    if !pairs.is_empty() {
        parsed.query_pairs_mut().extend_pairs(pairs.iter());
    }

    let path = parsed.path().to_string();
    let stripped = path.trim_end_matches('/');
    if stripped.len() != path.len() && !stripped.is_empty() {
        parsed.set_path(stripped);
    }

    parsed.to_string()
}

/// Lowercased word tokens with punctuation and stopwords removed.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .filter(|w| !STOPWORDS.contains(w.as_str()))
        .collect()
}

/// Jaccard overlap of two token sets. Two empty sets score 0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Pre-tokenized title and description of one article.
#[derive(Debug, Clone, Default)]
pub struct TextProfile {
    title: HashSet<String>,
    description: HashSet<String>,
}

impl TextProfile {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: tokenize(title),
            description: tokenize(description),
        }
    }

    /// Title overlap, blended with description overlap when both sides have one.
    pub fn similarity(&self, other: &TextProfile, description_weight: f64) -> f64 {
        let title = jaccard(&self.title, &other.title);
        if self.description.is_empty() || other.description.is_empty() {
            return title;
        }
        let description = jaccard(&self.description, &other.description);
        title * (1.0 - description_weight) + description * description_weight
    }
}

/// Convenience over [`TextProfile::similarity`] for one-off comparisons.
pub fn similarity(
    (title_a, description_a): (&str, &str),
    (title_b, description_b): (&str, &str),
    description_weight: f64,
) -> f64 {
    TextProfile::new(title_a, description_a)
        .similarity(&TextProfile::new(title_b, description_b), description_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_tracking_and_trailing_slash() {
        assert_eq!(
            normalize_link("HTTPS://News.Example.com/world/story-1/?utm_source=rss&utm_medium=feed"),
            "https://news.example.com/world/story-1"
        );
        assert_eq!(
            normalize_link("https://example.com/a?fbclid=xyz&id=7#comments"),
            "https://example.com/a?id=7"
        );
    }

    #[test]
    fn test_normalize_sorts_remaining_params() {
        assert_eq!(
            normalize_link("https://example.com/a?b=2&a=1"),
            normalize_link("https://example.com/a?a=1&b=2&gclid=1")
        );
    }

    #[test]
    fn test_normalize_keeps_root_and_unparseable_links() {
        assert_eq!(normalize_link("https://example.com"), "https://example.com/");
        assert_eq!(normalize_link("https://example.com/"), "https://example.com/");
        assert_eq!(normalize_link("  /relative/path/ "), "/relative/path");
    }

    #[test]
    fn test_normalize_reencodes_query_as_form() {
        assert_eq!(normalize_link("https://example.com/a?id"), "https://example.com/a?id=");
        assert_eq!(
            normalize_link("https://example.com/search?q=storm%20watch"),
            "https://example.com/search?q=storm+watch"
        );
        assert_eq!(
            normalize_link("https://example.com/search?q=storm+watch"),
            normalize_link("https://example.com/search?q=storm%20watch")
        );
    }

    #[test]
    fn test_tokenize_drops_stopwords_and_punctuation() {
        let tokens = tokenize("The Fed holds rates, says Powell!");
        assert!(tokens.contains("fed"));
        assert!(tokens.contains("powell"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("says"));
    }

    #[test]
    fn test_similarity() {
        let same = similarity(("Storm hits coast", ""), ("Storm hits coast", ""), 0.3);
        assert!((same - 1.0).abs() < f64::EPSILON);

        let disjoint = similarity(("Storm hits coast", ""), ("Markets rally", ""), 0.3);
        assert_eq!(disjoint, 0.0);

        let blended = similarity(
            ("Storm hits coast", "Thousands evacuated overnight"),
            ("Storm hits coast", "Schools closed today"),
            0.5,
        );
        assert!((blended - 0.5).abs() < 1e-9);
    }
}
