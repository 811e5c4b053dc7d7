use lazy_static::lazy_static;
use nd_core::{normalize_link, RawArticle, Section};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Feed-supplied tags and the section each one selects.
const HINT_TABLE: &[(&[&str], Section)] = &[
    (&["politics", "election", "elections", "government", "us-politics"], Section::Politics),
    (&["business", "economy", "markets", "finance", "money"], Section::Business),
    (&["tech", "technology", "gadgets", "ai", "science-tech"], Section::Technology),
    (&["science", "space", "environment", "climate"], Section::Science),
    (&["health", "medicine", "wellness"], Section::Health),
    (&["sport", "sports", "football", "soccer"], Section::Sports),
    (&["entertainment", "culture", "arts", "film", "music"], Section::Entertainment),
    (&["world", "international", "global", "foreign"], Section::World),
    (&["general", "top-stories", "headlines"], Section::General),
];

lazy_static! {
    /// Evaluated in order; the first section whose pattern matches wins.
    static ref KEYWORD_RULES: Vec<(Regex, Section)> = [
        (r"election|senate|congress|parliament|president|prime minister|lawmakers?|governor|campaign|ballot|voters?", Section::Politics),
        (r"economy|inflation|markets?|stocks?|interest rates?|federal reserve|earnings|shares|merger|gdp|recession", Section::Business),
        (r"software|ai|artificial intelligence|chip(maker)?s?|processors?|smartphones?|cyber\w*|startups?|apps?", Section::Technology),
        (r"nasa|space|astronom\w*|comets?|planets?|climate|scientists?|physics|research(ers)?", Section::Science),
        (r"health|vaccines?|virus|covid|hospitals?|disease|medical|flu|cancer", Section::Health),
        (r"football|soccer|basketball|baseball|tennis|olympics?|championship|league|tournament|coach", Section::Sports),
        (r"film|movies?|music|album|festival|celebrity|actor|actress|oscars?|box office", Section::Entertainment),
        (r"ceasefire|united nations|diplomat\w*|embassy|foreign|border|war|refugees?|summit", Section::World),
    ]
    .into_iter()
    .map(|(pattern, section)| {
        let regex = Regex::new(&format!(r"(?i)\b(?:{})\b", pattern)).expect("keyword pattern compiles");
        (regex, section)
    })
    .collect();
}

/// Where a section assignment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Plan,
    Hint,
    Keyword,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub section: Section,
    pub origin: Origin,
}

impl Classification {
    /// Plan and hint assignments outrank recency when a section is truncated.
    pub fn is_explicit(&self) -> bool {
        matches!(self.origin, Origin::Plan | Origin::Hint)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedArticle {
    pub article: RawArticle,
    pub classification: Classification,
}

/// Section assignments proposed by an external model, keyed by normalized link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPlan {
    assignments: HashMap<String, Section>,
}

impl SectionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, link: &str, section: Section) {
        self.assignments.insert(normalize_link(link), section);
    }

    pub fn section_for(&self, link: &str) -> Option<Section> {
        self.assignments.get(&normalize_link(link)).copied()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

pub fn section_for_hint(hint: &str) -> Option<Section> {
    let hint = hint.trim().to_lowercase();
    HINT_TABLE
        .iter()
        .find(|(tags, _)| tags.contains(&hint.as_str()))
        .map(|(_, section)| *section)
}

pub fn section_for_text(text: &str) -> Option<Section> {
    KEYWORD_RULES
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, section)| *section)
}

/// Section for an article; never fails, unmatched articles land in [`Section::General`].
pub fn classify(article: &RawArticle) -> Section {
    classify_with_plan(article, None).section
}

pub fn classify_with_plan(article: &RawArticle, plan: Option<&SectionPlan>) -> Classification {
    let planned = plan.and_then(|plan| article.link.as_deref().and_then(|link| plan.section_for(link)));
    if let Some(section) = planned {
        return Classification { section, origin: Origin::Plan };
    }

    if let Some(section) = article.section_hints.iter().find_map(|hint| section_for_hint(hint)) {
        return Classification { section, origin: Origin::Hint };
    }

    let text = format!("{} {} {}", article.title, article.description, article.topic);
    match section_for_text(&text) {
        Some(section) => Classification { section, origin: Origin::Keyword },
        None => Classification { section: Section::General, origin: Origin::Fallback },
    }
}
