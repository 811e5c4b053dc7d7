pub mod classifier;
pub mod limits;
pub mod merge;
pub mod summary;

pub use classifier::{classify, classify_with_plan, Classification, ClassifiedArticle, Origin, SectionPlan};
pub use limits::{select_for_sections, SectionLimits};
pub use merge::{group_by_slug, merge, MergeOutcome};
pub use summary::summarize;

pub mod prelude {
    pub use super::{classify, merge, summarize, MergeOutcome, SectionLimits};
    pub use nd_core::{ArticlesSummary, NewsItem, Section, TopicNewsGroup};
}
