pub mod config;
pub mod logging;
pub mod manager;

pub use config::PipelineConfig;
pub use manager::{PipelineManager, RunReport};

pub mod prelude {
    pub use super::{PipelineConfig, PipelineManager, RunReport};
    pub use nd_core::{ArticleStore, ArticlesSummary, Error, PreprocessStats, RawArticle, Result};
    pub use nd_sections::SectionPlan;
}
