pub mod config;
pub mod engine;
pub mod harness;
mod representative;

pub use config::ClusterConfig;
pub use engine::{cluster, ClusterOutcome};
pub use harness::{generate_batch, simulate, SavingsEstimate, SimulationReport};

pub mod prelude {
    pub use super::{cluster, ClusterConfig, ClusterOutcome};
    pub use nd_core::{PreprocessStats, RawArticle, Result, Error};
}
