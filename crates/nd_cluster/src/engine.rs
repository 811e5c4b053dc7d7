use chrono::{DateTime, Utc};
use nd_core::text::TextProfile;
use nd_core::{normalize_link, PreprocessStats, RawArticle, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::ClusterConfig;
use crate::representative::select_representative;

/// A validated, link-unique article awaiting cluster assignment.
#[derive(Debug)]
pub(crate) struct Candidate<'a> {
    pub article: &'a RawArticle,
    pub pub_date: DateTime<Utc>,
    profile: TextProfile,
}

/// Near-duplicates in first-seen order. `members[0]` is the anchor new articles are compared to.
#[derive(Debug, Default)]
struct Cluster {
    members: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ClusterOutcome {
    pub representatives: Vec<RawArticle>,
    pub stats: PreprocessStats,
}

/// Collapse near-duplicate coverage in one fetched batch.
///
/// Returns one representative per cluster, in the order clusters were opened.
/// The result depends on the input order but is fully deterministic for it.
pub fn cluster(articles: &[RawArticle], config: &ClusterConfig) -> Result<ClusterOutcome> {
    config.validate()?;

    if articles.is_empty() {
        return Ok(ClusterOutcome::default());
    }

    let (candidates, malformed_count) = dedupe(articles);

    let mut clusters: Vec<Cluster> = Vec::new();
    for index in 0..candidates.len() {
        match best_open_cluster(&candidates, &clusters, index, config) {
            Some((target, score)) if score >= config.similarity_threshold => {
                debug!(
                    "🔗 {:?} joins cluster {} (score {:.2})",
                    candidates[index].article.title, target, score
                );
                clusters[target].members.push(index);
            }
            _ => clusters.push(Cluster {
                members: vec![index],
            }),
        }
    }

    let representatives: Vec<RawArticle> = clusters
        .iter()
        .map(|cluster| {
            let members: Vec<&Candidate> = cluster.members.iter().map(|&i| &candidates[i]).collect();
            members[select_representative(&members, config)].article.clone()
        })
        .collect();

    let stats = PreprocessStats {
        original_count: articles.len(),
        malformed_count,
        after_dedupe_count: candidates.len(),
        cluster_count: clusters.len(),
        representative_count: representatives.len(),
        reduction_percent: PreprocessStats::reduction(articles.len(), representatives.len()),
    };

    info!(
        "🧹 Clustered {} articles: {} unique, {} clusters, {}% reduction",
        stats.original_count, stats.after_dedupe_count, stats.cluster_count, stats.reduction_percent
    );

    Ok(ClusterOutcome {
        representatives,
        stats,
    })
}

/// Drops malformed records and repeated normalized links, keeping first occurrences.
fn dedupe(articles: &[RawArticle]) -> (Vec<Candidate<'_>>, usize) {
    let mut seen = HashSet::new();
    let mut candidates = Vec::with_capacity(articles.len());
    let mut malformed = 0;

    for (index, article) in articles.iter().enumerate() {
        let (link, pub_date) = match article.required_fields(index) {
            Ok(fields) => fields,
            Err(e) => {
                warn!("⚠️ Skipping article: {}", e);
                malformed += 1;
                continue;
            }
        };
        if !seen.insert(normalize_link(link)) {
            debug!("⏭️ Duplicate link dropped: {}", link);
            continue;
        }
        candidates.push(Candidate {
            article,
            pub_date,
            profile: TextProfile::new(&article.title, &article.description),
        });
    }

    debug!("Deduplicated: {} kept, {} malformed", candidates.len(), malformed);
    (candidates, malformed)
}

fn score(candidates: &[Candidate], cluster: &Cluster, index: usize, config: &ClusterConfig) -> f64 {
    let anchor = &candidates[cluster.members[0]];
    candidates[index]
        .profile
        .similarity(&anchor.profile, config.description_weight)
}

/// Highest score wins; equal scores go to the earliest cluster.
fn better(a: (usize, f64), b: (usize, f64)) -> (usize, f64) {
    if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
        b
    } else {
        a
    }
}

/// Below this many clusters scoring stays on the calling thread.
#[cfg(feature = "rayon")]
const PARALLEL_MIN_CLUSTERS: usize = 64;

fn best_open_cluster(
    candidates: &[Candidate],
    clusters: &[Cluster],
    index: usize,
    config: &ClusterConfig,
) -> Option<(usize, f64)> {
    #[cfg(feature = "rayon")]
    if clusters.len() >= PARALLEL_MIN_CLUSTERS {
        return best_open_cluster_parallel(candidates, clusters, index, config);
    }
    best_open_cluster_sequential(candidates, clusters, index, config)
}

fn best_open_cluster_sequential(
    candidates: &[Candidate],
    clusters: &[Cluster],
    index: usize,
    config: &ClusterConfig,
) -> Option<(usize, f64)> {
    clusters
        .iter()
        .enumerate()
        .filter(|(_, c)| c.members.len() < config.max_cluster_size)
        .map(|(i, c)| (i, score(candidates, c, index, config)))
        .reduce(better)
}

#[cfg(feature = "rayon")]
fn best_open_cluster_parallel(
    candidates: &[Candidate],
    clusters: &[Cluster],
    index: usize,
    config: &ClusterConfig,
) -> Option<(usize, f64)> {
    clusters
        .par_iter()
        .enumerate()
        .filter(|(_, c)| c.members.len() < config.max_cluster_size)
        .map(|(i, c)| (i, score(candidates, c, index, config)))
        .reduce_with(better)
}
