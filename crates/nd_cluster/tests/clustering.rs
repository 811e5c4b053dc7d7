use nd_cluster::{cluster, generate_batch, simulate, ClusterConfig};
use nd_core::{normalize_link, PreprocessStats, RawArticle};
use std::collections::HashSet;

const PREFERRED: [&str; 4] = ["BBC", "CNN", "NPR", "The Guardian"];

fn scenario_config() -> ClusterConfig {
    ClusterConfig::new(0.75, 10).with_preferred_publishers(PREFERRED)
}

#[test]
fn test_generated_batch_collapses_repeated_stories() {
    let batch = generate_batch(120);
    let config = scenario_config();
    let outcome = cluster(&batch, &config).unwrap();
    let stats = outcome.stats;

    assert_eq!(stats.original_count, 120);
    assert_eq!(stats.after_dedupe_count, 120);
    // 15 copies of each of 8 stories, split into clusters of at most 10.
    assert_eq!(stats.cluster_count, 16);
    assert_eq!(stats.representative_count, 16);
    assert_eq!(stats.reduction_percent, 87);
    assert!(stats.representative_count * 2 < stats.original_count);
}

#[test]
fn test_representatives_come_from_preferred_publishers_when_possible() {
    let batch = generate_batch(120);
    let config = scenario_config();
    let outcome = cluster(&batch, &config).unwrap();

    // Rebuild cluster membership from the generator layout: template t, copies 0..10 and 10..15.
    for representative in &outcome.representatives {
        let slug = &representative.slug;
        let copies: Vec<&RawArticle> = batch.iter().filter(|a| &a.slug == slug).collect();
        let position = copies
            .iter()
            .position(|a| a.link == representative.link)
            .expect("representative comes from the batch");
        let members = if position < 10 { &copies[..10] } else { &copies[10..] };
        if members.iter().any(|a| config.is_preferred(&a.publisher)) {
            assert!(
                config.is_preferred(&representative.publisher),
                "{} picked over a preferred publisher",
                representative.publisher
            );
        }
    }
}

#[test]
fn test_stats_respect_ordering_invariant() {
    for count in [0, 1, 7, 33, 120] {
        let mut batch = generate_batch(count);
        // Re-feed a few links to exercise exact dedup.
        let repeats: Vec<RawArticle> = batch.iter().take(count / 3).cloned().collect();
        batch.extend(repeats);

        let outcome = cluster(&batch, &scenario_config()).unwrap();
        let stats = outcome.stats;
        assert!(stats.representative_count <= stats.cluster_count);
        assert!(stats.cluster_count <= stats.after_dedupe_count);
        assert!(stats.after_dedupe_count <= stats.original_count);
        assert_eq!(
            stats.reduction_percent,
            PreprocessStats::reduction(stats.original_count, stats.representative_count)
        );

        let links: HashSet<String> = outcome
            .representatives
            .iter()
            .map(|a| normalize_link(a.link.as_deref().unwrap()))
            .collect();
        assert_eq!(links.len(), outcome.representatives.len());
    }
}

#[test]
fn test_threshold_of_one_only_merges_identical_text() {
    let batch = generate_batch(30);
    let config = ClusterConfig::new(1.0, 10).with_description_weight(0.0);
    let outcome = cluster(&batch, &config).unwrap();
    // Titles repeat per template, so identical titles still cluster.
    assert_eq!(outcome.stats.cluster_count, 8);
}

#[test]
fn test_cluster_size_one_disables_grouping() {
    let batch = generate_batch(24);
    let outcome = cluster(&batch, &ClusterConfig::new(0.0, 1)).unwrap();
    assert_eq!(outcome.stats.cluster_count, 24);
    assert_eq!(outcome.stats.reduction_percent, 0);
}

#[test]
fn test_simulation_report_matches_direct_run() {
    let config = scenario_config();
    let report = simulate(120, &config).unwrap();
    let direct = cluster(&generate_batch(120), &config).unwrap();
    assert_eq!(report.stats, direct.stats);
    assert_eq!(report.representatives, direct.representatives);
    assert!(report.savings.tokens_saved > 0);
}
