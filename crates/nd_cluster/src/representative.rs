use std::cmp::Ordering;

use crate::config::ClusterConfig;
use crate::engine::Candidate;

/// Index of the member that stands in for the whole cluster.
///
/// Members from preferred publishers are considered first; if none exist every
/// member is eligible. Among the eligible: newest `pub_date`, then longest
/// description, then earliest arrival.
pub(crate) fn select_representative(members: &[&Candidate], config: &ClusterConfig) -> usize {
    let preferred: Vec<usize> = (0..members.len())
        .filter(|&i| config.is_preferred(&members[i].article.publisher))
        .collect();
    let eligible = if preferred.is_empty() {
        (0..members.len()).collect()
    } else {
        preferred
    };

    eligible
        .into_iter()
        .min_by(|&a, &b| rank(members[a], members[b]).then(a.cmp(&b)))
        .unwrap_or(0)
}

/// `Less` means `a` is the better representative.
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.pub_date
        .cmp(&a.pub_date)
        .then_with(|| description_len(b).cmp(&description_len(a)))
}

fn description_len(candidate: &Candidate) -> usize {
    candidate.article.description.trim().chars().count()
}
