/// Advisory checks on a finished selection.
///
/// Compares what diversity cost against an unconstrained top-N pick and
/// whether the diversity bar was met. Output is returned for display and
/// logging; it never vetoes a selection.
use evidence_common::model::{DiversityMetrics, ScoredQuote, SelectionAudit};

/// Selected scores must reach this share of an unconstrained top-N sum.
const QUALITY_RETENTION: f64 = 0.8;
/// Diversity score at or above this counts as achieved.
const DIVERSITY_BAR: u8 = 70;

pub fn audit_selection(
    selection: &[ScoredQuote],
    pool: &[ScoredQuote],
    metrics: &DiversityMetrics,
) -> SelectionAudit {
    let actual: u32 = selection.iter().map(|s| u32::from(s.score.overall)).sum();

    let mut pool_scores: Vec<u8> = pool.iter().map(|s| s.score.overall).collect();
    pool_scores.sort_unstable_by(|a, b| b.cmp(a));
    let ideal: u32 = pool_scores
        .iter()
        .take(selection.len())
        .map(|&s| u32::from(s))
        .sum();

    let quality_maintained = f64::from(actual) >= QUALITY_RETENTION * f64::from(ideal);
    let diversity_achieved = metrics.diversity_score >= DIVERSITY_BAR;

    let mut recommendations = Vec::new();
    if !quality_maintained {
        recommendations.push(
            "speaker diversity sacrificed more than 20% of the achievable score; consider the \
             bounded-per-speaker policy"
                .to_string(),
        );
    }
    if !diversity_achieved {
        recommendations.push(
            "evidence is concentrated in few speakers or roles; add quotes from more interviews"
                .to_string(),
        );
    }
    if selection.len() * 2 < pool.len() {
        recommendations.push(format!(
            "only {} of {} candidate quotes survived selection; review speaker caps or raise \
             max_quotes",
            selection.len(),
            pool.len()
        ));
    }

    SelectionAudit {
        quality_maintained,
        diversity_achieved,
        recommendations,
    }
}
