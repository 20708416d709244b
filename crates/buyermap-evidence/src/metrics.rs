/// Diversity summary over a final selection.
///
/// Display and logging only — selection never consults these numbers.
use std::collections::HashSet;

use evidence_common::keywords::RoleKeywordTable;
use evidence_common::model::{DiversityMetrics, QuoteVariety, ScoredQuote, SpeakerRole};

use crate::scoring::classify_speaker_role;

/// Variance of quote text lengths above which the set counts as high/medium
/// variety.
const HIGH_VARIETY_VARIANCE: f64 = 10_000.0;
const MEDIUM_VARIETY_VARIANCE: f64 = 5_000.0;

pub fn diversity_metrics(
    selection: &[ScoredQuote],
    roles: &RoleKeywordTable,
) -> DiversityMetrics {
    if selection.is_empty() {
        return DiversityMetrics {
            unique_speakers: 0,
            speaker_roles: Vec::new(),
            quote_variety: QuoteVariety::Low,
            diversity_score: 0,
        };
    }

    let unique_speakers = selection
        .iter()
        .map(|s| s.quote.speaker_key())
        .collect::<HashSet<_>>()
        .len();

    let mut speaker_roles: Vec<SpeakerRole> = Vec::new();
    for candidate in selection {
        let role = classify_speaker_role(&candidate.quote, roles);
        if !speaker_roles.contains(&role) {
            speaker_roles.push(role);
        }
    }

    let quote_variety = variety(selection);

    let total = selection.len() as f64;
    let speaker_diversity = f64::min(100.0, unique_speakers as f64 / total * 100.0);
    let role_diversity = f64::min(100.0, speaker_roles.len() as f64 / 3.0 * 100.0);
    let variety_score = match quote_variety {
        QuoteVariety::High => 100.0,
        QuoteVariety::Medium => 70.0,
        QuoteVariety::Low => 40.0,
    };
    let diversity_score =
        (speaker_diversity * 0.5 + role_diversity * 0.3 + variety_score * 0.2).round() as u8;

    DiversityMetrics {
        unique_speakers,
        speaker_roles,
        quote_variety,
        diversity_score,
    }
}

/// Population variance of quote text lengths, bucketed.
fn variety(selection: &[ScoredQuote]) -> QuoteVariety {
    let lengths: Vec<f64> = selection
        .iter()
        .map(|s| s.quote.text.chars().count() as f64)
        .collect();
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let variance =
        lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;

    if variance > HIGH_VARIETY_VARIANCE {
        QuoteVariety::High
    } else if variance > MEDIUM_VARIETY_VARIANCE {
        QuoteVariety::Medium
    } else {
        QuoteVariety::Low
    }
}
