/// Speaker-diverse evidence selection.
///
/// One entry point, two named policies. Score order is the primary ranking
/// signal; ties keep the stable order of the input (no secondary tie-break
/// field). Deterministic given identical input ordering.
use std::collections::{HashMap, HashSet};

use evidence_common::model::ScoredQuote;

use crate::error::AppError;

pub const DEFAULT_MAX_QUOTES: usize = 5;

/// Per-speaker cap for the bounded policy's first pass.
const FIRST_PASS_CAP: usize = 2;
/// Relaxed cap for the backfill pass when the selection came up short.
const BACKFILL_CAP: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// At most one quote per speaker name; the canonical policy.
    OnePerSpeaker,
    /// Up to two quotes per speaker+source, relaxed to three when the cap
    /// would leave the selection short.
    BoundedPerSpeaker,
}

impl SelectionPolicy {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "one-per-speaker" => Ok(SelectionPolicy::OnePerSpeaker),
            "bounded-per-speaker" => Ok(SelectionPolicy::BoundedPerSpeaker),
            other => Err(AppError::UnknownPolicy(format!(
                "'{other}' (use one-per-speaker or bounded-per-speaker)"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::OnePerSpeaker => "one-per-speaker",
            SelectionPolicy::BoundedPerSpeaker => "bounded-per-speaker",
        }
    }
}

/// Select at most `max_quotes` quotes from a scored pool under the given
/// policy. An empty pool yields an empty selection; this never fails.
pub fn select_evidence(
    scored: &[ScoredQuote],
    max_quotes: usize,
    policy: SelectionPolicy,
) -> Vec<ScoredQuote> {
    match policy {
        SelectionPolicy::OnePerSpeaker => select_one_per_speaker(scored, max_quotes),
        SelectionPolicy::BoundedPerSpeaker => select_bounded(scored, max_quotes),
    }
}

/// Keep only the single highest-scoring quote per speaker name ("Unknown"
/// groups together), then rank the champions by overall score.
fn select_one_per_speaker(scored: &[ScoredQuote], max_quotes: usize) -> Vec<ScoredQuote> {
    let mut speaker_order: Vec<String> = Vec::new();
    let mut champions: HashMap<String, ScoredQuote> = HashMap::new();

    for candidate in scored {
        let key = candidate.quote.speaker_name().to_string();
        let best = champions.get(&key).map(|b| b.score.overall);
        match best {
            // First quote seen wins ties within a speaker.
            Some(best) if best >= candidate.score.overall => {}
            Some(_) => {
                champions.insert(key, candidate.clone());
            }
            None => {
                champions.insert(key.clone(), candidate.clone());
                speaker_order.push(key);
            }
        }
    }

    // Champions in first-appearance order, so the stable sort keeps input
    // order for equal scores.
    let mut winners: Vec<ScoredQuote> = speaker_order
        .iter()
        .filter_map(|key| champions.remove(key))
        .collect();
    winners.sort_by(|a, b| b.score.overall.cmp(&a.score.overall));
    winners.truncate(max_quotes);
    winners
}

/// Walk the score-ranked pool accepting up to two quotes per speaker+source;
/// when the cap leaves the selection short, take a second pass allowing a
/// third, skipping quotes already chosen.
fn select_bounded(scored: &[ScoredQuote], max_quotes: usize) -> Vec<ScoredQuote> {
    let mut ranked: Vec<&ScoredQuote> = scored.iter().collect();
    ranked.sort_by(|a, b| b.score.overall.cmp(&a.score.overall));

    let mut uses: HashMap<String, usize> = HashMap::new();
    let mut selected: Vec<ScoredQuote> = Vec::new();

    for candidate in &ranked {
        if selected.len() >= max_quotes {
            break;
        }
        let used = uses.entry(candidate.quote.speaker_key()).or_insert(0);
        if *used < FIRST_PASS_CAP {
            *used += 1;
            selected.push((*candidate).clone());
        }
    }

    if selected.len() < max_quotes {
        let mut chosen: HashSet<String> =
            selected.iter().map(|s| s.quote.id.clone()).collect();
        for candidate in &ranked {
            if selected.len() >= max_quotes {
                break;
            }
            if chosen.contains(&candidate.quote.id) {
                continue;
            }
            let used = uses.entry(candidate.quote.speaker_key()).or_insert(0);
            if *used < BACKFILL_CAP {
                *used += 1;
                chosen.insert(candidate.quote.id.clone());
                selected.push((*candidate).clone());
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidence_common::model::{Quote, QuoteScore};

    fn scored(id: &str, speaker: Option<&str>, source: &str, overall: u8) -> ScoredQuote {
        ScoredQuote {
            quote: Quote {
                id: id.to_string(),
                text: format!("quote {id}"),
                speaker: speaker.map(str::to_string),
                role: None,
                source: source.to_string(),
                classification: None,
                company_snapshot: None,
                rejected: false,
                relevance_score: None,
            },
            score: QuoteScore {
                relevance: overall,
                specificity: overall,
                authority: overall,
                overall,
            },
        }
    }

    #[test]
    fn empty_pool_selects_nothing() {
        for policy in [SelectionPolicy::OnePerSpeaker, SelectionPolicy::BoundedPerSpeaker] {
            assert!(select_evidence(&[], 5, policy).is_empty());
        }
    }

    #[test]
    fn strict_policy_keeps_one_quote_per_speaker() {
        let pool = vec![
            scored("a", Some("John"), "int-1", 40),
            scored("b", Some("John"), "int-1", 80),
            scored("c", Some("Betty"), "int-1", 60),
            scored("d", Some("Betty"), "int-2", 50),
        ];
        let picked = select_evidence(&pool, 5, SelectionPolicy::OnePerSpeaker);

        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].quote.id, "b");
        assert_eq!(picked[1].quote.id, "c");

        let mut speakers: Vec<&str> = picked.iter().map(|s| s.quote.speaker_name()).collect();
        speakers.dedup();
        assert_eq!(speakers.len(), picked.len());
    }

    #[test]
    fn strict_policy_output_is_sorted_descending() {
        let pool = vec![
            scored("a", Some("A"), "int-1", 10),
            scored("b", Some("B"), "int-1", 90),
            scored("c", Some("C"), "int-1", 55),
        ];
        let picked = select_evidence(&pool, 5, SelectionPolicy::OnePerSpeaker);
        let overalls: Vec<u8> = picked.iter().map(|s| s.score.overall).collect();
        assert_eq!(overalls, vec![90, 55, 10]);
    }

    #[test]
    fn one_speaker_dominating_collapses_to_one_quote() {
        let pool: Vec<ScoredQuote> = (0..10)
            .map(|i| scored(&format!("q{i}"), Some("Solo"), "int-1", 50 + i as u8))
            .collect();
        let picked = select_evidence(&pool, 5, SelectionPolicy::OnePerSpeaker);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].score.overall, 59);
    }

    #[test]
    fn unattributed_quotes_group_under_unknown() {
        let pool = vec![
            scored("a", None, "int-1", 30),
            scored("b", None, "int-1", 70),
            scored("c", Some("Dana"), "int-1", 40),
        ];
        let picked = select_evidence(&pool, 5, SelectionPolicy::OnePerSpeaker);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].quote.id, "b");
    }

    #[test]
    fn ties_keep_first_seen_quote_and_input_order() {
        let pool = vec![
            scored("first", Some("A"), "int-1", 60),
            scored("second", Some("A"), "int-1", 60),
            scored("third", Some("B"), "int-1", 60),
        ];
        let picked = select_evidence(&pool, 5, SelectionPolicy::OnePerSpeaker);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].quote.id, "first");
        assert_eq!(picked[1].quote.id, "third");
    }

    #[test]
    fn bounded_policy_caps_each_speaker_at_two_first() {
        let pool = vec![
            scored("a", Some("A"), "int-1", 90),
            scored("b", Some("A"), "int-1", 85),
            scored("c", Some("A"), "int-1", 80),
            scored("d", Some("B"), "int-1", 70),
            scored("e", Some("B"), "int-1", 65),
        ];
        let picked = select_evidence(&pool, 4, SelectionPolicy::BoundedPerSpeaker);
        let ids: Vec<&str> = picked.iter().map(|s| s.quote.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d", "e"]);
    }

    #[test]
    fn bounded_policy_backfills_to_three_when_short() {
        let pool = vec![
            scored("a", Some("A"), "int-1", 90),
            scored("b", Some("A"), "int-1", 85),
            scored("c", Some("A"), "int-1", 80),
            scored("d", Some("A"), "int-1", 75),
        ];
        let picked = select_evidence(&pool, 5, SelectionPolicy::BoundedPerSpeaker);
        // First pass takes two, backfill allows one more, the fourth stays out.
        let ids: Vec<&str> = picked.iter().map(|s| s.quote.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn bounded_policy_counts_same_name_across_sources_separately() {
        let pool = vec![
            scored("a", Some("A"), "int-1", 90),
            scored("b", Some("A"), "int-1", 85),
            scored("c", Some("A"), "int-2", 80),
            scored("d", Some("A"), "int-2", 75),
        ];
        let picked = select_evidence(&pool, 4, SelectionPolicy::BoundedPerSpeaker);
        assert_eq!(picked.len(), 4);
    }

    #[test]
    fn selection_respects_max_quotes_for_both_policies() {
        let pool: Vec<ScoredQuote> = (0..20)
            .map(|i| scored(&format!("q{i}"), Some(&format!("S{i}")), "int-1", i as u8))
            .collect();
        for policy in [SelectionPolicy::OnePerSpeaker, SelectionPolicy::BoundedPerSpeaker] {
            let picked = select_evidence(&pool, 5, policy);
            assert_eq!(picked.len(), 5);
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let pool = vec![
            scored("a", Some("A"), "int-1", 60),
            scored("b", Some("B"), "int-1", 60),
            scored("c", Some("C"), "int-1", 60),
        ];
        for policy in [SelectionPolicy::OnePerSpeaker, SelectionPolicy::BoundedPerSpeaker] {
            let first = select_evidence(&pool, 2, policy);
            let second = select_evidence(&pool, 2, policy);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn policy_parsing() {
        assert_eq!(
            SelectionPolicy::parse("one-per-speaker").unwrap(),
            SelectionPolicy::OnePerSpeaker
        );
        assert_eq!(
            SelectionPolicy::parse("bounded-per-speaker").unwrap(),
            SelectionPolicy::BoundedPerSpeaker
        );
        assert!(matches!(
            SelectionPolicy::parse("round-robin"),
            Err(AppError::UnknownPolicy(_))
        ));
    }
}
