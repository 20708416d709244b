/// Quote scoring for ICP assumption validation.
///
/// Scores each (quote, assumption) pair along three 0-100 axes — relevance,
/// specificity, authority — and combines them into a weighted overall. Pure
/// computation over the injected keyword tables: no I/O, no caching, and
/// missing fields degrade to low scores instead of errors.
use regex::Regex;

use evidence_common::keywords::{KeywordTableSet, RoleKeywordTable};
use evidence_common::model::{Quote, QuoteScore, ScoredQuote, SpeakerRole};

use crate::error::AppError;

/// Overall = relevance*0.5 + specificity*0.3 + authority*0.2, rounded.
const RELEVANCE_WEIGHT: f32 = 0.5;
const SPECIFICITY_WEIGHT: f32 = 0.3;
const AUTHORITY_WEIGHT: f32 = 0.2;

/// How many leading assumption terms participate in relevance matching.
const KEY_TERM_LIMIT: usize = 4;
/// Terms this short ("the", "are", …) carry no signal.
const KEY_TERM_MIN_LEN: usize = 4;

#[derive(Debug)]
pub struct QuoteScorer {
    version: String,
    roles: RoleKeywordTable,
    topics: Vec<String>,
    action_verbs: Vec<String>,
    detail_patterns: Vec<Regex>,
}

impl QuoteScorer {
    /// Build a scorer from a keyword table set, compiling the detail
    /// patterns up front. A bad pattern in an override file fails here, at
    /// startup, not per quote.
    pub fn new(tables: KeywordTableSet) -> Result<Self, AppError> {
        let mut detail_patterns = Vec::with_capacity(tables.detail.patterns.len());
        for pattern in &tables.detail.patterns {
            let compiled = Regex::new(pattern).map_err(|e| AppError::Pattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            detail_patterns.push(compiled);
        }

        Ok(Self {
            version: tables.version,
            roles: tables.roles,
            topics: lowercased(tables.topics.topics),
            action_verbs: lowercased(tables.detail.action_verbs),
            detail_patterns,
        })
    }

    pub fn table_version(&self) -> &str {
        &self.version
    }

    pub fn roles(&self) -> &RoleKeywordTable {
        &self.roles
    }

    /// Score one quote against an assumption.
    pub fn score(&self, quote: &Quote, assumption: &str) -> QuoteScore {
        let text = quote.text.to_lowercase();
        let assumption = assumption.to_lowercase();

        let relevance = self.relevance_score(&text, &assumption);
        let specificity = self.specificity_score(&text);
        let authority = authority_score(classify_speaker_role(quote, &self.roles));

        let overall = (f32::from(relevance) * RELEVANCE_WEIGHT
            + f32::from(specificity) * SPECIFICITY_WEIGHT
            + f32::from(authority) * AUTHORITY_WEIGHT)
            .round() as u8;

        QuoteScore {
            relevance,
            specificity,
            authority,
            overall,
        }
    }

    /// Score a whole pool, preserving input order.
    pub fn score_all(&self, quotes: &[Quote], assumption: &str) -> Vec<ScoredQuote> {
        quotes
            .iter()
            .map(|quote| ScoredQuote {
                quote: quote.clone(),
                score: self.score(quote, assumption),
            })
            .collect()
    }

    /// 25 points per leading assumption term found in the quote, a 20-point
    /// bonus when at least two terms match, and 10 points per topic keyword
    /// present in both assumption and quote.
    fn relevance_score(&self, text: &str, assumption: &str) -> u8 {
        let key_terms: Vec<&str> = assumption
            .split_whitespace()
            .filter(|term| term.chars().count() >= KEY_TERM_MIN_LEN)
            .take(KEY_TERM_LIMIT)
            .collect();

        let matched = key_terms
            .iter()
            .filter(|term| text.contains(*term))
            .count() as u32;

        let mut points = 25 * matched;
        if matched >= 2 {
            points += 20;
        }

        for topic in &self.topics {
            if assumption.contains(topic.as_str()) && text.contains(topic.as_str()) {
                points += 10;
            }
        }

        points.min(100) as u8
    }

    /// Length base (longer quotes carry more context), 8 points per
    /// concrete-detail pattern that matches, 5 per action verb present.
    fn specificity_score(&self, text: &str) -> u8 {
        let len = text.chars().count();
        let mut points: u32 = if len >= 200 {
            30
        } else if len >= 100 {
            20
        } else if len >= 50 {
            10
        } else {
            0
        };

        points += 8 * self
            .detail_patterns
            .iter()
            .filter(|pattern| pattern.is_match(text))
            .count() as u32;

        points += 5 * self
            .action_verbs
            .iter()
            .filter(|verb| text.contains(verb.as_str()))
            .count() as u32;

        points.min(100) as u8
    }
}

/// Classify a quote's speaker from name + role text.
///
/// Vocabularies are checked in priority order (decision-maker, influencer,
/// end-user). Non-empty text that matches nothing classifies as influencer;
/// a quote with no speaker text at all is unknown.
pub fn classify_speaker_role(quote: &Quote, roles: &RoleKeywordTable) -> SpeakerRole {
    let descriptor = format!(
        "{} {}",
        quote.speaker.as_deref().unwrap_or(""),
        quote.role.as_deref().unwrap_or("")
    )
    .trim()
    .to_lowercase();

    if descriptor.is_empty() {
        return SpeakerRole::Unknown;
    }

    let contains_any =
        |keywords: &[String]| keywords.iter().any(|k| descriptor.contains(&k.to_lowercase()));

    if contains_any(&roles.decision_maker) {
        SpeakerRole::DecisionMaker
    } else if contains_any(&roles.influencer) {
        SpeakerRole::Influencer
    } else if contains_any(&roles.end_user) {
        SpeakerRole::EndUser
    } else {
        SpeakerRole::Influencer
    }
}

pub fn authority_score(role: SpeakerRole) -> u8 {
    match role {
        SpeakerRole::DecisionMaker => 90,
        SpeakerRole::Influencer => 70,
        SpeakerRole::EndUser => 40,
        SpeakerRole::Unknown => 50,
    }
}

fn lowercased(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> QuoteScorer {
        QuoteScorer::new(KeywordTableSet::buyer_icp_v1()).unwrap()
    }

    fn quote(text: &str, speaker: Option<&str>, role: Option<&str>) -> Quote {
        Quote {
            id: "q".to_string(),
            text: text.to_string(),
            speaker: speaker.map(str::to_string),
            role: role.map(str::to_string),
            source: "int-1".to_string(),
            classification: None,
            company_snapshot: None,
            rejected: false,
            relevance_score: None,
        }
    }

    #[test]
    fn scores_stay_in_bounds() {
        let scorer = scorer();
        let busy = "We specifically decided to approve, purchase, implement, adopt, evaluate, \
                    negotiate and sign for the tool: 50% faster, $4,000 saved, 12 hours a week, \
                    8 attorneys on the team, exactly as our budget and process demanded, and the \
                    timing and pain points for every buyer and client goal lined up precisely.";
        let assumption = "buyer budget pain timing process goal decision tool team client";
        let score = scorer.score(&quote(busy, Some("Ana"), Some("Managing Partner")), assumption);
        assert!(score.relevance <= 100);
        assert!(score.specificity <= 100);
        assert!(score.authority <= 100);
        assert!(score.overall <= 100);
    }

    #[test]
    fn relevance_awards_terms_bonus_and_topics() {
        let scorer = scorer();
        // Key terms after the length filter: budget, drives, purchase, process.
        let assumption = "budget drives the purchase process";
        let q = quote("our budget really drives everything around here", None, None);
        let score = scorer.score(&q, assumption);
        // Two term matches (budget, drives) = 50 + 20 bonus; topic "budget"
        // appears on both sides = +10.
        assert_eq!(score.relevance, 80);
    }

    #[test]
    fn specificity_counts_length_patterns_and_verbs() {
        let scorer = scorer();
        let q = quote(
            "We decided to switch because it saves exactly 10 hours every week for our team.",
            None,
            None,
        );
        let score = scorer.score(&q, "anything");
        // Length 79 -> 10; patterns: hour-count + emphasis word -> 16;
        // verbs: decide, switch -> 10.
        assert_eq!(score.specificity, 36);
    }

    #[test]
    fn short_vague_text_scores_near_zero() {
        let scorer = scorer();
        let score = scorer.score(&quote("It is fine.", None, None), "Attorneys decide");
        assert_eq!(score.relevance, 0);
        assert_eq!(score.specificity, 0);
        assert_eq!(score.authority, 50);
    }

    #[test]
    fn speaker_classification_priority_and_defaults() {
        let roles = KeywordTableSet::buyer_icp_v1().roles;

        let partner = quote("x", Some("John"), Some("Managing Partner"));
        assert_eq!(
            classify_speaker_role(&partner, &roles),
            SpeakerRole::DecisionMaker
        );

        let paralegal = quote("x", Some("Betty"), Some("Paralegal"));
        assert_eq!(classify_speaker_role(&paralegal, &roles), SpeakerRole::EndUser);

        // Office manager hits the influencer vocabulary before end-user.
        let office_manager = quote("x", Some("Sam"), Some("Office Manager"));
        assert_eq!(
            classify_speaker_role(&office_manager, &roles),
            SpeakerRole::Influencer
        );

        // Unmatched but present text defaults to influencer.
        let mystery = quote("x", Some("Robin"), Some("Wizard"));
        assert_eq!(classify_speaker_role(&mystery, &roles), SpeakerRole::Influencer);

        // No speaker text at all is unknown.
        let anonymous = quote("x", None, None);
        assert_eq!(classify_speaker_role(&anonymous, &roles), SpeakerRole::Unknown);
    }

    #[test]
    fn attorney_outranks_paralegal_on_authority_and_specificity() {
        let scorer = scorer();
        let assumption = "Attorneys are the primary decision-makers";

        let betty = scorer.score(
            &quote(
                "I handle most of the transcription work for our firm.",
                Some("Betty"),
                Some("Paralegal"),
            ),
            assumption,
        );
        let john = scorer.score(
            &quote(
                "As the managing partner I decide which tools we buy for the firm specifically.",
                Some("John"),
                Some("Attorney"),
            ),
            assumption,
        );

        assert_eq!(john.authority, 90);
        assert_eq!(betty.authority, 40);
        assert!(john.specificity > betty.specificity);
        assert!(john.overall > betty.overall);
    }

    #[test]
    fn overall_applies_weights_and_rounds() {
        let scorer = scorer();
        let q = quote("It is fine.", Some("Robin"), Some("Wizard"));
        let score = scorer.score(&q, "nothing matches here");
        // relevance 0, specificity 0, authority 70 -> round(14) = 14.
        assert_eq!(score.overall, 14);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = scorer();
        let q = quote(
            "We approved the budget and switched within 2 weeks.",
            Some("Dana"),
            Some("Director"),
        );
        let a = scorer.score(&q, "Budget approval happens fast");
        let b = scorer.score(&q, "Budget approval happens fast");
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_override_pattern_fails_construction() {
        let mut tables = KeywordTableSet::buyer_icp_v1();
        tables.detail.patterns.push("(unclosed".to_string());
        let err = QuoteScorer::new(tables).unwrap_err();
        assert!(matches!(err, AppError::Pattern { .. }));
    }
}
