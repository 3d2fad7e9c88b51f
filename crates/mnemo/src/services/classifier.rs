//! Hierarchical Classifier
//!
//! Maps raw text to a (major, minor, detail) type path plus a
//! confidence score by keyword evidence, descending the taxonomy one
//! level at a time. Pure function of (text, prior context); it never
//! fails — ambiguous input falls back to a default leaf.

use serde::Serialize;

use crate::domain::value_objects::{MajorType, TypePath};
use crate::services::taxonomy::Taxonomy;

/// Result of hierarchical classification.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Classification {
    pub path: TypePath,
    pub confidence: f64,
}

pub struct HierarchicalClassifier {
    taxonomy: Taxonomy,
    confidence_floor: f64,
}

/// Confidence normalizer: a cumulative keyword weight of 3.0 counts as
/// full confidence.
const SCORE_SCALE: f64 = 3.0;

/// Boost multipliers for continuity with the previous turn's path.
const MAJOR_CONTINUITY_BOOST: f64 = 1.2;
const MINOR_CONTINUITY_BOOST: f64 = 1.25;
const DETAIL_CONTINUITY_BOOST: f64 = 1.5;

const KOREAN_INTERROGATIVES: [&str; 6] = ["뭐", "무엇", "어떻게", "왜", "언제", "누구"];

impl HierarchicalClassifier {
    pub fn new(taxonomy: Taxonomy, confidence_floor: f64) -> Self {
        Self {
            taxonomy,
            confidence_floor,
        }
    }

    /// Classify text, optionally biased toward the previous turn's
    /// type path. Deterministic: equal scores resolve by continuity
    /// first, then lexicographic label order.
    pub fn classify(&self, text: &str, prior: Option<&TypePath>) -> Classification {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Classification {
                path: TypePath::default_leaf(),
                confidence: 0.0,
            };
        }
        let lower = trimmed.to_lowercase();

        // Keyword evidence per leaf, boosted for continuity.
        let mut scored: Vec<(TypePath, f64)> = Vec::new();
        for leaf in self.taxonomy.leaves() {
            let mut score = 0.0;
            for keyword in &leaf.node.keywords {
                if lower.contains(keyword.as_str()) {
                    // Longer keywords are more specific; leading
                    // position doubles the evidence.
                    let mut weight = keyword.chars().count() as f64 / 10.0;
                    if lower.starts_with(keyword.as_str()) {
                        weight *= 2.0;
                    }
                    score += weight;
                }
            }
            if score > 0.0 {
                if let Some(prior) = prior {
                    if leaf.path == *prior {
                        score *= DETAIL_CONTINUITY_BOOST;
                    } else if leaf.path.major == prior.major && leaf.path.minor == prior.minor {
                        score *= MINOR_CONTINUITY_BOOST;
                    } else if leaf.path.major == prior.major {
                        score *= MAJOR_CONTINUITY_BOOST;
                    }
                }
                scored.push((leaf.path, score));
            }
        }

        if let Some(result) = self.descend(&scored, prior) {
            if result.confidence >= self.confidence_floor {
                return result;
            }
        }

        self.fallback(trimmed, &lower)
    }

    /// Pick the strongest major subtree, then the strongest minor
    /// within it, then the strongest leaf.
    fn descend(&self, scored: &[(TypePath, f64)], prior: Option<&TypePath>) -> Option<Classification> {
        if scored.is_empty() {
            return None;
        }

        let major = Self::best_group(scored.iter().map(|(p, s)| (p.major.to_string(), *s)), |label| {
            prior.map(|p| p.major.to_string() == *label).unwrap_or(false)
        })?;
        let major_score = major.1;
        let major: MajorType = major.0.parse().ok()?;

        let under_major: Vec<&(TypePath, f64)> =
            scored.iter().filter(|(p, _)| p.major == major).collect();
        let minor = Self::best_group(
            under_major.iter().map(|(p, s)| (p.minor.clone(), *s)),
            |label| prior.map(|p| p.major == major && p.minor == *label).unwrap_or(false),
        )?;

        let leaf = under_major
            .iter()
            .filter(|(p, _)| p.minor == minor.0)
            .max_by(|(pa, sa), (pb, sb)| {
                sa.total_cmp(sb).then_with(|| pb.detail.cmp(&pa.detail))
            })?;

        Some(Classification {
            path: leaf.0.clone(),
            confidence: (major_score / SCORE_SCALE).min(1.0),
        })
    }

    /// Aggregate (label, score) pairs and return the winning label with
    /// its summed score. Continuity with the prior path wins ties, then
    /// lexicographic order.
    fn best_group<I>(items: I, is_prior: impl Fn(&String) -> bool) -> Option<(String, f64)>
    where
        I: Iterator<Item = (String, f64)>,
    {
        let mut groups: std::collections::BTreeMap<String, f64> = std::collections::BTreeMap::new();
        for (label, score) in items {
            *groups.entry(label).or_insert(0.0) += score;
        }
        groups
            .into_iter()
            .max_by(|(la, sa), (lb, sb)| {
                sa.total_cmp(sb)
                    .then_with(|| is_prior(la).cmp(&is_prior(lb)))
                    .then_with(|| lb.cmp(la))
            })
    }

    /// No usable keyword evidence: question marks and interrogatives
    /// mean a question, short text is a plain statement, anything long
    /// is treated as general knowledge.
    fn fallback(&self, text: &str, lower: &str) -> Classification {
        if text.contains('?') || KOREAN_INTERROGATIVES.iter().any(|q| lower.contains(q)) {
            return Classification {
                path: TypePath::new(MajorType::Temporal, "conversation", "question"),
                confidence: 0.8,
            };
        }
        if text.split_whitespace().count() < 10 {
            return Classification {
                path: TypePath::default_leaf(),
                confidence: 0.5,
            };
        }
        Classification {
            path: TypePath::new(MajorType::Knowledge, "fact", "general"),
            confidence: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HierarchicalClassifier {
        HierarchicalClassifier::new(Taxonomy::builtin(), 0.1)
    }

    #[test]
    fn test_greeting_classified_under_conversation() {
        let result = classifier().classify("안녕하세요!", None);
        assert_eq!(result.path.to_string(), "temporal/conversation/greeting");
        assert!(result.confidence > 0.1);
    }

    #[test]
    fn test_identity_sentence_is_personal() {
        let result = classifier().classify("제 이름은 김철수입니다. 서울에 사는 30살 개발자예요.", None);
        assert_eq!(result.path.major, MajorType::Personal);
        assert_eq!(result.path.minor, "identity");
    }

    #[test]
    fn test_deterministic() {
        let c = classifier();
        let prior = TypePath::new(MajorType::Knowledge, "skill", "technical");
        let a = c.classify("저는 Python 프로그래밍을 잘해요", Some(&prior));
        let b = c.classify("저는 Python 프로그래밍을 잘해요", Some(&prior));
        assert_eq!(a, b);
    }

    #[test]
    fn test_prior_context_boosts_continuity() {
        let c = classifier();
        // "좋아" (preference) and "음악" (music) both match; a prior
        // preference path should keep the topic under preference.
        let prior = TypePath::new(MajorType::Personal, "preference", "music");
        let with_prior = c.classify("음악 좋아해요", Some(&prior));
        assert_eq!(with_prior.path.major, MajorType::Personal);
        assert_eq!(with_prior.path.minor, "preference");
    }

    #[test]
    fn test_question_fallback() {
        let result = classifier().classify("Is there a meetup tomorrow in town?", None);
        // '?' routes to the question leaf when keyword evidence is thin
        assert_eq!(result.path.major, MajorType::Temporal);
    }

    #[test]
    fn test_empty_text_returns_default_leaf_with_zero_confidence() {
        let result = classifier().classify("   ", None);
        assert_eq!(result.path, TypePath::default_leaf());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_unmatched_short_text_is_statement() {
        let result = classifier().classify("blue crane", None);
        assert_eq!(result.path, TypePath::default_leaf());
        assert_eq!(result.confidence, 0.5);
    }
}
