//! Content Processor
//!
//! Normalizes text, extracts entities and keywords with type-aware
//! patterns, scores importance, and picks the storage format. All of
//! it is synchronous and CPU-bound; extraction failures recover to
//! verbatim storage instead of surfacing.

use regex::Regex;
use serde::Serialize;

use crate::domain::errors::MemoryError;
use crate::domain::value_objects::{MajorType, StorageFormat, TypePath};
use crate::services::taxonomy::Taxonomy;

/// A structured value pulled out of the content.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Entity {
    pub kind: String,
    pub value: String,
    pub confidence: f64,
}

/// Result of content processing, consumed by the planner.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedContent {
    pub normalized: String,
    pub entities: Vec<Entity>,
    pub keywords: Vec<String>,
    pub summary: String,
    pub importance: f64,
    pub storage_format: StorageFormat,
    pub should_store: bool,
}

pub struct ContentProcessor {
    taxonomy: Taxonomy,
    summary_cutoff: usize,
    identity_patterns: Vec<(&'static str, Regex)>,
    generic_patterns: Vec<(&'static str, Regex)>,
    duration_pattern: Regex,
    whitespace: Regex,
    particle_suffix: Regex,
    meaningful_word: Regex,
}

/// Per-entity importance increment and its cap.
const ENTITY_BONUS: f64 = 0.25;
const ENTITY_BONUS_CAP: f64 = 1.0;
/// Questions in conversation carry more retrieval value than statements.
const QUESTION_BONUS: f64 = 2.0;
/// Multiplier for greetings/acknowledgments: drives importance toward 0.
const TEMPLATIC_PENALTY: f64 = 0.1;
const SHORT_CONTENT_PENALTY: f64 = 0.5;
const SUMMARY_MAX_CHARS: usize = 100;
const MAX_KEYWORDS: usize = 10;

const TEMPLATIC_MARKERS: [&str; 14] = [
    "안녕", "반가", "감사", "고마워", "알겠", "넵", "hello", "hi", "thanks", "thank you", "ok",
    "okay", "yes", "bye",
];

const STOP_WORDS: [&str; 19] = [
    "는", "은", "이", "가", "을", "를", "에", "에서", "으로", "와", "과", "의", "하다", "있다",
    "되다", "수", "그", "이것", "그것",
];

const TECHNOLOGY_KEYWORDS: [&str; 12] = [
    "python",
    "java",
    "javascript",
    "typescript",
    "rust",
    "go",
    "react",
    "docker",
    "kubernetes",
    "postgresql",
    "개발",
    "프로그래밍",
];

impl ContentProcessor {
    pub fn new(taxonomy: Taxonomy, summary_cutoff: usize) -> Result<Self, MemoryError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| MemoryError::ExtractionFailure(e.to_string()))
        };
        Ok(Self {
            taxonomy,
            summary_cutoff,
            identity_patterns: vec![
                (
                    "name",
                    compile(r"(?:제 이름은|저는|나는)\s*([가-힣]{2,5})(?:입니다|예요|이에요)")?,
                ),
                ("name", compile(r"[Mm]y name is\s+([A-Za-z]+)")?),
                ("age", compile(r"(\d{1,3})\s*(?:살|세)")?),
                (
                    "location",
                    compile(
                        r"(서울|부산|대구|인천|광주|대전|울산|세종|제주|경기|강원|충북|충남|전북|전남|경북|경남)",
                    )?,
                ),
                (
                    "profession",
                    compile(
                        r"(개발자|디자이너|엔지니어|연구원|기획자|마케터|교사|의사|변호사|학생)",
                    )?,
                ),
            ],
            generic_patterns: vec![
                ("date", compile(r"(\d{4}년\s*\d{1,2}월\s*\d{1,2}일)")?),
                ("number", compile(r"\b(\d+(?:\.\d+)?)\b")?),
            ],
            duration_pattern: compile(r"(\d+)\s*년")?,
            whitespace: compile(r"\s+")?,
            particle_suffix: compile(r"[은는이가을를에서]$")?,
            meaningful_word: compile(r"[가-힣]{2,}|[A-Za-z]{3,}")?,
        })
    }

    /// Process content for storage under an already-classified type.
    pub fn process(&self, text: &str, path: &TypePath) -> ProcessedContent {
        let normalized = self.normalize(text);

        let entities = match self.extract_entities(&normalized, path) {
            Ok(entities) => entities,
            Err(e) => {
                // Recover to verbatim storage rather than losing the turn.
                tracing::warn!(error = %e, "entity extraction failed, storing verbatim");
                return ProcessedContent {
                    summary: self.summarize(&normalized),
                    keywords: self.extract_keywords(&normalized),
                    importance: self.taxonomy.base_importance(path).clamp(0.0, 10.0),
                    storage_format: StorageFormat::Full,
                    should_store: true,
                    entities: Vec::new(),
                    normalized,
                };
            }
        };
        let keywords = self.extract_keywords(&normalized);
        let summary = self.summarize(&normalized);
        let importance = self.score_importance(&normalized, path, &entities);
        let should_store = importance >= self.taxonomy.storage_threshold(path);
        let storage_format = self.pick_format(&normalized, path, &entities);

        ProcessedContent {
            normalized,
            entities,
            keywords,
            summary,
            importance,
            storage_format,
            should_store,
        }
    }

    fn normalize(&self, text: &str) -> String {
        self.whitespace.replace_all(text.trim(), " ").into_owned()
    }

    /// Type-aware extraction: personal content runs the identity
    /// extractors, skill content runs technology/duration extractors,
    /// conversation is kept verbatim.
    fn extract_entities(&self, text: &str, path: &TypePath) -> Result<Vec<Entity>, MemoryError> {
        let mut entities = Vec::new();

        match (path.major, path.minor.as_str()) {
            (MajorType::Temporal, "conversation") => return Ok(entities),
            (MajorType::Personal, _) => {
                for (kind, pattern) in &self.identity_patterns {
                    for caps in pattern.captures_iter(text) {
                        if let Some(m) = caps.get(1) {
                            entities.push(Entity {
                                kind: (*kind).to_string(),
                                value: m.as_str().trim().to_string(),
                                confidence: if m.as_str().chars().count() > 2 { 0.8 } else { 0.6 },
                            });
                        }
                    }
                }
            }
            (MajorType::Knowledge, "skill") => {
                let lower = text.to_lowercase();
                for tech in TECHNOLOGY_KEYWORDS {
                    if lower.contains(tech) {
                        entities.push(Entity {
                            kind: "technology".to_string(),
                            value: tech.to_string(),
                            confidence: 0.8,
                        });
                    }
                }
                for caps in self.duration_pattern.captures_iter(text) {
                    if let Some(m) = caps.get(1) {
                        entities.push(Entity {
                            kind: "duration_years".to_string(),
                            value: m.as_str().to_string(),
                            confidence: 0.9,
                        });
                    }
                }
            }
            _ => {}
        }

        for (kind, pattern) in &self.generic_patterns {
            for caps in pattern.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    // Skip numbers already captured as a typed entity.
                    if *kind == "number" && entities.iter().any(|e| e.value == m.as_str()) {
                        continue;
                    }
                    entities.push(Entity {
                        kind: (*kind).to_string(),
                        value: m.as_str().to_string(),
                        confidence: if *kind == "number" { 1.0 } else { 0.9 },
                    });
                }
            }
        }

        Ok(entities)
    }

    fn extract_keywords(&self, text: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut keywords = Vec::new();
        for word in text.split_whitespace() {
            let clean = self.particle_suffix.replace(word.trim_matches(|c: char| c.is_ascii_punctuation()), "");
            let clean = clean.trim();
            if clean.chars().count() < 2 || STOP_WORDS.contains(&clean) {
                continue;
            }
            if self.meaningful_word.is_match(clean) && seen.insert(clean.to_string()) {
                keywords.push(clean.to_string());
                if keywords.len() == MAX_KEYWORDS {
                    break;
                }
            }
        }
        keywords
    }

    /// First priority-marked sentence, else the leading sentence,
    /// capped to a fixed length.
    fn summarize(&self, text: &str) -> String {
        if text.chars().count() <= SUMMARY_MAX_CHARS {
            return text.to_string();
        }
        let sentences: Vec<&str> = text
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let priority_markers = ["중요", "핵심", "주요", "특히", "꼭", "반드시"];
        let chosen = sentences
            .iter()
            .find(|s| priority_markers.iter().any(|m| s.contains(m)))
            .or_else(|| sentences.first())
            .copied()
            .unwrap_or(text);
        chosen.chars().take(SUMMARY_MAX_CHARS).collect()
    }

    fn score_importance(&self, text: &str, path: &TypePath, entities: &[Entity]) -> f64 {
        let base = self.taxonomy.base_importance(path);
        let bonus = (entities.len() as f64 * ENTITY_BONUS).min(ENTITY_BONUS_CAP);
        let mut importance = base + bonus;

        if path.major == MajorType::Temporal && path.detail == "question" {
            importance += QUESTION_BONUS;
        }

        if Self::is_templatic(text) {
            importance *= TEMPLATIC_PENALTY;
        } else if text.chars().count() < 6 {
            importance *= SHORT_CONTENT_PENALTY;
        }

        importance.clamp(0.0, 10.0)
    }

    /// Greetings and acknowledgments: short and matching a stock phrase.
    fn is_templatic(text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.chars().count() > 15 {
            return false;
        }
        let lower = trimmed.to_lowercase();
        lower == "네" || lower == "응" || TEMPLATIC_MARKERS.iter().any(|m| lower.contains(m))
    }

    fn pick_format(&self, text: &str, path: &TypePath, entities: &[Entity]) -> StorageFormat {
        if !entities.is_empty() && self.taxonomy.expects_structure(path) {
            return StorageFormat::Json;
        }
        if !entities.is_empty() && path.major == MajorType::Knowledge && path.minor == "fact" {
            return StorageFormat::Structured;
        }
        if text.chars().count() > self.summary_cutoff {
            return StorageFormat::Summary;
        }
        StorageFormat::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> ContentProcessor {
        ContentProcessor::new(Taxonomy::builtin(), 500).unwrap()
    }

    fn identity_path() -> TypePath {
        TypePath::new(MajorType::Personal, "identity", "name")
    }

    #[test]
    fn test_identity_entity_extraction() {
        let p = processor();
        let result = p.process("제 이름은 김철수입니다. 서울에 사는 30살 개발자예요.", &identity_path());

        let find = |kind: &str| {
            result
                .entities
                .iter()
                .find(|e| e.kind == kind)
                .map(|e| e.value.clone())
        };
        assert_eq!(find("name").as_deref(), Some("김철수"));
        assert_eq!(find("location").as_deref(), Some("서울"));
        assert_eq!(find("age").as_deref(), Some("30"));
        assert_eq!(find("profession").as_deref(), Some("개발자"));

        assert!(result.importance >= 8.0);
        assert_eq!(result.storage_format, StorageFormat::Json);
        assert!(result.should_store);
    }

    #[test]
    fn test_importance_always_in_range() {
        let p = processor();
        let paths = [
            identity_path(),
            TypePath::new(MajorType::Knowledge, "skill", "technical"),
            TypePath::new(MajorType::Temporal, "conversation", "question"),
            TypePath::new(MajorType::Temporal, "conversation", "greeting"),
        ];
        let texts = [
            "안녕하세요!",
            "제 이름은 김철수입니다. 서울에 사는 30살 개발자예요.",
            "",
            "네",
            "Python과 Rust로 5년 동안 개발했습니다",
        ];
        for path in &paths {
            for text in &texts {
                let result = p.process(text, path);
                assert!(
                    (0.0..=10.0).contains(&result.importance),
                    "importance out of range for {:?}: {}",
                    text,
                    result.importance
                );
            }
        }
    }

    #[test]
    fn test_greeting_not_stored() {
        let p = processor();
        let path = TypePath::new(MajorType::Temporal, "conversation", "greeting");
        let result = p.process("안녕하세요!", &path);
        assert!(result.importance < 1.0);
        assert!(!result.should_store);
    }

    #[test]
    fn test_skill_extraction() {
        let p = processor();
        let path = TypePath::new(MajorType::Knowledge, "skill", "technical");
        let result = p.process("Python과 Docker를 3년 사용했습니다", &path);
        assert!(result
            .entities
            .iter()
            .any(|e| e.kind == "technology" && e.value == "python"));
        assert!(result
            .entities
            .iter()
            .any(|e| e.kind == "duration_years" && e.value == "3"));
        assert_eq!(result.storage_format, StorageFormat::Json);
    }

    #[test]
    fn test_conversation_kept_verbatim() {
        let p = processor();
        let path = TypePath::new(MajorType::Temporal, "conversation", "statement");
        let result = p.process("오늘 회의는 잘 끝났어요", &path);
        assert!(result.entities.is_empty());
        assert_eq!(result.storage_format, StorageFormat::Full);
    }

    #[test]
    fn test_long_content_summarized() {
        let p = ContentProcessor::new(Taxonomy::builtin(), 50).unwrap();
        let path = TypePath::new(MajorType::Knowledge, "experience", "work");
        let long = "지난 분기에 검색 인프라를 개선하는 프로젝트를 진행했습니다. 특히 색인 파이프라인이 중요했습니다. 결과적으로 지연 시간이 절반으로 줄었습니다.";
        let result = p.process(long, &path);
        assert_eq!(result.storage_format, StorageFormat::Summary);
        assert!(result.summary.chars().count() <= 100);
        // Priority-marked sentence wins
        assert!(result.summary.contains("중요"));
    }

    #[test]
    fn test_keywords_filtered_and_deduplicated() {
        let p = processor();
        let path = TypePath::new(MajorType::Temporal, "conversation", "statement");
        let result = p.process("음악 음악 감상이 저는 취미예요", &path);
        let count = result.keywords.iter().filter(|k| k.contains("음악")).count();
        assert_eq!(count, 1);
        assert!(!result.keywords.iter().any(|k| k == "저는" || k == "는"));
    }
}
