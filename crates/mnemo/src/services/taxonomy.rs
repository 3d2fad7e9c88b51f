//! Taxonomy - the loadable memory type tree
//!
//! The tree is data, not a class hierarchy: a flat list of nodes with
//! parent links, so new types and patterns arrive via configuration.
//! Depth is fixed at three levels (major / minor / detail); leaves
//! carry the match keywords, minors carry importance and storage
//! tuning.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{MajorType, TypePath};

/// One node in the type tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyNode {
    pub label: String,
    /// Index of the parent node; `None` marks a major category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    /// Match keywords; meaningful on leaves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Base importance for content classified under this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_importance: Option<f64>,
    /// Importance a record must reach to be stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_threshold: Option<f64>,
    /// Whether content of this type is expected to yield structured
    /// entities (drives the json storage format)
    #[serde(default)]
    pub structured: bool,
}

/// A leaf together with its resolved path.
#[derive(Debug, Clone)]
pub struct LeafRef<'a> {
    pub path: TypePath,
    pub node: &'a TaxonomyNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    nodes: Vec<TaxonomyNode>,
}

const DEFAULT_BASE_IMPORTANCE: f64 = 5.0;
const DEFAULT_STORAGE_THRESHOLD: f64 = 4.0;

impl Taxonomy {
    pub fn new(nodes: Vec<TaxonomyNode>) -> Self {
        Self { nodes }
    }

    /// All leaves with their resolved (major, minor, detail) paths.
    /// Nodes whose major label is outside the closed set are skipped.
    pub fn leaves(&self) -> Vec<LeafRef<'_>> {
        let mut out = Vec::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if self.is_leaf(idx) {
                if let Some(path) = self.path_of(idx) {
                    out.push(LeafRef { path, node });
                }
            }
        }
        out
    }

    fn is_leaf(&self, idx: usize) -> bool {
        self.nodes[idx].parent.is_some()
            && !self.nodes.iter().any(|n| n.parent == Some(idx))
    }

    /// Resolve the full path of a leaf node by walking parent links.
    pub fn path_of(&self, idx: usize) -> Option<TypePath> {
        let leaf = self.nodes.get(idx)?;
        let minor_idx = leaf.parent?;
        let minor = self.nodes.get(minor_idx)?;
        let major_idx = minor.parent?;
        let major = self.nodes.get(major_idx)?;
        let major: MajorType = major.label.parse().ok()?;
        Some(TypePath::new(major, minor.label.clone(), leaf.label.clone()))
    }

    fn minor_node(&self, path: &TypePath) -> Option<&TaxonomyNode> {
        let major_label = path.major.to_string();
        let major_idx = self
            .nodes
            .iter()
            .position(|n| n.parent.is_none() && n.label == major_label)?;
        self.nodes
            .iter()
            .find(|n| n.parent == Some(major_idx) && n.label == path.minor)
    }

    fn major_node(&self, path: &TypePath) -> Option<&TaxonomyNode> {
        let major_label = path.major.to_string();
        self.nodes
            .iter()
            .find(|n| n.parent.is_none() && n.label == major_label)
    }

    /// Base importance for a path: nearest ancestor that sets one.
    pub fn base_importance(&self, path: &TypePath) -> f64 {
        self.minor_node(path)
            .and_then(|n| n.base_importance)
            .or_else(|| self.major_node(path).and_then(|n| n.base_importance))
            .unwrap_or(DEFAULT_BASE_IMPORTANCE)
    }

    /// Storage threshold for a path: nearest ancestor that sets one.
    pub fn storage_threshold(&self, path: &TypePath) -> f64 {
        self.minor_node(path)
            .and_then(|n| n.storage_threshold)
            .or_else(|| self.major_node(path).and_then(|n| n.storage_threshold))
            .unwrap_or(DEFAULT_STORAGE_THRESHOLD)
    }

    /// Whether this type expects structured entities.
    pub fn expects_structure(&self, path: &TypePath) -> bool {
        self.minor_node(path).map(|n| n.structured).unwrap_or(false)
    }

    /// The built-in type tree: personal / knowledge / temporal with the
    /// default Korean + English match keywords.
    pub fn builtin() -> Self {
        let mut b = Builder::default();

        let personal = b.major("personal");
        let identity = b.minor(personal, "identity", 9.0, 1.0, true);
        b.leaf(identity, "name", &["이름", "성함", "호칭", "name", "called"]);
        b.leaf(identity, "age", &["나이", "살", "세", "출생", "age", "born"]);
        b.leaf(
            identity,
            "location",
            &["살고", "거주", "위치", "주소", "사는", "live", "location"],
        );
        b.leaf(identity, "gender", &["성별", "남자", "여자", "gender"]);
        b.leaf(identity, "family", &["가족", "부모", "형제", "자녀", "family"]);

        let preference = b.minor(personal, "preference", 7.0, 4.0, true);
        b.leaf(
            preference,
            "food",
            &["먹는", "음식", "좋아하는", "싫어하는", "food", "eat", "taste"],
        );
        b.leaf(preference, "music", &["음악", "노래", "듣는", "music", "song"]);
        b.leaf(
            preference,
            "activity",
            &["운동", "취미", "활동", "즐기는", "hobby", "activity"],
        );
        b.leaf(preference, "style", &["스타일", "패션", "옷", "style", "fashion"]);
        b.leaf(
            preference,
            "general",
            &["좋아", "싫어", "선호", "like", "dislike", "prefer"],
        );

        let profession = b.minor(personal, "profession", 8.5, 4.0, false);
        b.leaf(
            profession,
            "job",
            &["직업", "개발자", "업무", "job", "work", "occupation"],
        );
        b.leaf(profession, "company", &["회사", "직장", "근무", "company", "office"]);
        b.leaf(profession, "role", &["역할", "직책", "담당", "role", "position", "title"]);
        b.leaf(profession, "career", &["경력", "커리어", "career", "experience"]);
        b.leaf(profession, "education", &["학교", "전공", "졸업", "education", "study"]);

        let knowledge = b.major("knowledge");
        let fact = b.minor(knowledge, "fact", 6.0, 4.0, false);
        b.leaf(fact, "general", &["사실", "정보", "알고", "fact", "information"]);
        b.leaf(fact, "specific", &["구체적", "정확한", "specific", "exact"]);
        b.leaf(fact, "historical", &["역사", "옛날", "history", "past"]);
        b.leaf(fact, "current", &["현재", "최근", "current", "now"]);

        let skill = b.minor(knowledge, "skill", 8.0, 4.0, true);
        b.leaf(
            skill,
            "technical",
            &["기술", "프로그래밍", "개발", "코딩", "tech", "programming"],
        );
        b.leaf(skill, "language", &["언어", "영어", "한국어", "language", "speak"]);
        b.leaf(
            skill,
            "soft",
            &["소통", "리더십", "협업", "communication", "leadership"],
        );
        b.leaf(skill, "tool", &["도구", "사용", "프로그램", "tool", "software"]);

        let experience = b.minor(knowledge, "experience", 7.0, 4.0, false);
        b.leaf(experience, "work", &["프로젝트", "일했", "project", "worked"]);
        b.leaf(experience, "personal", &["경험", "했던", "기억", "experienced", "memory"]);
        b.leaf(
            experience,
            "achievement",
            &["성과", "달성", "이뤘", "achievement", "accomplished"],
        );
        b.leaf(experience, "learning", &["배운", "학습", "공부", "learned", "studied"]);

        let temporal = b.major("temporal");
        let conversation = b.minor(temporal, "conversation", 5.0, 4.0, false);
        b.leaf(
            conversation,
            "question",
            &["뭐", "어떻게", "왜", "언제", "what", "how", "why"],
        );
        b.leaf(conversation, "statement", &["해요", "했어요", "라고", "is", "are", "was"]);
        b.leaf(conversation, "greeting", &["안녕", "반가", "hello", "hi"]);
        b.leaf(conversation, "response", &["응답", "대답", "yes", "response"]);

        let context = b.minor(temporal, "context", 4.0, 3.0, false);
        b.leaf(context, "current", &["지금", "오늘", "today"]);
        b.leaf(context, "past", &["어제", "예전", "과거", "yesterday", "before"]);
        b.leaf(context, "future", &["내일", "나중", "계획", "tomorrow", "later", "plan"]);
        b.leaf(context, "session", &["방금", "아까", "just", "recently"]);

        Self { nodes: b.nodes }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<TaxonomyNode>,
}

impl Builder {
    fn major(&mut self, label: &str) -> usize {
        self.push(TaxonomyNode {
            label: label.to_string(),
            parent: None,
            keywords: Vec::new(),
            base_importance: None,
            storage_threshold: None,
            structured: false,
        })
    }

    fn minor(
        &mut self,
        parent: usize,
        label: &str,
        importance: f64,
        threshold: f64,
        structured: bool,
    ) -> usize {
        self.push(TaxonomyNode {
            label: label.to_string(),
            parent: Some(parent),
            keywords: Vec::new(),
            base_importance: Some(importance),
            storage_threshold: Some(threshold),
            structured,
        })
    }

    fn leaf(&mut self, parent: usize, label: &str, keywords: &[&str]) -> usize {
        self.push(TaxonomyNode {
            label: label.to_string(),
            parent: Some(parent),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            base_importance: None,
            storage_threshold: None,
            structured: false,
        })
    }

    fn push(&mut self, node: TaxonomyNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_leaf_paths_resolve() {
        let tax = Taxonomy::builtin();
        let leaves = tax.leaves();
        assert!(leaves
            .iter()
            .any(|l| l.path.to_string() == "personal/identity/name"));
        assert!(leaves
            .iter()
            .any(|l| l.path.to_string() == "temporal/conversation/greeting"));
    }

    #[test]
    fn test_importance_and_threshold_lookup() {
        let tax = Taxonomy::builtin();
        let identity = TypePath::new(MajorType::Personal, "identity", "name");
        assert_eq!(tax.base_importance(&identity), 9.0);
        assert_eq!(tax.storage_threshold(&identity), 1.0);
        assert!(tax.expects_structure(&identity));

        let conv = TypePath::new(MajorType::Temporal, "conversation", "statement");
        assert_eq!(tax.base_importance(&conv), 5.0);
        assert!(!tax.expects_structure(&conv));

        let unknown = TypePath::new(MajorType::Knowledge, "nonexistent", "x");
        assert_eq!(tax.base_importance(&unknown), 5.0);
        assert_eq!(tax.storage_threshold(&unknown), 4.0);
    }

    #[test]
    fn test_taxonomy_loads_from_json() {
        let json = r#"{"nodes": [
            {"label": "personal"},
            {"label": "identity", "parent": 0, "base_importance": 9.5, "structured": true},
            {"label": "nickname", "parent": 1, "keywords": ["별명", "nickname"]}
        ]}"#;
        let tax: Taxonomy = serde_json::from_str(json).unwrap();
        let leaves = tax.leaves();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].path.to_string(), "personal/identity/nickname");
        assert_eq!(tax.base_importance(&leaves[0].path), 9.5);
    }
}
