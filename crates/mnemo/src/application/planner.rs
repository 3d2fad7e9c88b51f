//! Decision Planner
//!
//! Drives one message through the turn state machine:
//! received -> understood -> planned -> executed -> responded.
//! Understanding and planning are pure; execution talks to the
//! collaborators and degrades on their failures. Only a failed
//! response generation aborts the turn.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::config::MnemoConfig;
use crate::domain::entities::{MemoryEvent, MemoryEventKind, MemoryRecord};
use crate::domain::errors::{MemoryError, TurnWarning};
use crate::domain::value_objects::{
    DecisionPlan, Intent, Language, MajorType, RetrievalStrategy, RetrievalWeighting,
    StorageFormat, StorageStrategy, TypePath, TypePrefix,
};
use crate::ports::repositories::{MemoryRepository, MemorySearchFilter, SearchQuery};
use crate::ports::services::{CompletionService, EmbeddingService};
use crate::services::classifier::{Classification, HierarchicalClassifier};
use crate::services::processor::{ContentProcessor, ProcessedContent};
use crate::services::strategy::StorageStrategySelector;

use super::events::EventEmitter;

/// One inbound message together with its conversational context.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub user_id: String,
    pub session_id: Option<String>,
    pub message: String,
    /// Type path of the previous turn, used as a continuity bias
    pub prior_path: Option<TypePath>,
}

/// Everything the understanding phase derived from the message.
#[derive(Debug, Clone, Serialize)]
pub struct Understanding {
    pub classification: Classification,
    pub intent: Intent,
    pub language: Language,
    pub processed: ProcessedContent,
}

/// Turn state machine. Transitions are strictly forward; the phase on a
/// successful outcome is always `Responded`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Received,
    Understood,
    Planned,
    Executed,
    Responded,
}

/// Result of a completed turn.
#[derive(Debug, Serialize)]
pub struct TurnOutcome {
    pub plan: DecisionPlan,
    pub understanding: Understanding,
    /// Generated reply; `None` when the plan skipped the response
    pub response: Option<String>,
    /// Id of the stored user memory, if the plan stored one
    pub stored: Option<Uuid>,
    pub retrieved: Vec<MemoryRecord>,
    pub warnings: Vec<TurnWarning>,
    pub phase: TurnPhase,
}

/// Assistant replies shorter than this carry no recall value.
const RESPONSE_STORE_MIN_CHARS: usize = 20;

const KOREAN_INTERROGATIVES: [&str; 6] = ["뭐", "무엇", "어떻게", "왜", "언제", "누구"];
const RECALL_MARKERS: [&str; 10] = [
    "방금", "아까", "이전에", "전에 ", "어제", "기억", "말했", "remember", "earlier", "did i say",
];
const GREETING_MARKERS: [&str; 4] = ["안녕", "반가", "hello", "good morning"];
const ACK_MARKERS: [&str; 8] = [
    "알겠", "감사", "고마워", "넵", "thanks", "thank you", "got it", "okay",
];
const SHARING_MARKERS: [&str; 10] = [
    "입니다", "예요", "이에요", "저는", "제 ", "my name", "i am", "i'm", "i like", "i work",
];

pub struct DecisionPlanner<R, E, C> {
    repository: Arc<R>,
    embedder: Arc<E>,
    completer: Arc<C>,
    emitter: Arc<EventEmitter>,
    classifier: HierarchicalClassifier,
    processor: ContentProcessor,
    selector: StorageStrategySelector,
    config: MnemoConfig,
}

impl<R, E, C> DecisionPlanner<R, E, C>
where
    R: MemoryRepository,
    E: EmbeddingService,
    C: CompletionService,
{
    pub fn new(
        repository: Arc<R>,
        embedder: Arc<E>,
        completer: Arc<C>,
        emitter: Arc<EventEmitter>,
        config: MnemoConfig,
    ) -> Result<Self, MemoryError> {
        let taxonomy = config.taxonomy.clone().unwrap_or_default();
        let classifier = HierarchicalClassifier::new(taxonomy.clone(), config.confidence_floor);
        let processor = ContentProcessor::new(taxonomy, config.summary_cutoff)?;
        let selector = StorageStrategySelector::new(
            config.large_content_cutoff,
            Duration::from_secs(config.cache_ttl_secs),
        );
        Ok(Self {
            repository,
            embedder,
            completer,
            emitter,
            classifier,
            processor,
            selector,
            config,
        })
    }

    /// Run one message through the full turn. Collaborator failures on
    /// the retrieval and storage paths degrade to warnings; a response
    /// generation failure is the only hard error.
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<TurnOutcome, MemoryError> {
        tracing::info!(user_id = %request.user_id, phase = ?TurnPhase::Received, "turn started");

        let understanding = self.understand(&request);
        tracing::debug!(
            path = %understanding.classification.path,
            confidence = understanding.classification.confidence,
            intent = %understanding.intent,
            phase = ?TurnPhase::Understood,
            "message understood"
        );

        let plan = self.plan(&understanding);
        tracing::debug!(
            needs_retrieval = plan.needs_retrieval,
            needs_response = plan.needs_response,
            should_store = plan.should_store,
            phase = ?TurnPhase::Planned,
            "turn planned"
        );

        let mut warnings = Vec::new();

        let retrieved = match &plan.retrieval {
            Some(strategy) => {
                self.retrieve(&request, &understanding, strategy, &mut warnings)
                    .await
            }
            None => Vec::new(),
        };

        let stored = match &plan.storage {
            Some(strategy) => {
                self.store(&request, &understanding, strategy, &mut warnings)
                    .await
            }
            None => None,
        };
        tracing::debug!(
            retrieved = retrieved.len(),
            stored = ?stored,
            phase = ?TurnPhase::Executed,
            "plan executed"
        );

        let response = if plan.needs_response {
            let reply = self.respond(&understanding, &retrieved).await?;
            self.store_response(&request, &understanding, &reply).await;
            Some(reply)
        } else {
            None
        };
        tracing::info!(
            user_id = %request.user_id,
            warnings = warnings.len(),
            phase = ?TurnPhase::Responded,
            "turn completed"
        );

        Ok(TurnOutcome {
            plan,
            understanding,
            response,
            stored,
            retrieved,
            warnings,
            phase: TurnPhase::Responded,
        })
    }

    fn understand(&self, request: &TurnRequest) -> Understanding {
        let classification = self
            .classifier
            .classify(&request.message, request.prior_path.as_ref());
        let intent = detect_intent(&request.message);
        let language = Language::detect(&request.message);
        let processed = self.processor.process(&request.message, &classification.path);
        Understanding {
            classification,
            intent,
            language,
            processed,
        }
    }

    /// Derive the three decisions and their backing strategies. Pure.
    fn plan(&self, understanding: &Understanding) -> DecisionPlan {
        let intent = understanding.intent;

        let retrieval = match intent {
            Intent::RecallQuestion => Some(RetrievalStrategy {
                type_filter: Some(TypePrefix::minor(MajorType::Temporal, "conversation")),
                limit: self.config.recall_limit,
                weighting: RetrievalWeighting::Recency,
            }),
            Intent::GeneralQuery => Some(RetrievalStrategy {
                type_filter: None,
                limit: self.config.semantic_limit,
                weighting: RetrievalWeighting::Semantic,
            }),
            _ => None,
        };

        let store = understanding.processed.should_store
            && !matches!(intent, Intent::Greeting | Intent::Acknowledgment);
        let storage = store.then(|| {
            self.selector.select(
                &understanding.classification.path,
                understanding.processed.importance,
                understanding.processed.normalized.len(),
            )
        });

        DecisionPlan {
            needs_retrieval: retrieval.is_some(),
            needs_response: intent != Intent::Acknowledgment,
            should_store: store,
            retrieval,
            storage,
        }
    }

    /// Fetch context under a deadline. Any failure degrades to an empty
    /// context with a warning.
    async fn retrieve(
        &self,
        request: &TurnRequest,
        understanding: &Understanding,
        strategy: &RetrievalStrategy,
        warnings: &mut Vec<TurnWarning>,
    ) -> Vec<MemoryRecord> {
        let embedding = match strategy.weighting {
            RetrievalWeighting::Semantic => {
                match self.embedder.embed(&understanding.processed.normalized).await {
                    Ok(vector) => Some(vector),
                    Err(e) => {
                        tracing::warn!(error = %e, "query embedding failed, retrieval skipped");
                        warnings.push(TurnWarning::RetrievalUnavailable(e.to_string()));
                        return Vec::new();
                    }
                }
            }
            RetrievalWeighting::Recency => None,
        };

        let query = SearchQuery {
            embedding,
            filter: MemorySearchFilter {
                user_id: request.user_id.clone(),
                session_id: request.session_id.clone(),
                type_filter: strategy.type_filter.clone(),
                min_importance: None,
            },
            limit: strategy.limit,
            weighting: strategy.weighting,
        };

        let deadline = Duration::from_millis(self.config.retrieval_timeout_ms);
        let records = match tokio::time::timeout(deadline, self.repository.search(&query)).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "retrieval failed, responding without context");
                warnings.push(TurnWarning::RetrievalUnavailable(e.to_string()));
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(timeout_ms = self.config.retrieval_timeout_ms, "retrieval deadline exceeded");
                warnings.push(TurnWarning::RetrievalUnavailable(
                    "deadline exceeded".to_string(),
                ));
                Vec::new()
            }
        };

        self.emitter
            .emit(
                MemoryEvent::new(MemoryEventKind::Retrieved, &request.user_id)
                    .with_session(request.session_id.clone())
                    .with_payload("result_count", records.len().into()),
            )
            .await;
        records
    }

    /// Persist the user memory per the storage strategy. One retry on
    /// failure, then a warning; the turn continues either way.
    async fn store(
        &self,
        request: &TurnRequest,
        understanding: &Understanding,
        strategy: &StorageStrategy,
        warnings: &mut Vec<TurnWarning>,
    ) -> Option<Uuid> {
        let processed = &understanding.processed;
        let mut record = MemoryRecord::new(
            &request.user_id,
            request.session_id.clone(),
            processed.normalized.clone(),
            understanding.classification.path.clone(),
            processed.importance,
            processed.storage_format,
        )
        .with_metadata("intent", understanding.intent.to_string().into())
        .with_metadata("summary", processed.summary.clone().into())
        .with_metadata(
            "keywords",
            serde_json::to_value(&processed.keywords).unwrap_or_default(),
        )
        .with_metadata(
            "entities",
            serde_json::to_value(&processed.entities).unwrap_or_default(),
        );

        if strategy.include_embedding {
            match self.embedder.embed(&processed.normalized).await {
                Ok(vector) => {
                    if vector.len() != self.config.embedding_dimension {
                        let e = MemoryError::EmbeddingDimensionMismatch {
                            expected: self.config.embedding_dimension,
                            got: vector.len(),
                        };
                        tracing::warn!(error = %e, "rejecting record with mismatched embedding");
                        warnings.push(TurnWarning::StorageFailed(e.to_string()));
                        return None;
                    }
                    record = record.with_embedding(vector);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "embedding failed, storing without vector");
                    warnings.push(TurnWarning::StorageFailed(e.to_string()));
                }
            }
        }

        let id = match self.repository.insert(&record).await {
            Ok(id) => Some(id),
            Err(first) => {
                tracing::warn!(error = %first, "insert failed, retrying once");
                tokio::time::sleep(Duration::from_millis(self.config.store_retry_backoff_ms)).await;
                match self.repository.insert(&record).await {
                    Ok(id) => Some(id),
                    Err(second) => {
                        tracing::error!(error = %second, "insert failed after retry");
                        warnings.push(TurnWarning::StorageFailed(second.to_string()));
                        None
                    }
                }
            }
        };

        if let Some(id) = id {
            self.emitter
                .emit(
                    MemoryEvent::new(MemoryEventKind::Created, &request.user_id)
                        .with_memory_id(id)
                        .with_session(request.session_id.clone())
                        .with_payload("type_path", understanding.classification.path.to_string().into())
                        .with_payload("importance", processed.importance.into()),
                )
                .await;
        }
        id
    }

    /// Generate the reply. This is the one collaborator failure that
    /// aborts the turn.
    async fn respond(
        &self,
        understanding: &Understanding,
        retrieved: &[MemoryRecord],
    ) -> Result<String, MemoryError> {
        let prompt = build_prompt(understanding, retrieved);
        self.completer
            .complete(&prompt)
            .await
            .map_err(|e| MemoryError::ResponseFailed(e.to_string()))
    }

    /// Keep substantial assistant replies so later recall questions can
    /// find both sides of the exchange. Best-effort, no retry.
    async fn store_response(&self, request: &TurnRequest, understanding: &Understanding, reply: &str) {
        if reply.chars().count() <= RESPONSE_STORE_MIN_CHARS {
            return;
        }
        let importance = if understanding.intent == Intent::RecallQuestion {
            7.0
        } else {
            5.0
        };
        let record = MemoryRecord::new(
            &request.user_id,
            request.session_id.clone(),
            reply,
            TypePath::new(MajorType::Temporal, "conversation", "response"),
            importance,
            StorageFormat::Full,
        )
        .with_metadata("intent", understanding.intent.to_string().into());

        match self.repository.insert(&record).await {
            Ok(id) => {
                self.emitter
                    .emit(
                        MemoryEvent::new(MemoryEventKind::Created, &request.user_id)
                            .with_memory_id(id)
                            .with_session(request.session_id.clone())
                            .with_payload("type_path", record.type_path.to_string().into()),
                    )
                    .await;
            }
            Err(e) => {
                tracing::debug!(error = %e, "assistant reply not stored");
            }
        }
    }
}

/// Surface-pattern intent detection. Recall markers next to a question
/// outrank everything; greetings and acknowledgments are templates;
/// declarative self-description is information sharing.
fn detect_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();
    let question = text.contains('?')
        || KOREAN_INTERROGATIVES.iter().any(|m| lower.contains(m));
    if question && RECALL_MARKERS.iter().any(|m| lower.contains(m)) {
        return Intent::RecallQuestion;
    }
    let first_token = lower
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !c.is_alphanumeric());
    if GREETING_MARKERS.iter().any(|m| lower.contains(m)) || first_token == "hi" || first_token == "hey" {
        return Intent::Greeting;
    }
    if !question
        && (ACK_MARKERS.iter().any(|m| lower.contains(m)) || first_token == "ok" || first_token == "네")
    {
        return Intent::Acknowledgment;
    }
    if question {
        return Intent::GeneralQuery;
    }
    if SHARING_MARKERS.iter().any(|m| lower.contains(m)) {
        return Intent::InformationSharing;
    }
    Intent::GeneralQuery
}

fn build_prompt(understanding: &Understanding, retrieved: &[MemoryRecord]) -> String {
    let mut prompt = String::new();
    if !retrieved.is_empty() {
        prompt.push_str("Known context about the user, most relevant first:\n");
        for record in retrieved {
            prompt.push_str("- ");
            prompt.push_str(&record.content);
            prompt.push('\n');
        }
        prompt.push('\n');
    }
    prompt.push_str(match understanding.intent {
        Intent::Greeting => "Reply with a brief, friendly greeting.\n",
        Intent::RecallQuestion => {
            "Answer strictly from the context above. If the context does not contain the answer, say you do not remember.\n"
        }
        Intent::InformationSharing => {
            "Acknowledge what the user shared in one or two sentences.\n"
        }
        Intent::Acknowledgment | Intent::GeneralQuery => {
            "Answer helpfully, using the context above when it is relevant.\n"
        }
    });
    prompt.push_str(match understanding.language {
        Language::Korean => "Respond in Korean.\n\n",
        Language::English => "Respond in English.\n\n",
    });
    prompt.push_str("User message: ");
    prompt.push_str(&understanding.processed.normalized);
    prompt
}
