//! Complete RAG pipeline: Retrieve -> Rank -> Generate

use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::index::PlayerIndex;
use crate::llm::prompts::analyst_messages;
use crate::llm::GenerationParams;
use crate::llm::LlmService;
use crate::rag::ContextAssembler;
use crate::rag::IntentSet;
use crate::rag::Retriever;
use crate::rag::SearchFilters;
use crate::rag::SearchOutcome;
use crate::rag::SearchResult;

/// Shown when nothing was retrieved and no other context was supplied
pub const NO_RELEVANT_INFORMATION: &str = "No relevant information found";

/// Complete RAG service
pub struct RagService {
    retriever: Retriever,
    context_assembler: ContextAssembler,
    llm_service: Arc<LlmService>,
}

impl RagService {
    /// Create a new RAG service over an already loaded index
    pub fn new(config: &AppConfig, index: Arc<PlayerIndex>) -> Result<Self> {
        let embedding_service = Arc::new(EmbeddingService::new(config)?);
        let retriever = Retriever::new(index, embedding_service, config.retrieval.clone());
        let llm_service = Arc::new(LlmService::new(config)?);
        Ok(Self::from_services(retriever, llm_service))
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(retriever: Retriever, llm_service: Arc<LlmService>) -> Self {
        Self {
            retriever,
            context_assembler: ContextAssembler::default(),
            llm_service,
        }
    }

    /// Retrieval only, no generation
    pub async fn search(
        &self,
        question: &str,
        top_k: usize,
        filters: &SearchFilters,
    ) -> Result<SearchOutcome> {
        self.retriever.search(question, top_k, filters).await
    }

    /// Answer a question from retrieved records and any extra context
    pub async fn ask(&self, query: RagQuery) -> Result<RagOutcome> {
        info!("Processing RAG query: {}", query.question);

        debug!("Step 1: Retrieving players");
        let top_k = query.top_k.unwrap_or(self.retriever.config().top_k);
        let outcome = self
            .retriever
            .search(&query.question, top_k, &query.filters)
            .await?;

        if outcome.results.is_empty() && query.extra_context.is_empty() {
            info!("No relevant records for query, skipping generation");
            return Ok(RagOutcome::NoRelevantInformation {
                question: query.question,
                intents: outcome.intents,
            });
        }

        debug!("Step 2: Assembling context");
        let context = self
            .context_assembler
            .assemble(&outcome.results, &query.extra_context);

        debug!("Step 3: Generating answer");
        let defaults = self.llm_service.defaults();
        let params = GenerationParams {
            model: defaults.model.clone(),
            temperature: query.temperature.unwrap_or(defaults.temperature),
            max_tokens: query.max_tokens.unwrap_or(defaults.max_tokens),
        };
        let messages = analyst_messages(&context, &query.question);
        let answer = self
            .llm_service
            .generate_with_params(&messages, &params)
            .await?;

        info!("RAG query completed successfully");
        Ok(RagOutcome::Answered(RagResponse {
            id: Uuid::new_v4(),
            question: query.question,
            answer,
            sources: outcome.results,
            context,
            intents: outcome.intents,
            generated_at: Utc::now(),
        }))
    }

    /// Get retriever reference
    #[must_use]
    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}

/// RAG query options
#[derive(Debug, Clone, Default)]
pub struct RagQuery {
    pub question: String,
    /// Falls back to `retrieval.top_k`
    pub top_k: Option<usize>,
    pub filters: SearchFilters,
    /// Extra blocks appended after the retrieved records, e.g. a Sleeper roster
    pub extra_context: Vec<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

impl RagQuery {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum RagOutcome {
    Answered(RagResponse),
    NoRelevantInformation {
        question: String,
        intents: IntentSet,
    },
}

impl RagOutcome {
    /// The model's answer, or the fixed "nothing found" message
    pub fn answer(&self) -> &str {
        match self {
            Self::Answered(response) => &response.answer,
            Self::NoRelevantInformation { .. } => NO_RELEVANT_INFORMATION,
        }
    }

    pub fn sources(&self) -> &[SearchResult] {
        match self {
            Self::Answered(response) => &response.sources,
            Self::NoRelevantInformation { .. } => &[],
        }
    }
}

/// RAG response
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub sources: Vec<SearchResult>,
    pub context: String,
    pub intents: IntentSet,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::config::RetrievalConfig;
    use crate::embeddings::EmbeddingBackend;
    use crate::errors::ProviderError;
    use crate::llm::ChatBackend;
    use crate::llm::ChatMessage;
    use crate::models::Position;
    use crate::models::RankingRecord;
    use crate::retry::RetryPolicy;

    struct ConstEmbedding;

    #[async_trait]
    impl EmbeddingBackend for ConstEmbedding {
        fn provider(&self) -> &'static str {
            "fake"
        }

        fn model(&self) -> &str {
            "fake"
        }

        async fn embed(&self, _text: &str) -> std::result::Result<Vec<f32>, ProviderError> {
            Ok(vec![1.0, 0.0])
        }
    }

    #[derive(Default)]
    struct RecordingChat {
        calls: AtomicUsize,
        last: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl ChatBackend for RecordingChat {
        fn provider(&self) -> &'static str {
            "fake"
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            _params: &GenerationParams,
        ) -> std::result::Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last.lock() {
                *last = messages.to_vec();
            }
            Ok("  Start him.\n".to_string())
        }
    }

    fn record(name: &str, position: Position) -> RankingRecord {
        RankingRecord {
            player_id: name.to_string(),
            player_name: name.to_string(),
            position,
            team: "MIA".to_string(),
            opponent: None,
            ecr_rank: 3,
            pos_rank: None,
            start_sit_grade: None,
            matchups: Vec::new(),
            rookie: false,
            experience: None,
            notes: None,
            college: None,
        }
    }

    fn service(records: Vec<RankingRecord>, chat: Arc<RecordingChat>) -> RagService {
        let vectors = records.iter().map(|_| vec![1.0, 0.0]).collect();
        let index = Arc::new(PlayerIndex::from_parts(2, vectors, records).unwrap());
        let policy = RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_millis(1),
            timeout: Duration::from_secs(1),
        };
        let embeddings = Arc::new(EmbeddingService::with_backend(
            Arc::new(ConstEmbedding),
            2,
            policy,
            0,
        ));
        let retriever = Retriever::new(
            index,
            embeddings,
            RetrievalConfig {
                top_k: 5,
                overfetch_min: 100,
                position_cap: 5,
            },
        );
        let llm = LlmService::with_backend(
            chat,
            GenerationParams {
                model: "gpt-4".to_string(),
                temperature: 0.7,
                max_tokens: 1000,
            },
            policy,
        );
        RagService::from_services(retriever, Arc::new(llm))
    }

    #[tokio::test]
    async fn test_answer_is_returned_verbatim() {
        let chat = Arc::new(RecordingChat::default());
        let rag = service(vec![record("Tyreek Hill", Position::WR)], chat.clone());

        let outcome = rag.ask(RagQuery::new("Is Tyreek Hill a WR1?")).await.unwrap();
        let RagOutcome::Answered(response) = outcome else {
            panic!("expected an answer");
        };

        assert_eq!(response.answer, "  Start him.\n");
        assert_eq!(response.sources.len(), 1);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);

        let last = chat.last.lock().unwrap();
        assert!(last[1].content.contains("Tyreek Hill (WR - MIA) ECR Rank #3"));
        assert!(last[1].content.ends_with("Answer this question: Is Tyreek Hill a WR1?"));
    }

    #[tokio::test]
    async fn test_no_results_skips_generation() {
        let chat = Arc::new(RecordingChat::default());
        let rag = service(vec![record("Tyreek Hill", Position::WR)], chat.clone());

        let query = RagQuery {
            filters: SearchFilters::default().positions([Position::K]),
            ..RagQuery::new("best kickers")
        };
        let outcome = rag.ask(query).await.unwrap();

        assert!(matches!(outcome, RagOutcome::NoRelevantInformation { .. }));
        assert_eq!(outcome.answer(), NO_RELEVANT_INFORMATION);
        assert!(outcome.sources().is_empty());
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extra_context_still_answers_without_results() {
        let chat = Arc::new(RecordingChat::default());
        let rag = service(vec![record("Tyreek Hill", Position::WR)], chat.clone());

        let query = RagQuery {
            filters: SearchFilters::default().positions([Position::K]),
            extra_context: vec!["Your roster and draft positions:\n- Jake Elliott (K - PHI)".to_string()],
            ..RagQuery::new("who to keep")
        };
        let outcome = rag.ask(query).await.unwrap();

        assert!(matches!(outcome, RagOutcome::Answered(_)));
        let last = chat.last.lock().unwrap();
        assert!(last[1].content.contains("Jake Elliott"));
    }
}
