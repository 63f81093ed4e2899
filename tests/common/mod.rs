#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ragfant::config::RetrievalConfig;
use ragfant::embeddings::EmbeddingBackend;
use ragfant::embeddings::EmbeddingService;
use ragfant::errors::ProviderError;
use ragfant::ingest;
use ragfant::llm::ChatBackend;
use ragfant::llm::ChatMessage;
use ragfant::llm::GenerationParams;
use ragfant::llm::LlmService;
use ragfant::retry::RetryPolicy;
use serde_json::json;

pub const DIMENSION: usize = 32;

/// Bag-of-words embedding: each lowercase word bumps one hashed bucket.
/// Identical texts get identical vectors.
pub struct HashingEmbedding;

pub fn hash_embed(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; DIMENSION];
    for word in text.split_whitespace() {
        let bucket = word
            .to_lowercase()
            .bytes()
            .fold(7usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        vector[bucket % DIMENSION] += 1.0;
    }
    vector
}

#[async_trait]
impl EmbeddingBackend for HashingEmbedding {
    fn provider(&self) -> &'static str {
        "hashing"
    }

    fn model(&self) -> &str {
        "hashing-32"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(hash_embed(text))
    }
}

/// Chat backend that returns a fixed answer and remembers the last prompt
pub struct ScriptedChat {
    pub answer: String,
    pub calls: AtomicUsize,
    pub last_messages: Mutex<Vec<ChatMessage>>,
}

impl ScriptedChat {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_user_message(&self) -> String {
        self.last_messages
            .lock()
            .unwrap()
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatBackend for ScriptedChat {
    fn provider(&self) -> &'static str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        Ok(self.answer.clone())
    }
}

pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 1,
        base_delay: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
    }
}

pub fn embedding_service() -> Arc<EmbeddingService> {
    Arc::new(EmbeddingService::with_backend(
        Arc::new(HashingEmbedding),
        DIMENSION,
        fast_policy(),
        64,
    ))
}

pub fn llm_service(chat: Arc<ScriptedChat>) -> Arc<LlmService> {
    Arc::new(LlmService::with_backend(
        chat,
        GenerationParams {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        },
        fast_policy(),
    ))
}

pub fn retrieval_config() -> RetrievalConfig {
    RetrievalConfig {
        top_k: 5,
        overfetch_min: 100,
        position_cap: 5,
    }
}

const GRADES: [&str; 6] = ["A+", "A", "B+", "B", "C", "D"];

const PLAYERS: [(&str, &str, &str); 30] = [
    ("Christian McCaffrey", "RB", "SF"),
    ("Bijan Robinson", "RB", "ATL"),
    ("Saquon Barkley", "RB", "PHI"),
    ("Jahmyr Gibbs", "RB", "DET"),
    ("Breece Hall", "RB", "NYJ"),
    ("Derrick Henry", "RB", "BAL"),
    ("Kyren Williams", "RB", "LAR"),
    ("Josh Jacobs", "RB", "GB"),
    ("Ashton Jeanty", "RB", "LV"),
    ("Omarion Hampton", "RB", "LAC"),
    ("Ja'Marr Chase", "WR", "CIN"),
    ("Justin Jefferson", "WR", "MIN"),
    ("CeeDee Lamb", "WR", "DAL"),
    ("Amon-Ra St. Brown", "WR", "DET"),
    ("Puka Nacua", "WR", "LAR"),
    ("Malik Nabers", "WR", "NYG"),
    ("Nico Collins", "WR", "HOU"),
    ("Tetairoa McMillan", "WR", "CAR"),
    ("Josh Allen", "QB", "BUF"),
    ("Lamar Jackson", "QB", "BAL"),
    ("Jalen Hurts", "QB", "PHI"),
    ("Joe Burrow", "QB", "CIN"),
    ("Jayden Daniels", "QB", "WAS"),
    ("Cam Ward", "QB", "TEN"),
    ("Brock Bowers", "TE", "LV"),
    ("Trey McBride", "TE", "ARI"),
    ("George Kittle", "TE", "SF"),
    ("Sam LaPorta", "TE", "DET"),
    ("Travis Kelce", "TE", "KC"),
    ("Tyler Warren", "TE", "IND"),
];

const ROOKIES: [&str; 5] = [
    "Ashton Jeanty",
    "Omarion Hampton",
    "Tetairoa McMillan",
    "Cam Ward",
    "Tyler Warren",
];

/// A rankings export in the FantasyPros shape, `count` entries long
pub fn rankings_json(count: usize) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = PLAYERS
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, (name, position, team))| {
            let rookie = ROOKIES.contains(name);
            json!({
                "player_id": 1000 + i,
                "player_name": name,
                "player_positions": position,
                "player_team_id": team,
                "player_opponent": "BYE",
                "rank_ecr": i + 1,
                "start_sit_grade": GRADES[i % GRADES.len()],
                "pos_rank": format!("{position}{}", i + 1),
                "player_owned_avg": 90.5,
                "rank_min": i + 1,
                "rank_max": i + 6,
                "rank_ave": format!("{}.5", i + 2),
                "note": if rookie { "(R) first NFL season" } else { "Veteran workhorse" },
                "rookie": rookie,
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

pub struct BuiltIndex {
    pub embedded_path: PathBuf,
    pub index_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Run the full ingestion pipeline for `count` players into `dir`
pub async fn build_on_disk(dir: &Path, count: usize) -> BuiltIndex {
    let rankings_path = dir.join("rankings.json");
    std::fs::write(
        &rankings_path,
        serde_json::to_vec(&rankings_json(count)).unwrap(),
    )
    .unwrap();

    let rankings = ingest::read_rankings(&rankings_path).unwrap();
    let embedded = ingest::embed_rankings(&embedding_service(), &rankings)
        .await
        .unwrap();
    let embedded_path = dir.join("embedded.json");
    ingest::write_embedded(&embedded_path, &embedded).unwrap();

    let index_path = dir.join("data").join("fantasy_index.json");
    let metadata_path = dir.join("data").join("fantasy_metadata.json");
    let stats = ingest::build_artifacts(&embedded_path, &index_path, &metadata_path).unwrap();
    assert_eq!(stats.records, count);
    assert_eq!(stats.dimension, DIMENSION);

    BuiltIndex {
        embedded_path,
        index_path,
        metadata_path,
    }
}
