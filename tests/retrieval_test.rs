//! End-to-end retrieval over an index built and loaded from disk

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use ragfant::index::load_artifacts;
use ragfant::index::PlayerIndex;
use ragfant::ingest;
use ragfant::models::Grade;
use ragfant::models::Position;
use ragfant::models::RankingRecord;
use ragfant::rag::RagOutcome;
use ragfant::rag::RagQuery;
use ragfant::rag::RagService;
use ragfant::rag::Retriever;
use ragfant::rag::SearchFilters;
use ragfant::RagfantError;
use tempfile::TempDir;

use common::build_on_disk;
use common::embedding_service;
use common::llm_service;
use common::retrieval_config;
use common::ScriptedChat;

async fn load_retriever(dir: &TempDir, count: usize) -> Retriever {
    let built = build_on_disk(dir.path(), count).await;
    let index = load_artifacts(&built.index_path, &built.metadata_path).unwrap();
    Retriever::new(Arc::new(index), embedding_service(), retrieval_config())
}

fn position_counts(records: &[&RankingRecord]) -> HashMap<Position, usize> {
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(record.position).or_insert(0) += 1;
    }
    counts
}

#[tokio::test]
async fn test_search_returns_min_of_k_and_size() {
    let dir = TempDir::new().unwrap();
    let retriever = load_retriever(&dir, 30).await;
    let filters = SearchFilters::default();

    let few = retriever
        .search("elite playmakers", 7, &filters)
        .await
        .unwrap();
    assert_eq!(few.results.len(), 7);

    let all = retriever
        .search("elite playmakers", 50, &filters)
        .await
        .unwrap();
    assert_eq!(all.results.len(), 30);

    let metadata = retriever.index().metadata();
    for result in &all.results {
        assert!(result.index < metadata.len());
        assert_eq!(metadata.get(result.index), &result.record);
    }
}

#[tokio::test]
async fn test_lineup_query_caps_each_position() {
    let dir = TempDir::new().unwrap();
    let retriever = load_retriever(&dir, 30).await;

    let outcome = retriever
        .search(
            "who should I start in my lineup",
            20,
            &SearchFilters::default(),
        )
        .await
        .unwrap();
    assert!(outcome.intents.is_lineup());
    assert_eq!(outcome.results.len(), 20);

    let records: Vec<&RankingRecord> = outcome.results.iter().map(|r| &r.record).collect();
    for (position, count) in position_counts(&records) {
        assert!(count <= 5, "{position} appears {count} times");
    }

    let grades: Vec<i32> = records.iter().map(|r| r.grade_ordinal()).collect();
    assert!(grades.windows(2).all(|w| w[0] >= w[1]), "{grades:?}");
}

#[tokio::test]
async fn test_top_running_backs_with_position_filter() {
    let dir = TempDir::new().unwrap();
    let retriever = load_retriever(&dir, 30).await;
    let filters = SearchFilters::default().positions([Position::RB]);

    let outcome = retriever
        .search("Who are the top 5 running backs for PPR leagues?", 5, &filters)
        .await
        .unwrap();
    assert!(!outcome.results.is_empty());
    assert!(outcome.results.len() <= 5);
    assert!(outcome
        .results
        .iter()
        .all(|r| r.record.position == Position::RB));
}

#[tokio::test]
async fn test_running_backs_to_start_are_in_rank_order() {
    let dir = TempDir::new().unwrap();
    let retriever = load_retriever(&dir, 30).await;
    let filters = SearchFilters::default().positions([Position::RB]);

    let outcome = retriever
        .search("Who are the top 5 running backs to start?", 5, &filters)
        .await
        .unwrap();
    assert!(outcome.intents.is_lineup());
    assert_eq!(outcome.results.len(), 5);

    let keys: Vec<(i32, u32)> = outcome
        .results
        .iter()
        .map(|r| (r.record.grade_ordinal(), r.record.ecr_rank))
        .collect();
    assert!(
        keys.windows(2)
            .all(|w| w[0].0 > w[1].0 || (w[0].0 == w[1].0 && w[0].1 <= w[1].1)),
        "{keys:?}"
    );

    let mut running_backs: Vec<&RankingRecord> = retriever
        .index()
        .metadata()
        .records()
        .iter()
        .filter(|r| r.position == Position::RB)
        .collect();
    running_backs.sort_by_key(|r| (std::cmp::Reverse(r.grade_ordinal()), r.ecr_rank));
    let expected: Vec<&str> = running_backs
        .iter()
        .take(5)
        .map(|r| r.player_name.as_str())
        .collect();
    let names: Vec<&str> = outcome
        .results
        .iter()
        .map(|r| r.record.player_name.as_str())
        .collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_rookie_query_keeps_only_rookies() {
    let dir = TempDir::new().unwrap();
    let retriever = load_retriever(&dir, 30).await;

    let outcome = retriever
        .search("best rookies to target", 10, &SearchFilters::default())
        .await
        .unwrap();
    assert!(outcome.intents.is_rookie());
    assert_eq!(outcome.results.len(), 5);
    assert!(outcome.results.iter().all(|r| r.record.is_rookie()));
}

#[tokio::test]
async fn test_min_grade_filter() {
    let dir = TempDir::new().unwrap();
    let retriever = load_retriever(&dir, 30).await;
    let filters = SearchFilters::default().min_grade(Grade::B);

    let outcome = retriever
        .search("reliable options", 30, &filters)
        .await
        .unwrap();
    assert!(!outcome.results.is_empty());
    assert!(outcome
        .results
        .iter()
        .all(|r| r.record.grade_ordinal() >= Grade::B.ordinal()));
}

#[tokio::test]
async fn test_empty_query_does_not_fail() {
    let dir = TempDir::new().unwrap();
    let retriever = load_retriever(&dir, 12).await;

    let outcome = retriever
        .search("", 5, &SearchFilters::default())
        .await
        .unwrap();
    assert!(outcome.results.len() <= 5);
}

#[tokio::test]
async fn test_build_then_query_round_trip() {
    let dir = TempDir::new().unwrap();
    let built = build_on_disk(dir.path(), 20).await;
    let index = load_artifacts(&built.index_path, &built.metadata_path).unwrap();
    let retriever = Retriever::new(Arc::new(index), embedding_service(), retrieval_config());

    let embedded = ingest::read_embedded(&built.embedded_path).unwrap();
    let target = &embedded[3];
    let outcome = retriever
        .search_with_vector("round trip", &target.vector, 1, &SearchFilters::default())
        .unwrap();

    assert_eq!(outcome.results.len(), 1);
    let hit = &outcome.results[0];
    assert_eq!(hit.index, 3);
    assert_eq!(hit.record, target.metadata);
    assert!((hit.score - 1.0).abs() < 1e-4, "score {}", hit.score);
}

#[tokio::test]
async fn test_truncated_metadata_is_index_mismatch() {
    let dir = TempDir::new().unwrap();
    let built = build_on_disk(dir.path(), 10).await;

    let mut records: Vec<RankingRecord> =
        serde_json::from_slice(&std::fs::read(&built.metadata_path).unwrap()).unwrap();
    records.pop();
    std::fs::write(&built.metadata_path, serde_json::to_vec(&records).unwrap()).unwrap();

    let err = load_artifacts(&built.index_path, &built.metadata_path).unwrap_err();
    assert!(err.is_fatal());
    match err {
        RagfantError::IndexMismatch {
            vectors, records, ..
        } => {
            assert_eq!(vectors, 10);
            assert_eq!(records, 9);
        }
        other => panic!("expected IndexMismatch, got {other}"),
    }
}

#[tokio::test]
async fn test_missing_artifacts_are_data_not_found() {
    let dir = TempDir::new().unwrap();
    let err = load_artifacts(
        &dir.path().join("fantasy_index.json"),
        &dir.path().join("fantasy_metadata.json"),
    )
    .unwrap_err();
    assert!(matches!(err, RagfantError::DataNotFound { .. }));
    assert!(err.to_string().contains("ragfant index build"));
}

#[tokio::test]
async fn test_ask_over_disk_index() {
    let dir = TempDir::new().unwrap();
    let built = build_on_disk(dir.path(), 30).await;
    let index: PlayerIndex = load_artifacts(&built.index_path, &built.metadata_path).unwrap();
    let chat = Arc::new(ScriptedChat::new("Bijan Robinson is the RB1.\n"));
    let rag = RagService::from_services(
        Retriever::new(Arc::new(index), embedding_service(), retrieval_config()),
        llm_service(chat.clone()),
    );

    let query = RagQuery {
        filters: SearchFilters::default().positions([Position::RB]),
        ..RagQuery::new("Who are the top 5 running backs for PPR leagues?")
    };
    let outcome = rag.ask(query).await.unwrap();

    let RagOutcome::Answered(response) = outcome else {
        panic!("expected an answer");
    };
    assert_eq!(response.answer, "Bijan Robinson is the RB1.\n");
    assert!(response.sources.len() <= 5);
    assert!(response
        .sources
        .iter()
        .all(|s| s.record.position == Position::RB));
    assert_eq!(chat.calls(), 1);

    let prompt = chat.last_user_message();
    assert!(prompt.starts_with("Using this context about fantasy football players:"));
    assert!(prompt.ends_with("Answer this question: Who are the top 5 running backs for PPR leagues?"));
}
