//! Ingestion: raw rankings -> embedded records -> index artifacts
//!
//! `index embed` reads a rankings JSON export, renders one descriptive
//! sentence per player-week, embeds the sentences and writes
//! `[{text, vector, metadata}]`. `index build` turns that file into the two
//! aligned artifacts in one step.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use tracing::info;
use tracing::warn;

use crate::embeddings::EmbeddingService;
use crate::errors::RagfantError;
use crate::index::save_artifacts;
use crate::index::PlayerIndex;
use crate::models::Grade;
use crate::models::MatchupEntry;
use crate::models::Position;
use crate::models::RankingRecord;
use crate::Result;

/// One entry of a rankings export. Field names follow the FantasyPros
/// export, with the normalized names accepted as aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRanking {
    #[serde(deserialize_with = "string_or_number")]
    pub player_id: String,
    pub player_name: String,
    #[serde(alias = "position")]
    pub player_positions: String,
    #[serde(alias = "team")]
    pub player_team_id: String,
    #[serde(default, alias = "opponent")]
    pub player_opponent: Option<String>,
    #[serde(alias = "ecr_rank", deserialize_with = "rank_value")]
    pub rank_ecr: u32,
    #[serde(default)]
    pub start_sit_grade: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub pos_rank: Option<String>,
    #[serde(default)]
    pub player_owned_avg: Option<f64>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub rank_min: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub rank_max: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub rank_ave: Option<String>,
    #[serde(default, alias = "notes")]
    pub note: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub rookie: bool,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default, alias = "college")]
    pub player_college: Option<String>,
    #[serde(default)]
    pub matchups: Vec<MatchupEntry>,
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

impl RawRanking {
    /// Sentence embedded for this player-week
    pub fn embedding_text(&self) -> String {
        format!(
            "{} ({} - {}) is ranked #{} against {}. Start/sit grade: {}. Ownership: {}%. Rank range: {} to {} (avg: {}). {} {}",
            self.player_name,
            self.player_positions,
            self.player_team_id,
            self.rank_ecr,
            or_na(self.player_opponent.as_deref()),
            or_na(self.start_sit_grade.as_deref()),
            or_na(self.player_owned_avg),
            or_na(self.rank_min.as_deref()),
            or_na(self.rank_max.as_deref()),
            or_na(self.rank_ave.as_deref()),
            self.note.as_deref().unwrap_or_default(),
            self.recommendation.as_deref().unwrap_or_default(),
        )
        .trim()
        .to_string()
    }

    /// Normalize into a stored record. Unknown grades are dropped, an unknown
    /// position is an error.
    pub fn to_record(&self) -> Result<RankingRecord> {
        let position: Position = self.player_positions.parse()?;
        let start_sit_grade = match self.start_sit_grade.as_deref() {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Grade>() {
                Ok(grade) => Some(grade),
                Err(_) => {
                    warn!("Ignoring unknown grade {:?} for {}", raw, self.player_name);
                    None
                }
            },
        };

        Ok(RankingRecord {
            player_id: self.player_id.clone(),
            player_name: self.player_name.clone(),
            position,
            team: self.player_team_id.clone(),
            opponent: self.player_opponent.clone(),
            ecr_rank: self.rank_ecr,
            pos_rank: self.pos_rank.clone(),
            start_sit_grade,
            matchups: self.matchups.clone(),
            rookie: self.rookie,
            experience: self.experience.clone(),
            notes: self.note.clone(),
            college: self.player_college.clone(),
        })
    }
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    value_to_string(value).ok_or_else(|| serde::de::Error::custom("expected a string or number"))
}

fn optional_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_string(value))
}

fn rank_value<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let rank = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match rank {
        Some(r) if r.is_finite() && r >= 0.0 => Ok(r.round() as u32),
        _ => Err(serde::de::Error::custom(format!("invalid rank {value}"))),
    }
}

/// A record together with the text that was embedded and its vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedRecord {
    pub text: String,
    pub vector: Vec<f32>,
    pub metadata: RankingRecord,
}

/// Result of an index build
#[derive(Debug, Clone, Serialize)]
pub struct BuildStats {
    pub records: usize,
    pub dimension: usize,
}

pub fn read_rankings(path: &Path) -> Result<Vec<RawRanking>> {
    if !path.exists() {
        return Err(RagfantError::DataNotFound {
            path: path.to_path_buf(),
            hint: "rankings export not found".to_string(),
        });
    }
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

/// Convert and embed rankings. Entries that cannot be normalized are skipped.
pub async fn embed_rankings(
    service: &EmbeddingService,
    rankings: &[RawRanking],
) -> Result<Vec<EmbeddedRecord>> {
    let mut texts = Vec::with_capacity(rankings.len());
    let mut records = Vec::with_capacity(rankings.len());
    for raw in rankings {
        match raw.to_record() {
            Ok(record) => {
                texts.push(raw.embedding_text());
                records.push(record);
            }
            Err(e) => warn!("Skipping {}: {}", raw.player_name, e),
        }
    }

    info!("Embedding {} of {} rankings", texts.len(), rankings.len());
    let vectors = service.generate_batch(&texts).await?;

    Ok(texts
        .into_iter()
        .zip(vectors)
        .zip(records)
        .map(|((text, vector), metadata)| EmbeddedRecord {
            text,
            vector,
            metadata,
        })
        .collect())
}

pub fn write_embedded(path: &Path, records: &[EmbeddedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(records)?)?;
    info!("Saved {} vectors to {}", records.len(), path.display());
    Ok(())
}

pub fn read_embedded(path: &Path) -> Result<Vec<EmbeddedRecord>> {
    if !path.exists() {
        return Err(RagfantError::DataNotFound {
            path: path.to_path_buf(),
            hint: "embedded records not found, run `ragfant index embed` first".to_string(),
        });
    }
    Ok(serde_json::from_slice(&fs::read(path)?)?)
}

/// Build the in-memory index; every vector must share the first one's dimension
pub fn build_index(records: Vec<EmbeddedRecord>) -> Result<PlayerIndex> {
    let dimension = records
        .first()
        .map(|r| r.vector.len())
        .ok_or_else(|| RagfantError::InvalidInput("no embedded records to index".to_string()))?;

    let (vectors, metadata): (Vec<_>, Vec<_>) =
        records.into_iter().map(|r| (r.vector, r.metadata)).unzip();
    PlayerIndex::from_parts(dimension, vectors, metadata)
}

/// Read embedded records and write both index artifacts
pub fn build_artifacts(
    embedded_path: &Path,
    index_path: &Path,
    metadata_path: &Path,
) -> Result<BuildStats> {
    let index = build_index(read_embedded(embedded_path)?)?;
    save_artifacts(&index, index_path, metadata_path)?;
    Ok(BuildStats {
        records: index.len(),
        dimension: index.vectors().dimension(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"[
        {
            "player_id": 4866,
            "player_name": "Saquon Barkley",
            "player_positions": "RB",
            "player_team_id": "PHI",
            "player_opponent": "DAL",
            "rank_ecr": 2,
            "start_sit_grade": "A+",
            "pos_rank": "RB1",
            "player_owned_avg": 99.5,
            "rank_min": 1,
            "rank_max": 4,
            "rank_ave": "1.8",
            "note": "Workhorse.",
            "recommendation": "Start."
        },
        {
            "player_id": "9999",
            "player_name": "Ashton Jeanty",
            "position": "RB",
            "team": "LV",
            "ecr_rank": "14",
            "notes": "2025 Draft first round"
        },
        {
            "player_id": "1",
            "player_name": "Linebacker Person",
            "player_positions": "LB",
            "player_team_id": "NYJ",
            "rank_ecr": 300
        }
    ]"#;

    fn rankings() -> Vec<RawRanking> {
        serde_json::from_str(EXPORT).unwrap()
    }

    #[test]
    fn test_embedding_text() {
        let raw = &rankings()[0];
        assert_eq!(
            raw.embedding_text(),
            "Saquon Barkley (RB - PHI) is ranked #2 against DAL. Start/sit grade: A+. \
             Ownership: 99.5%. Rank range: 1 to 4 (avg: 1.8). Workhorse. Start."
        );
    }

    #[test]
    fn test_embedding_text_missing_fields() {
        let raw = &rankings()[1];
        assert_eq!(
            raw.embedding_text(),
            "Ashton Jeanty (RB - LV) is ranked #14 against N/A. Start/sit grade: N/A. \
             Ownership: N/A%. Rank range: N/A to N/A (avg: N/A). 2025 Draft first round"
        );
    }

    #[test]
    fn test_aliases_and_numeric_ids() {
        let raws = rankings();
        assert_eq!(raws[0].player_id, "4866");
        assert_eq!(raws[1].player_team_id, "LV");
        assert_eq!(raws[1].rank_ecr, 14);

        let record = raws[1].to_record().unwrap();
        assert_eq!(record.position, Position::RB);
        assert!(record.is_rookie());
        assert_eq!(record.start_sit_grade, None);
    }

    #[test]
    fn test_unknown_position_rejected() {
        assert!(rankings()[2].to_record().is_err());
    }

    #[test]
    fn test_build_index_and_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let embedded_path = dir.path().join("vectors.json");
        let records: Vec<EmbeddedRecord> = rankings()
            .iter()
            .take(2)
            .enumerate()
            .map(|(i, raw)| EmbeddedRecord {
                text: raw.embedding_text(),
                vector: vec![i as f32, 1.0, 0.5],
                metadata: raw.to_record().unwrap(),
            })
            .collect();
        write_embedded(&embedded_path, &records).unwrap();

        let stats = build_artifacts(
            &embedded_path,
            &dir.path().join("idx.json"),
            &dir.path().join("meta.json"),
        )
        .unwrap();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.dimension, 3);
    }

    #[test]
    fn test_build_index_rejects_empty_and_ragged() {
        assert!(matches!(
            build_index(Vec::new()),
            Err(RagfantError::InvalidInput(_))
        ));

        let record = rankings()[0].to_record().unwrap();
        let ragged = vec![
            EmbeddedRecord {
                text: String::new(),
                vector: vec![1.0, 0.0],
                metadata: record.clone(),
            },
            EmbeddedRecord {
                text: String::new(),
                vector: vec![1.0],
                metadata: record,
            },
        ];
        assert!(matches!(
            build_index(ragged),
            Err(RagfantError::DimensionMismatch { .. })
        ));
    }
}
