//! On-disk artifacts: the vector index file and its aligned metadata file.
//!
//! Both files are produced by a single [`save_artifacts`] call. The index file
//! records the number of vectors and the SHA-256 of the metadata bytes, so a
//! pair written by different builds (or truncated by hand) is refused on load
//! instead of silently pairing vectors with the wrong players.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use tracing::info;

use crate::errors::RagfantError;
use crate::index::FlatIndex;
use crate::index::MetadataStore;
use crate::index::PlayerIndex;
use crate::models::RankingRecord;
use crate::Result;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    format_version: u32,
    dimension: usize,
    count: usize,
    metadata_sha256: String,
    vectors: Vec<Vec<f32>>,
}

fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Write both artifacts. Each file is written to a temporary sibling and
/// renamed into place once both are complete.
pub fn save_artifacts(index: &PlayerIndex, index_path: &Path, metadata_path: &Path) -> Result<()> {
    let metadata_bytes = serde_json::to_vec(index.metadata().records())?;
    let index_file = IndexFile {
        format_version: FORMAT_VERSION,
        dimension: index.vectors().dimension(),
        count: index.len(),
        metadata_sha256: digest(&metadata_bytes),
        vectors: index.vectors().rows().map(<[f32]>::to_vec).collect(),
    };
    let index_bytes = serde_json::to_vec(&index_file)?;

    let metadata_tmp = write_temp_sibling(metadata_path, &metadata_bytes)?;
    let index_tmp = write_temp_sibling(index_path, &index_bytes)?;

    metadata_tmp
        .persist(metadata_path)
        .map_err(|e| RagfantError::Io(e.error))?;
    index_tmp
        .persist(index_path)
        .map_err(|e| RagfantError::Io(e.error))?;

    info!(
        "Saved {} vectors (dim {}) to {} and metadata to {}",
        index_file.count,
        index_file.dimension,
        index_path.display(),
        metadata_path.display()
    );
    Ok(())
}

fn write_temp_sibling(target: &Path, bytes: &[u8]) -> Result<tempfile::NamedTempFile> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}

/// Load and cross-check both artifacts.
///
/// Missing files yield [`RagfantError::DataNotFound`]; any disagreement in
/// length or content digest yields [`RagfantError::IndexMismatch`].
pub fn load_artifacts(index_path: &Path, metadata_path: &Path) -> Result<PlayerIndex> {
    for path in [index_path, metadata_path] {
        if !path.exists() {
            return Err(RagfantError::data_not_found(path));
        }
    }

    let metadata_bytes = fs::read(metadata_path)?;
    let records: Vec<RankingRecord> = serde_json::from_slice(&metadata_bytes)?;
    let index_file: IndexFile = serde_json::from_slice(&fs::read(index_path)?)?;

    if index_file.format_version != FORMAT_VERSION {
        return Err(RagfantError::InvalidInput(format!(
            "unsupported index format version {} (expected {FORMAT_VERSION})",
            index_file.format_version
        )));
    }

    if index_file.vectors.len() != index_file.count || records.len() != index_file.count {
        return Err(RagfantError::IndexMismatch {
            vectors: index_file.vectors.len(),
            records: records.len(),
            detail: format!("index header declares {} entries", index_file.count),
        });
    }

    if digest(&metadata_bytes) != index_file.metadata_sha256 {
        return Err(RagfantError::IndexMismatch {
            vectors: index_file.vectors.len(),
            records: records.len(),
            detail: "metadata content differs from the build that produced the index".to_string(),
        });
    }

    let vectors = FlatIndex::build(index_file.dimension, index_file.vectors)?;
    let index = PlayerIndex::new(vectors, MetadataStore::new(records))?;

    info!(
        "Loaded {} player records (dim {}) from {}",
        index.len(),
        index.vectors().dimension(),
        index_path.display()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn record(id: usize) -> RankingRecord {
        RankingRecord {
            player_id: id.to_string(),
            player_name: format!("Player {id}"),
            position: Position::ALL[id % Position::ALL.len()],
            team: "BUF".to_string(),
            opponent: None,
            ecr_rank: id as u32 + 1,
            pos_rank: None,
            start_sit_grade: None,
            matchups: Vec::new(),
            rookie: false,
            experience: None,
            notes: None,
            college: None,
        }
    }

    fn build(n: usize) -> PlayerIndex {
        let vectors = (0..n)
            .map(|i| vec![i as f32 + 1.0, 1.0, (i % 3) as f32])
            .collect();
        let records = (0..n).map(record).collect();
        PlayerIndex::from_parts(3, vectors, records).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("idx.json");
        let metadata_path = dir.path().join("meta.json");

        save_artifacts(&build(10), &index_path, &metadata_path).unwrap();
        let loaded = load_artifacts(&index_path, &metadata_path).unwrap();

        assert_eq!(loaded.len(), 10);
        assert_eq!(loaded.vectors().dimension(), 3);
        assert_eq!(loaded.metadata().get(4).player_id, "4");
    }

    #[test]
    fn test_missing_files_are_data_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_artifacts(&dir.path().join("a.json"), &dir.path().join("b.json"))
            .unwrap_err();
        assert!(matches!(err, RagfantError::DataNotFound { .. }));
    }

    #[test]
    fn test_truncated_metadata_is_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("idx.json");
        let metadata_path = dir.path().join("meta.json");
        save_artifacts(&build(10), &index_path, &metadata_path).unwrap();

        let nine: Vec<RankingRecord> = (0..9).map(record).collect();
        fs::write(&metadata_path, serde_json::to_vec(&nine).unwrap()).unwrap();

        match load_artifacts(&index_path, &metadata_path) {
            Err(RagfantError::IndexMismatch { vectors, records, .. }) => {
                assert_eq!(vectors, 10);
                assert_eq!(records, 9);
            }
            other => panic!("expected IndexMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_reordered_metadata_is_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("idx.json");
        let metadata_path = dir.path().join("meta.json");
        save_artifacts(&build(4), &index_path, &metadata_path).unwrap();

        let mut shuffled: Vec<RankingRecord> = (0..4).map(record).collect();
        shuffled.swap(0, 3);
        fs::write(&metadata_path, serde_json::to_vec(&shuffled).unwrap()).unwrap();

        let err = load_artifacts(&index_path, &metadata_path).unwrap_err();
        assert!(err.is_fatal());
    }
}
