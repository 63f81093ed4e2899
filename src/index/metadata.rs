//! Records aligned position-by-position with the vector index

use std::collections::BTreeMap;

use crate::models::Position;
use crate::models::RankingRecord;

/// Read-only metadata, record `i` describes vector `i`
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    records: Vec<RankingRecord>,
}

impl MetadataStore {
    pub fn new(records: Vec<RankingRecord>) -> Self {
        Self { records }
    }

    /// Record at `index`.
    ///
    /// # Panics
    /// When `index` is out of range, which means the index and metadata
    /// have drifted apart.
    pub fn get(&self, index: usize) -> &RankingRecord {
        match self.records.get(index) {
            Some(record) => record,
            None => panic!(
                "metadata index {index} out of range ({} records): index and metadata are desynchronized",
                self.records.len()
            ),
        }
    }

    pub fn try_get(&self, index: usize) -> Option<&RankingRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RankingRecord] {
        &self.records
    }

    /// Number of records per position
    pub fn position_counts(&self) -> BTreeMap<Position, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.position).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, position: Position) -> RankingRecord {
        RankingRecord {
            player_id: id.to_string(),
            player_name: format!("Player {id}"),
            position,
            team: "KC".to_string(),
            opponent: None,
            ecr_rank: 1,
            pos_rank: None,
            start_sit_grade: None,
            matchups: Vec::new(),
            rookie: false,
            experience: None,
            notes: None,
            college: None,
        }
    }

    #[test]
    fn test_get_and_counts() {
        let store = MetadataStore::new(vec![
            record("1", Position::QB),
            record("2", Position::RB),
            record("3", Position::RB),
        ]);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(1).player_id, "2");
        assert!(store.try_get(3).is_none());

        let counts = store.position_counts();
        assert_eq!(counts.get(&Position::RB), Some(&2));
        assert_eq!(counts.get(&Position::QB), Some(&1));
        assert_eq!(counts.get(&Position::K), None);
    }

    #[test]
    #[should_panic(expected = "desynchronized")]
    fn test_get_out_of_range_panics() {
        let store = MetadataStore::new(vec![record("1", Position::QB)]);
        let _ = store.get(5);
    }
}
