//! Position/grade filters and intent-aware ranking of search candidates

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use super::intent::IntentSet;
use crate::errors::Result;
use crate::models::Grade;
use crate::models::Position;
use crate::models::RankingRecord;

/// Optional constraints on search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Allowed positions; empty means all
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Minimum start/sit grade; records without a grade never pass
    #[serde(default)]
    pub min_grade: Option<Grade>,
}

impl SearchFilters {
    pub fn positions(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.positions = positions.into_iter().collect();
        self
    }

    pub fn min_grade(mut self, grade: Grade) -> Self {
        self.min_grade = Some(grade);
        self
    }

    /// Build from user-supplied strings, unknown positions or grades are `InvalidInput`
    pub fn parse(positions: &[String], min_grade: Option<&str>) -> Result<Self> {
        let positions = positions
            .iter()
            .map(|p| p.parse::<Position>())
            .collect::<Result<Vec<_>>>()?;
        let mut filters = Self::default().positions(positions);
        if let Some(grade) = min_grade {
            filters = filters.min_grade(grade.parse::<Grade>()?);
        }
        Ok(filters)
    }

    pub fn accepts(&self, record: &RankingRecord) -> bool {
        if !self.positions.is_empty() && !self.positions.contains(&record.position) {
            return false;
        }
        match self.min_grade {
            Some(min) => record.grade_ordinal() >= min.ordinal(),
            None => true,
        }
    }
}

/// A metadata record paired with its index position and similarity
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub index: usize,
    pub score: f32,
    pub record: &'a RankingRecord,
}

/// Keep only rookies. Applying it twice gives the same result.
pub fn filter_rookies<'a>(candidates: Vec<Candidate<'a>>) -> Vec<Candidate<'a>> {
    candidates
        .into_iter()
        .filter(|c| c.record.is_rookie())
        .collect()
}

/// Order and truncate filtered candidates.
///
/// Rookie intent drops non-rookies first. Lineup intent re-sorts by grade
/// (best first) then ECR rank (lowest first) and allows at most
/// `position_cap` results per position; otherwise similarity order is kept.
pub fn rank_candidates<'a>(
    candidates: Vec<Candidate<'a>>,
    intents: &IntentSet,
    top_k: usize,
    position_cap: usize,
) -> Vec<Candidate<'a>> {
    let mut candidates = if intents.is_rookie() {
        filter_rookies(candidates)
    } else {
        candidates
    };

    let lineup = intents.is_lineup();
    if lineup {
        candidates.sort_by(|a, b| {
            b.record
                .grade_ordinal()
                .cmp(&a.record.grade_ordinal())
                .then_with(|| a.record.ecr_rank.cmp(&b.record.ecr_rank))
        });
    }

    let mut per_position: HashMap<Position, usize> = HashMap::new();
    let mut results = Vec::with_capacity(top_k.min(candidates.len()));
    for candidate in candidates {
        if results.len() >= top_k {
            break;
        }
        let count = per_position.entry(candidate.record.position).or_insert(0);
        if lineup && *count >= position_cap {
            continue;
        }
        *count += 1;
        results.push(candidate);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::intent::IntentClassifier;

    fn record(id: usize, position: Position, grade: Option<Grade>, ecr: u32) -> RankingRecord {
        RankingRecord {
            player_id: id.to_string(),
            player_name: format!("Player {id}"),
            position,
            team: "DET".to_string(),
            opponent: None,
            ecr_rank: ecr,
            pos_rank: None,
            start_sit_grade: grade,
            matchups: Vec::new(),
            rookie: false,
            experience: None,
            notes: None,
            college: None,
        }
    }

    fn candidates(records: &[RankingRecord]) -> Vec<Candidate<'_>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| Candidate {
                index,
                score: 1.0 - index as f32 * 0.01,
                record,
            })
            .collect()
    }

    fn intents(q: &str) -> IntentSet {
        IntentClassifier::default().classify(q)
    }

    #[test]
    fn test_position_filter() {
        let filters = SearchFilters::default().positions([Position::RB, Position::WR]);
        assert!(filters.accepts(&record(1, Position::RB, None, 1)));
        assert!(!filters.accepts(&record(1, Position::QB, None, 1)));
        assert!(SearchFilters::default().accepts(&record(1, Position::K, None, 1)));
    }

    #[test]
    fn test_min_grade_excludes_missing_grade() {
        let filters = SearchFilters::default().min_grade(Grade::F);
        assert!(!filters.accepts(&record(1, Position::QB, None, 1)));
        assert!(filters.accepts(&record(1, Position::QB, Some(Grade::F), 1)));

        let filters = SearchFilters::default().min_grade(Grade::B);
        assert!(filters.accepts(&record(1, Position::QB, Some(Grade::B), 1)));
        assert!(filters.accepts(&record(1, Position::QB, Some(Grade::APlus), 1)));
        assert!(!filters.accepts(&record(1, Position::QB, Some(Grade::BMinus), 1)));
    }

    #[test]
    fn test_general_query_keeps_similarity_order() {
        let records = vec![
            record(0, Position::RB, Some(Grade::C), 40),
            record(1, Position::RB, Some(Grade::A), 2),
            record(2, Position::WR, None, 10),
        ];
        let ranked = rank_candidates(candidates(&records), &intents("tell me about"), 10, 5);
        let order: Vec<usize> = ranked.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_lineup_sorts_by_grade_then_rank() {
        let records = vec![
            record(0, Position::RB, Some(Grade::C), 40),
            record(1, Position::RB, Some(Grade::A), 9),
            record(2, Position::WR, Some(Grade::A), 3),
            record(3, Position::TE, None, 1),
        ];
        let ranked = rank_candidates(candidates(&records), &intents("who to start"), 10, 5);
        let order: Vec<usize> = ranked.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_lineup_caps_each_position() {
        let records: Vec<RankingRecord> = (0..12)
            .map(|i| record(i, Position::RB, Some(Grade::B), i as u32 + 1))
            .chain((12..14).map(|i| record(i, Position::QB, Some(Grade::C), i as u32 + 1)))
            .collect();

        let ranked = rank_candidates(candidates(&records), &intents("lineup help"), 10, 5);
        let rbs = ranked.iter().filter(|c| c.record.position == Position::RB).count();
        assert_eq!(rbs, 5);
        assert_eq!(ranked.len(), 7);
    }

    #[test]
    fn test_cap_does_not_apply_without_lineup_intent() {
        let records: Vec<RankingRecord> = (0..8)
            .map(|i| record(i, Position::WR, None, i as u32 + 1))
            .collect();
        let ranked = rank_candidates(candidates(&records), &intents("best receivers"), 8, 5);
        assert_eq!(ranked.len(), 8);
    }

    #[test]
    fn test_rookie_filter_is_idempotent() {
        let mut records: Vec<RankingRecord> = (0..6)
            .map(|i| record(i, Position::WR, None, i as u32 + 1))
            .collect();
        records[1].rookie = true;
        records[3].notes = Some("Round 1 (R)".to_string());
        records[4].experience = Some("Rookie".to_string());

        let once = filter_rookies(candidates(&records));
        let once_ids: Vec<usize> = once.iter().map(|c| c.index).collect();
        let twice: Vec<usize> = filter_rookies(once).iter().map(|c| c.index).collect();

        assert_eq!(once_ids, vec![1, 3, 4]);
        assert_eq!(once_ids, twice);
    }

    #[test]
    fn test_rookie_intent_applies_before_truncation() {
        let mut records: Vec<RankingRecord> = (0..10)
            .map(|i| record(i, Position::WR, None, i as u32 + 1))
            .collect();
        records[8].rookie = true;
        records[9].rookie = true;

        let ranked = rank_candidates(candidates(&records), &intents("top rookies"), 2, 5);
        let order: Vec<usize> = ranked.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![8, 9]);
    }

    #[test]
    fn test_top_k_zero() {
        let records = vec![record(0, Position::QB, None, 1)];
        assert!(rank_candidates(candidates(&records), &IntentSet::default(), 0, 5).is_empty());
    }

    #[test]
    fn test_parse_filters() {
        let filters =
            SearchFilters::parse(&["rb".to_string(), "DEF".to_string()], Some("B+")).unwrap();
        assert_eq!(filters.positions, vec![Position::RB, Position::DST]);
        assert_eq!(filters.min_grade, Some(Grade::BPlus));

        assert!(SearchFilters::parse(&["LB".to_string()], None).is_err());
        assert!(SearchFilters::parse(&[], Some("Z")).is_err());
    }
}
