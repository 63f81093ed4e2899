//! Context assembly from retrieved player records

use std::fmt::Write;

use crate::models::RankingRecord;
use crate::rag::SearchResult;

/// Upcoming games listed per player
pub const MAX_MATCHUPS: usize = 5;

/// Render one record as a context block
pub fn format_record(record: &RankingRecord) -> String {
    let mut block = format!(
        "{} ({} - {}) ECR Rank #{}, Start/Sit Grade: {}, Position Rank: {}",
        record.player_name,
        record.position,
        record.team,
        record.ecr_rank,
        record
            .start_sit_grade
            .map_or_else(|| "N/A".to_string(), |g| g.to_string()),
        record.pos_rank.as_deref().unwrap_or("N/A"),
    );

    if !record.matchups.is_empty() {
        block.push_str("\nUpcoming matchups:");
        for matchup in record.matchups.iter().take(MAX_MATCHUPS) {
            let _ = write!(
                block,
                "\nWeek {}: vs {} (Def Rank: {}, Matchup Rating: {} ({}))",
                matchup.week,
                matchup.opponent,
                matchup.defense_rank,
                matchup.matchup_rating,
                matchup.rating_class()
            );
        }
    }

    block
}

/// Search listing line: the context block with its similarity score
pub fn format_result(result: &SearchResult) -> String {
    format!("{} (Score: {:.3})", format_record(&result.record), result.score)
}

/// Assembler for creating the prompt context
pub struct ContextAssembler {
    max_context_length: usize,
}

impl ContextAssembler {
    #[must_use]
    pub const fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    /// Join record blocks and any extra blocks with blank lines.
    ///
    /// Extra blocks are always kept, after the records. Their length is
    /// reserved up front and records fill the remaining budget in order; the
    /// first record is always kept.
    #[must_use]
    pub fn assemble(&self, results: &[SearchResult], extra: &[String]) -> String {
        let reserved: usize = extra.iter().map(|block| block.len() + 2).sum();
        let budget = self.max_context_length.saturating_sub(reserved);

        let mut context = String::new();
        for block in results.iter().map(|r| format_record(&r.record)) {
            if !context.is_empty() && context.len() + 2 + block.len() > budget {
                break;
            }
            push_block(&mut context, &block);
        }
        for block in extra {
            push_block(&mut context, block);
        }
        context
    }
}

fn push_block(context: &mut String, block: &str) {
    if !context.is_empty() {
        context.push_str("\n\n");
    }
    context.push_str(block);
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(24_000)
    }
}
