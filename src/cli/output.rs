//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `ragfant` CLI

use crate::rag::SearchResult;
use crate::sleeper::models::KeeperOption;
use crate::sleeper::models::RosterPlayer;
use crate::sleeper::models::StandingRow;
use crate::sleeper::models::TrendingEntry;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// This prevents panics when truncating strings with multi-byte UTF-8 characters (emojis, etc.)
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_chars` - Maximum number of characters (not bytes)
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

pub fn print_separator() {
    println!("{}", "═".repeat(60));
}

/// Print ranked search results, one line per player
pub fn print_search_results(results: &[SearchResult]) {
    println!("Found {} players:", results.len());
    for (idx, result) in results.iter().enumerate() {
        let record = &result.record;
        println!(
            "  {:>2}. {} ({} - {}) ECR #{} | Grade: {} | Score: {:.3}",
            idx + 1,
            record.player_name,
            record.position,
            record.team,
            record.ecr_rank,
            record.start_sit_grade.map_or("N/A", |g| g.as_str()),
            result.score
        );
        if let Some(notes) = record.notes.as_deref().filter(|n| !n.is_empty()) {
            println!("      {}", truncate_str(notes, 100));
        }
    }
}

pub fn print_roster(players: &[RosterPlayer]) {
    println!("Roster ({} players):", players.len());
    for player in players {
        let drafted = player.draft_info.map_or_else(
            || "Undrafted".to_string(),
            |d| format!("Round {}, Pick {}", d.round, d.pick),
        );
        let injury = player
            .injury_status
            .as_deref()
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        println!(
            "  - {} ({} - {}) {}{}",
            player.full_name.as_deref().unwrap_or("Unknown"),
            player.position.as_deref().unwrap_or("?"),
            player.team.as_deref().unwrap_or("FA"),
            drafted,
            injury
        );
    }
}

pub fn print_keepers(options: &[KeeperOption]) {
    if options.is_empty() {
        print_warning("No drafted players on this roster");
        return;
    }
    println!(
        "  {:<4} {:<28} {:<5} {:>8} {:>8} {:>7}",
        "#", "Player", "Pos", "Drafted", "Keeper", "Value"
    );
    for (idx, option) in options.iter().enumerate() {
        println!(
            "  {:<4} {:<28} {:<5} {:>8} {:>8} {:>7.3}",
            idx + 1,
            truncate_str(option.player.full_name.as_deref().unwrap_or("Unknown"), 25),
            option.player.position.as_deref().unwrap_or("?"),
            format!("R{}", option.original_round),
            format!("R{}", option.keeper_round),
            option.value_score
        );
    }
}

pub fn print_standings(rows: &[StandingRow]) {
    println!(
        "  {:<4} {:<28} {:>4} {:>4} {:>9} {:>9}",
        "#", "Team", "W", "L", "PF", "PA"
    );
    for (idx, row) in rows.iter().enumerate() {
        let name = row
            .team_name
            .as_deref()
            .or(row.username.as_deref())
            .unwrap_or("Unowned");
        println!(
            "  {:<4} {:<28} {:>4} {:>4} {:>9.2} {:>9.2}",
            idx + 1,
            truncate_str(name, 25),
            row.wins,
            row.losses,
            row.points_for,
            row.points_against
        );
    }
}

pub fn print_trending(title: &str, entries: &[TrendingEntry]) {
    println!("{title}:");
    for entry in entries {
        println!(
            "  - {} ({})",
            entry.full_name.as_deref().unwrap_or(&entry.player_id),
            entry.count
        );
    }
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    let config = config.redacted();
    println!("📋 ragfant Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Log dir: {}", config.logging.log_dir);
    println!("  File output: {}", config.logging.file_output);
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {}", config.embeddings.provider.name());
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  Key: {}", config.embeddings.api_key);
    println!("  Cache capacity: {}", config.embeddings.cache_capacity);
    println!();

    println!("🤖 LLM:");
    println!("  Provider: {}", config.llm.provider.name());
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!("  Key: {}", config.llm.api_key);
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Max tokens: {}", config.llm.max_tokens);
    println!();

    println!("🗂️  Index:");
    println!("  Vectors: {}", config.index_path().display());
    println!("  Metadata: {}", config.metadata_path().display());
    println!(
        "  Top-K: {} (overfetch min {}, position cap {})",
        config.retrieval.top_k, config.retrieval.overfetch_min, config.retrieval.position_cap
    );
    println!();

    println!("🔁 HTTP:");
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Max attempts: {}", config.http.max_attempts);
    println!("  Backoff base: {}ms", config.http.backoff_base_ms);
    println!();

    println!("🏈 Sleeper:");
    println!("  Base URL: {}", config.sleeper.base_url);
    println!("  Seasons: {}", config.sleeper.seasons.join(", "));
    println!("  Current season: {}", config.sleeper.current_season);
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  CORS: {}", config.server.enable_cors);
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}
