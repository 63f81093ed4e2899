//! RAG (Retrieval-Augmented Generation) handlers

use std::sync::Arc;

use super::load_rag_service;
use crate::cli::output::print_info;
use crate::cli::output::print_search_results;
use crate::cli::output::print_separator;
use crate::cli::output::print_warning;
use crate::rag::context::format_result;
use crate::rag::RagOutcome;
use crate::rag::RagQuery;
use crate::rag::SearchFilters;
use crate::sleeper::roster_context;
use crate::sleeper::LeagueManager;
use crate::sleeper::SleeperApi;
use crate::AppConfig;
use crate::Result;

/// Options of one `ask` invocation
#[derive(Debug, Default)]
pub struct AskOptions {
    pub top_k: Option<usize>,
    pub positions: Vec<String>,
    pub min_grade: Option<String>,
    pub sleeper_user: Option<String>,
    pub league_id: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub show_sources: bool,
}

pub async fn handle_ask(config: &AppConfig, question: String, options: AskOptions) -> Result<()> {
    let filters = SearchFilters::parse(&options.positions, options.min_grade.as_deref())?;
    let rag = load_rag_service(config)?;

    print_info(&format!("🤖 Question: \"{question}\""));

    let mut extra_context = Vec::new();
    if let (Some(username), Some(league_id)) = (&options.sleeper_user, &options.league_id) {
        println!("\n🏈 Loading roster for {username} in league {league_id}...");
        let source = Arc::new(SleeperApi::new(config)?);
        let league = LeagueManager::new(source, config.sleeper.seasons.clone());
        let players = league.league_roster(username, league_id).await?;
        if players.is_empty() {
            print_warning("No roster players found in the Sleeper catalogue");
        }
        extra_context.push(roster_context(&players));
    }

    println!("\n🔍 Retrieving players and generating answer...");
    let outcome = rag
        .ask(RagQuery {
            question,
            top_k: options.top_k,
            filters,
            extra_context,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        })
        .await?;

    match &outcome {
        RagOutcome::Answered(response) => {
            println!();
            print_separator();
            println!("📝 Answer:");
            print_separator();
            println!("{}", response.answer);
            print_separator();

            if options.show_sources {
                println!(
                    "\n📚 Sources (intents: {}, context: {} chars):",
                    response.intents,
                    response.context.len()
                );
                print_search_results(&response.sources);
            }
        }
        RagOutcome::NoRelevantInformation { intents, .. } => {
            print_warning(&format!("{} (intents: {intents})", outcome.answer()));
        }
    }

    Ok(())
}

pub async fn handle_search(
    config: &AppConfig,
    query: String,
    top_k: Option<usize>,
    positions: Vec<String>,
    min_grade: Option<String>,
    full: bool,
) -> Result<()> {
    let filters = SearchFilters::parse(&positions, min_grade.as_deref())?;
    let rag = load_rag_service(config)?;
    let top_k = top_k.unwrap_or(rag.retriever().config().top_k);

    print_info(&format!("🔍 Searching: \"{query}\""));
    let outcome = rag.search(&query, top_k, &filters).await?;

    println!(
        "Intents: {} | Candidates considered: {}",
        outcome.intents, outcome.candidates_considered
    );
    if outcome.results.is_empty() {
        print_warning("No matching players");
        return Ok(());
    }

    if full {
        for result in &outcome.results {
            print_separator();
            println!("{}", format_result(result));
        }
        print_separator();
    } else {
        print_search_results(&outcome.results);
    }

    Ok(())
}
