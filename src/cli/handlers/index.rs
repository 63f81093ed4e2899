//! Index ingestion handlers
//!
//! `embed` turns a rankings export into embedded records, `build` writes the
//! aligned vector and metadata artifacts the query path loads.

use std::path::Path;

use super::load_index;
use crate::cli::commands::IndexCommands;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::ingest;
use crate::AppConfig;

/// Handle index commands
pub async fn handle_index_command(config: &AppConfig, command: &IndexCommands) -> Result<()> {
    match command {
        IndexCommands::Embed { input, output } => handle_index_embed(config, input, output).await,
        IndexCommands::Build { input } => handle_index_build(config, input),
        IndexCommands::Stats => handle_index_stats(config),
    }
}

async fn handle_index_embed(config: &AppConfig, input: &Path, output: &Path) -> Result<()> {
    let rankings = ingest::read_rankings(input)?;
    print_info(&format!(
        "Embedding {} rankings from {} with {}",
        rankings.len(),
        input.display(),
        config.embedding_model()
    ));

    let service = EmbeddingService::new(config)?;
    let records = ingest::embed_rankings(&service, &rankings).await?;
    let skipped = rankings.len() - records.len();
    if skipped > 0 {
        print_warning(&format!("Skipped {skipped} rankings that could not be normalized"));
    }

    ingest::write_embedded(output, &records)?;
    print_success(&format!(
        "Wrote {} embedded records to {}",
        records.len(),
        output.display()
    ));
    println!("   Next: ragfant index build {}", output.display());
    Ok(())
}

fn handle_index_build(config: &AppConfig, input: &Path) -> Result<()> {
    let index_path = config.index_path();
    let metadata_path = config.metadata_path();
    print_info(&format!("Building index from {}", input.display()));

    let stats = ingest::build_artifacts(input, &index_path, &metadata_path)?;
    if stats.dimension != config.embedding_dimension() {
        print_warning(&format!(
            "Index dimension {} differs from embeddings.dimension {}",
            stats.dimension,
            config.embedding_dimension()
        ));
    }

    print_success(&format!(
        "Indexed {} records ({} dimensions)",
        stats.records, stats.dimension
    ));
    println!("   Vectors:  {}", index_path.display());
    println!("   Metadata: {}", metadata_path.display());
    Ok(())
}

fn handle_index_stats(config: &AppConfig) -> Result<()> {
    let index = load_index(config)?;

    println!("📊 Index Statistics");
    println!("===================\n");
    println!("Records:   {}", index.len());
    println!("Dimension: {}", index.vectors().dimension());
    println!("Vectors:   {}", config.index_path().display());
    println!("Metadata:  {}", config.metadata_path().display());
    println!("\nBy position:");
    for (position, count) in index.metadata().position_counts() {
        println!("  {position:<4} {count}");
    }

    let rookies = index
        .metadata()
        .records()
        .iter()
        .filter(|r| r.is_rookie())
        .count();
    println!("\nRookies:   {rookies}");
    Ok(())
}
