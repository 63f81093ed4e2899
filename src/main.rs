use clap::Parser;
use ragfant::cli::commands::Cli;
use ragfant::cli::commands::Commands;
use ragfant::cli::handlers;
use ragfant::cli::handlers::AskOptions;
use ragfant::cli::output::print_error;
use ragfant::config::AppConfig;
use ragfant::Result;
use tracing::error;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        if err.is_fatal() {
            error!("Fatal: {err}");
        }
        print_error(&err.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Initialize logging
    ragfant::logging::init_logging(&config.logging, cli.verbose)?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Ask {
            question,
            top_k,
            positions,
            min_grade,
            sleeper_user,
            league_id,
            temperature,
            max_tokens,
            show_sources,
        } => {
            let options = AskOptions {
                top_k,
                positions,
                min_grade,
                sleeper_user,
                league_id,
                temperature,
                max_tokens,
                show_sources,
            };
            handlers::handle_ask(&config, question, options).await?;
        }
        Commands::Search {
            query,
            top_k,
            positions,
            min_grade,
            full,
        } => {
            handlers::handle_search(&config, query, top_k, positions, min_grade, full).await?;
        }
        Commands::Index(index_command) => {
            handlers::handle_index_command(&config, &index_command).await?;
        }
        Commands::Sleeper(sleeper_command) => {
            handlers::handle_sleeper_command(&config, &sleeper_command).await?;
        }
        Commands::Serve { host, port, cors } => {
            handlers::handle_serve_api(&config, host, port, cors).await?;
        }
        Commands::Config { toml } => {
            handlers::handle_config_command(&config, toml)?;
        }
    }

    Ok(())
}
