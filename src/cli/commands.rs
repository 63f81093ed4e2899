//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "ragfant")]
#[command(about = "Fantasy football rankings search and question answering")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question answered from the rankings index
    Ask {
        /// The question to ask
        question: String,
        /// Number of players to retrieve (default: retrieval.top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Only consider these positions (QB, RB, WR, TE, K, DST)
        #[arg(short, long, value_delimiter = ',')]
        positions: Vec<String>,
        /// Minimum start/sit grade, e.g. B+
        #[arg(long)]
        min_grade: Option<String>,
        /// Sleeper username whose roster is added to the context
        #[arg(long, requires = "league_id")]
        sleeper_user: Option<String>,
        /// Sleeper league for --sleeper-user
        #[arg(long, requires = "sleeper_user")]
        league_id: Option<String>,
        /// LLM temperature (0.0 - 2.0)
        #[arg(long)]
        temperature: Option<f32>,
        /// Maximum tokens for response
        #[arg(long)]
        max_tokens: Option<usize>,
        /// Show retrieved players and context size
        #[arg(long)]
        show_sources: bool,
    },
    /// Semantic search without answer generation
    Search {
        /// The search query
        query: String,
        /// Number of players to return
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Only consider these positions (QB, RB, WR, TE, K, DST)
        #[arg(short, long, value_delimiter = ',')]
        positions: Vec<String>,
        /// Minimum start/sit grade, e.g. B+
        #[arg(long)]
        min_grade: Option<String>,
        /// Print the full context block for each player
        #[arg(long)]
        full: bool,
    },
    /// Index ingestion and inspection
    #[command(subcommand)]
    Index(IndexCommands),
    /// Sleeper league data
    #[command(subcommand)]
    Sleeper(SleeperCommands),
    /// Start the HTTP API server
    Serve {
        /// Host to bind (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS for all origins
        #[arg(long)]
        cors: bool,
    },
    /// Show the effective configuration with secrets masked
    Config {
        /// Print as TOML, ready to save as config.toml
        #[arg(long)]
        toml: bool,
    },
}

#[derive(Subcommand)]
pub enum IndexCommands {
    /// Embed a raw rankings export into a records file
    Embed {
        /// Rankings JSON export
        input: PathBuf,
        /// Output file for embedded records
        #[arg(short, long, default_value = "data/embedded_rankings.json")]
        output: PathBuf,
    },
    /// Build the index artifacts from embedded records
    Build {
        /// Embedded records file
        #[arg(default_value = "data/embedded_rankings.json")]
        input: PathBuf,
    },
    /// Show index statistics
    Stats,
}

#[derive(Subcommand)]
pub enum SleeperCommands {
    /// List a user's leagues across the configured seasons
    Leagues {
        username: String,
    },
    /// Show a user's roster with draft rounds
    Roster {
        username: String,
        league_id: String,
    },
    /// Rank a user's drafted players by keeper value
    Keepers {
        league_id: String,
        user_id: String,
    },
    /// League standings
    Standings {
        league_id: String,
    },
    /// Draft picks that changed hands
    TradedPicks {
        league_id: String,
    },
    /// Matchups for one week
    Matchups {
        league_id: String,
        week: u32,
    },
    /// Waiver and trade activity for one week
    Transactions {
        league_id: String,
        week: u32,
    },
    /// Most added and dropped players
    Trending {
        /// Lookback window in hours
        #[arg(long, default_value = "24")]
        hours: u32,
        /// Number of players per list
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
}
