//! Sleeper fantasy league integration
//!
//! Read-only access to the public Sleeper API plus keeper, standings and
//! roster views used to enrich questions about a user's own league.

pub mod client;
pub mod league;
pub mod models;

pub use client::LeagueDataSource;
pub use client::SleeperApi;
pub use league::keeper_value;
pub use league::roster_context;
pub use league::LeagueManager;
