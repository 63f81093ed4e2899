//! Sleeper league handlers

use std::sync::Arc;

use crate::cli::commands::SleeperCommands;
use crate::cli::output::print_info;
use crate::cli::output::print_keepers;
use crate::cli::output::print_roster;
use crate::cli::output::print_separator;
use crate::cli::output::print_standings;
use crate::cli::output::print_trending;
use crate::cli::output::print_warning;
use crate::sleeper::LeagueManager;
use crate::sleeper::SleeperApi;
use crate::AppConfig;
use crate::Result;

pub async fn handle_sleeper_command(config: &AppConfig, command: &SleeperCommands) -> Result<()> {
    let source = Arc::new(SleeperApi::new(config)?);
    let league = LeagueManager::new(source, config.sleeper.seasons.clone());

    match command {
        SleeperCommands::Leagues { username } => {
            let leagues = league.user_leagues(username).await?;
            print_info(&format!(
                "{} ({}) has {} leagues",
                leagues.username,
                leagues.user_id,
                leagues.leagues.len()
            ));
            for summary in &leagues.leagues {
                print_separator();
                println!(
                    "🏆 {} [{}] season {}",
                    summary.league_name, summary.league_id, summary.season
                );
                println!(
                    "   Teams: {} | Roster slots: {} | Your picks: {}",
                    summary.total_rosters,
                    summary.roster_positions.len(),
                    summary.draft_picks.len()
                );
                println!(
                    "   Record: {}-{} | PF {:.2}",
                    summary.user_roster.settings.wins,
                    summary.user_roster.settings.losses,
                    summary.user_roster.settings.points_for()
                );
            }
        }
        SleeperCommands::Roster {
            username,
            league_id,
        } => {
            let players = league.league_roster(username, league_id).await?;
            print_roster(&players);
        }
        SleeperCommands::Keepers { league_id, user_id } => {
            let options = league.keeper_recommendations(league_id, user_id).await?;
            print_info(&format!("🔒 Keeper values for {user_id} in {league_id}"));
            print_keepers(&options);
        }
        SleeperCommands::Standings { league_id } => {
            let rows = league.standings(league_id).await?;
            print_info(&format!("📊 Standings for {league_id}"));
            print_standings(&rows);
        }
        SleeperCommands::TradedPicks { league_id } => {
            let picks = league.traded_picks(league_id).await?;
            if picks.is_empty() {
                print_warning("No traded picks");
            }
            for pick in &picks {
                println!(
                    "  - {} round {}: roster {} pick now owned by roster {}",
                    pick.season, pick.round, pick.roster_id, pick.owner_id
                );
            }
        }
        SleeperCommands::Matchups { league_id, week } => {
            let mut matchups = league.matchups(league_id, *week).await?;
            matchups.sort_by_key(|m| (m.matchup_id, m.roster_id));
            print_info(&format!("Week {week} matchups for {league_id}"));
            for matchup in &matchups {
                println!(
                    "  Matchup {:>2}: roster {:>2} scored {:.2}",
                    matchup.matchup_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    matchup.roster_id,
                    matchup.points
                );
            }
        }
        SleeperCommands::Transactions { league_id, week } => {
            let transactions = league.transactions(league_id, *week).await?;
            print_info(&format!("Week {week} transactions for {league_id}"));
            if transactions.is_empty() {
                print_warning("No transactions");
            }
            for transaction in &transactions {
                println!(
                    "  {} [{}] rosters {:?}: +{} -{}",
                    transaction.kind.as_deref().unwrap_or("unknown"),
                    transaction.status.as_deref().unwrap_or("-"),
                    transaction.roster_ids,
                    transaction.adds.as_ref().map_or(0, |adds| adds.len()),
                    transaction.drops.as_ref().map_or(0, |drops| drops.len())
                );
            }
        }
        SleeperCommands::Trending { hours, limit } => {
            let trending = league.trending(*hours, *limit).await?;
            print_info(&format!("📈 Trending over the last {hours} hours"));
            print_trending("Adds", &trending.adds);
            print_trending("Drops", &trending.drops);
        }
    }

    Ok(())
}
