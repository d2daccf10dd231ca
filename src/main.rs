mod display;

use anyhow::Context;
use clap::{Parser, Subcommand};
use display::output::{
    display_error, display_info, display_live_resolution, display_lobby_roles, display_recent_performance,
    display_scoreboard, display_success, LiveEntry, LobbyEntry, RecentEntry, ScoreboardEntry,
};
use indicatif::ProgressBar;
use match_insight::analysis::model::lobby_participants;
use match_insight::analysis::roles::role_of;
use match_insight::analysis::{
    assign_by_team, LiveMatchResolver, LiveRoster, Participant, ParticipantKey, PerformanceScorer,
};
use match_insight::api::client::{get_live_snapshot, load_document, RiotApiClient};
use match_insight::api::models::{ChampSelectSessionDto, MatchDto};
use match_insight::assets::{AssetInfo, AssetRequestCoalescer, DataDragonRunes, PerkId};
use match_insight::config::Config;
use match_insight::error::AppError;
use match_insight::telemetry;
use std::collections::HashMap;

const MAX_RECENT_MATCHES: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "Match Insight")]
#[command(about = "Role assignment, performance ranking and live seat resolution for League matches", long_about = None)]
struct Args {
    /// Region (default: RIOT_REGION or na1)
    #[arg(short, long, global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank every player of a finished match
    Scoreboard {
        /// Match ID, e.g. NA1_4960000000
        match_id: String,

        /// Read the match-v5 document from a file instead of the API
        #[arg(long)]
        file: Option<String>,
    },

    /// Resolve every player of a match against a live client snapshot
    Live {
        /// Match ID of the historical roster
        match_id: String,

        /// Read the match-v5 document from a file instead of the API
        #[arg(long)]
        file: Option<String>,

        /// Live client `allgamedata` document: a path or an http(s) URL
        #[arg(long)]
        snapshot: String,
    },

    /// Order a champion select lobby into roles
    Lobby {
        /// LCU `/lol-champ-select/v1/session` document
        #[arg(long)]
        session: String,
    },

    /// Score and rank a player across their recent matches
    Recent {
        /// Riot Game Name
        game_name: String,

        /// Riot Tag (tag line)
        tag_line: String,

        /// Number of matches to analyze (max: 100)
        #[arg(short, long, default_value = "10")]
        matches: usize,

        /// Skip first N matches (offset from most recent)
        #[arg(long, default_value = "0")]
        offset: usize,
    },
}

fn main() {
    telemetry::init_telemetry();
    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(region) = args.region {
        config.region = region;
    }

    match args.command {
        Command::Scoreboard { match_id, file } => run_scoreboard(&config, &match_id, file.as_deref()),
        Command::Live {
            match_id,
            file,
            snapshot,
        } => run_live(&config, &match_id, file.as_deref(), &snapshot),
        Command::Lobby { session } => run_lobby(&session),
        Command::Recent {
            game_name,
            tag_line,
            matches,
            offset,
        } => run_recent(config, &game_name, &tag_line, matches, offset),
    }
}

fn load_match(config: &Config, match_id: &str, file: Option<&str>) -> Result<MatchDto, AppError> {
    match file {
        Some(path) => {
            display_info(&format!("Reading match {} from {}", match_id, path));
            load_document(path)
        }
        None => {
            display_info(&format!("Fetching match {} in region {}", match_id, config.region));
            RiotApiClient::new(config.clone()).get_match(match_id)
        }
    }
}

fn participants_of(match_data: &MatchDto) -> Vec<Participant> {
    match_data.info.participants.iter().map(Participant::from).collect()
}

fn kda_text(participant: &Participant) -> String {
    format!(
        "{}/{}/{}",
        participant.stats.kills, participant.stats.deaths, participant.stats.assists
    )
}

/// Looks up keystone and secondary style for every participant. Each player
/// asks separately; the coalescer folds the lookups into one call.
fn resolve_rune_assets(config: &Config, participants: &[Participant]) -> anyhow::Result<HashMap<PerkId, AssetInfo>> {
    let coalescer = AssetRequestCoalescer::new(
        DataDragonRunes::new(config.ddragon_version.clone()),
        config.asset_batch_window,
    );

    let per_player: Vec<Vec<PerkId>> = participants
        .iter()
        .map(|p| {
            p.perks
                .keystone()
                .into_iter()
                .chain(std::iter::once(p.perks.secondary_style))
                .filter(|id| *id != 0)
                .collect()
        })
        .collect();
    let all_ids: Vec<PerkId> = per_player.iter().flatten().copied().collect();

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async {
        let lookups: Vec<_> = per_player
            .into_iter()
            .map(|ids| {
                let coalescer = coalescer.clone();
                tokio::spawn(async move { coalescer.request(&ids).await })
            })
            .collect();
        for lookup in lookups {
            let _ = lookup.await;
        }
    });

    Ok(coalescer.cached(&all_ids))
}

fn rune_text(participant: &Participant, assets: &HashMap<PerkId, AssetInfo>) -> String {
    let name = |id: Option<PerkId>| {
        id.and_then(|id| assets.get(&id))
            .map(|info| info.name.clone())
            .unwrap_or_else(|| "-".to_string())
    };
    format!(
        "{} / {}",
        name(participant.perks.keystone()),
        name(Some(participant.perks.secondary_style))
    )
}

fn run_scoreboard(config: &Config, match_id: &str, file: Option<&str>) -> anyhow::Result<()> {
    let match_data = load_match(config, match_id, file)?;
    let participants = participants_of(&match_data);
    let duration_secs = u64::try_from(match_data.info.game_duration).unwrap_or(0);

    let roles = assign_by_team(&participants);
    let (scores, ranks) = PerformanceScorer::score_and_rank(&participants, duration_secs);
    let assets = resolve_rune_assets(config, &participants)?;

    let entries = participants
        .iter()
        .enumerate()
        .filter_map(|(idx, p)| {
            let key = ParticipantKey(idx);
            Some(ScoreboardEntry {
                team: p.team,
                win: p.win,
                role: roles.get(&p.team).and_then(|team_roles| role_of(team_roles, p)),
                name: p.name.clone(),
                champion: p.champion.clone(),
                kda: kda_text(p),
                breakdown: scores.get(&key)?.clone(),
                rank: *ranks.get(&key)?,
                runes: rune_text(p, &assets),
            })
        })
        .collect();

    display_scoreboard(&match_data.metadata.match_id, duration_secs, entries);
    Ok(())
}

fn run_live(config: &Config, match_id: &str, file: Option<&str>, snapshot: &str) -> anyhow::Result<()> {
    let match_data = load_match(config, match_id, file)?;
    let participants = participants_of(&match_data);
    let roles = assign_by_team(&participants);

    // A missing or unreadable snapshot just means nobody resolves.
    let roster = match get_live_snapshot(snapshot) {
        Ok(doc) => LiveRoster::from(&doc),
        Err(e) => {
            tracing::warn!(error = %e, snapshot, "live snapshot unavailable");
            LiveRoster::default()
        }
    };
    display_success(&format!("Live roster has {} players", roster.players.len()));

    let entries = participants
        .iter()
        .map(|p| LiveEntry {
            team: p.team,
            role: roles.get(&p.team).and_then(|team_roles| role_of(team_roles, p)),
            name: p.name.clone(),
            champion: p.champion.clone(),
            seat: LiveMatchResolver::resolve_seat(p, &roster),
        })
        .collect();

    display_live_resolution(entries);
    Ok(())
}

fn run_lobby(session_source: &str) -> anyhow::Result<()> {
    let session: ChampSelectSessionDto = load_document(session_source)?;
    let participants = lobby_participants(&session);
    let roles = assign_by_team(&participants);

    let entries = roles
        .iter()
        .flat_map(|(team, team_roles)| {
            team_roles.iter().map(move |(role, p)| LobbyEntry {
                team: *team,
                role: *role,
                name: p.name.clone(),
                champion: p.champion.clone(),
                spells: p.spells,
            })
        })
        .collect();

    display_lobby_roles(entries);
    Ok(())
}

fn run_recent(config: Config, game_name: &str, tag_line: &str, matches: usize, offset: usize) -> anyhow::Result<()> {
    config.require_api_key()?;
    let client = RiotApiClient::new(config);

    display_info("Getting account info...");
    let account = client.get_account(game_name, tag_line)?;
    display_success(&format!("Found PUUID: {}", account.puuid.get(0..8).unwrap_or(&account.puuid)));

    let count = matches.clamp(1, MAX_RECENT_MATCHES);
    let match_ids = client.get_match_ids(&account.puuid, offset, count)?;
    if match_ids.is_empty() {
        return Err(AppError::NoMatchesFound.into());
    }
    display_success(&format!("Found {} matches to analyze", match_ids.len()));

    let pb = ProgressBar::new(match_ids.len() as u64);
    pb.set_message("Fetching match details");
    let mut entries = Vec::new();

    for match_id in &match_ids {
        let match_data = client.get_match(match_id)?;
        pb.inc(1);

        let participants = participants_of(&match_data);
        let Some(idx) = participants
            .iter()
            .position(|p| p.puuid.as_deref() == Some(account.puuid.as_str()))
        else {
            tracing::warn!(match_id = %match_id, "player missing from match participants");
            continue;
        };

        let duration_secs = u64::try_from(match_data.info.game_duration).unwrap_or(0);
        let (scores, ranks) = PerformanceScorer::score_and_rank(&participants, duration_secs);
        let roles = assign_by_team(&participants);

        let me = &participants[idx];
        let key = ParticipantKey(idx);
        let date = chrono::DateTime::from_timestamp_millis(match_data.info.game_creation)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        entries.push(RecentEntry {
            date,
            champion: me.champion.clone(),
            role: roles.get(&me.team).and_then(|team_roles| role_of(team_roles, me)),
            won: me.win,
            kda: kda_text(me),
            score: scores.get(&key).map(|b| b.total).unwrap_or(0.0),
            rank: ranks.get(&key).copied().unwrap_or(0),
        });
    }

    pb.finish_with_message("✓ Match data fetched");

    let display_name = if account.game_name.is_empty() {
        format!("{}#{}", game_name, tag_line)
    } else {
        format!("{}#{}", account.game_name, account.tag_line)
    };
    display_recent_performance(&display_name, entries);
    Ok(())
}
