use colored::*;
use match_insight::analysis::live::{LiveSeat, ITEM_SLOTS};
use match_insight::analysis::model::TeamSide;
use match_insight::analysis::roles::{self, Role};
use match_insight::analysis::scoring::ScoreBreakdown;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ScoreRow {
    rank: String,
    role: String,
    player: String,
    champion: String,
    kda: String,
    dmg: String,
    kp: String,
    surv: String,
    gold: String,
    farm: String,
    vision: String,
    adj: String,
    total: String,
    runes: String,
}

#[derive(Tabled)]
struct LiveRow {
    role: String,
    player: String,
    champion: String,
    #[tabled(rename = "live as")]
    live_name: String,
    confidence: String,
    kda: String,
    cs: String,
    level: String,
    gold: String,
    items: String,
}

#[derive(Tabled)]
struct LobbyRow {
    role: String,
    player: String,
    champion: String,
    spells: String,
}

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "#")]
    number: String,
    date: String,
    champion: String,
    role: String,
    result: String,
    kda: String,
    score: String,
    rank: String,
}

/// One scored player, ready to print.
pub struct ScoreboardEntry {
    pub team: TeamSide,
    pub win: bool,
    pub role: Option<Role>,
    pub name: String,
    pub champion: String,
    pub kda: String,
    pub breakdown: ScoreBreakdown,
    pub rank: u32,
    pub runes: String,
}

pub struct LiveEntry {
    pub team: TeamSide,
    pub role: Option<Role>,
    pub name: String,
    pub champion: String,
    pub seat: Option<LiveSeat>,
}

pub struct LobbyEntry {
    pub team: TeamSide,
    pub role: Role,
    pub name: String,
    pub champion: String,
    pub spells: [u32; 2],
}

pub struct RecentEntry {
    pub date: String,
    pub champion: String,
    pub role: Option<Role>,
    pub won: bool,
    pub kda: String,
    pub score: f64,
    pub rank: u32,
}

fn role_label(role: Option<Role>) -> String {
    role.map(|r| r.label().to_string()).unwrap_or_else(|| "-".to_string())
}

fn team_header(team: TeamSide, win: Option<bool>) -> String {
    let name = format!("{} team", team);
    let colored_name = match team {
        TeamSide::Blue => name.bold().blue(),
        TeamSide::Red => name.bold().red(),
    };
    match win {
        Some(true) => format!("{} {}", colored_name, "VICTORY".green()),
        Some(false) => format!("{} {}", colored_name, "DEFEAT".red()),
        None => colored_name.to_string(),
    }
}

fn spell_label(id: u32) -> &'static str {
    match id {
        roles::SPELL_CLEANSE => "Cleanse",
        roles::SPELL_EXHAUST => "Exhaust",
        roles::SPELL_FLASH => "Flash",
        roles::SPELL_GHOST => "Ghost",
        roles::SPELL_HEAL => "Heal",
        roles::SPELL_SMITE => "Smite",
        roles::SPELL_TELEPORT => "Teleport",
        roles::SPELL_IGNITE => "Ignite",
        roles::SPELL_BARRIER => "Barrier",
        _ => "?",
    }
}

fn sort_by_role<T>(entries: &mut [T], role: impl Fn(&T) -> Option<Role>) {
    entries.sort_by_key(|e| role(e).map(Role::rank).unwrap_or(u8::MAX));
}

pub fn display_scoreboard(match_id: &str, duration_secs: u64, mut entries: Vec<ScoreboardEntry>) {
    println!(
        "\n{}",
        format!("🏆 SCOREBOARD {} ({}m {:02}s)", match_id, duration_secs / 60, duration_secs % 60)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(80).cyan());

    sort_by_role(&mut entries, |e| e.role);

    for team in [TeamSide::Blue, TeamSide::Red] {
        let team_entries: Vec<&ScoreboardEntry> = entries.iter().filter(|e| e.team == team).collect();
        if team_entries.is_empty() {
            continue;
        }

        println!("\n{}\n", team_header(team, team_entries.first().map(|e| e.win)));

        let rows: Vec<ScoreRow> = team_entries
            .iter()
            .map(|e| {
                let b = &e.breakdown;
                let rank = if e.rank == 1 {
                    format!("#{} 👑", e.rank).yellow().to_string()
                } else {
                    format!("#{}", e.rank)
                };
                ScoreRow {
                    rank,
                    role: role_label(e.role),
                    player: e.name.clone(),
                    champion: e.champion.clone(),
                    kda: e.kda.clone(),
                    dmg: format!("{:.1}", b.damage_share),
                    kp: format!("{:.1}", b.kill_participation),
                    surv: format!("{:.1}", b.kda),
                    gold: format!("{:.1}", b.gold_share),
                    farm: format!("{:.1}", b.farm),
                    vision: format!("{:.1}", b.vision),
                    adj: format!("{:+.1}", b.victory_bonus - b.penalty),
                    total: format!("{:.1}", b.total).bold().to_string(),
                    runes: e.runes.clone(),
                }
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    println!("\n{}", "Interpretation".bold().yellow());
    println!("• dmg / kp / surv / gold / farm / vision: weighted components (26/21/18/13/12/10)");
    println!("• adj: victory bonus minus adjustments; total is capped at 120\n");

    if let Some(mvp) = entries.iter().find(|e| e.rank == 1) {
        println!("{}", "Match MVP".bold().red());
        println!(
            "  {} ({}) with {:.1} points",
            mvp.name, mvp.champion, mvp.breakdown.total
        );
        if !mvp.breakdown.applied_rules.is_empty() {
            println!("  adjustments: {}", mvp.breakdown.applied_rules.join(", "));
        }
    }

    println!();
}

fn format_items(items: &[Option<u32>; ITEM_SLOTS]) -> String {
    items
        .iter()
        .map(|slot| slot.map(|id| id.to_string()).unwrap_or_else(|| "·".to_string()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_live_resolution(mut entries: Vec<LiveEntry>) {
    println!("\n{}", "📡 LIVE SEATS".bold().cyan());
    println!("{}", "=".repeat(80).cyan());

    sort_by_role(&mut entries, |e| e.role);

    for team in [TeamSide::Blue, TeamSide::Red] {
        let team_entries: Vec<&LiveEntry> = entries.iter().filter(|e| e.team == team).collect();
        if team_entries.is_empty() {
            continue;
        }

        println!("\n{}\n", team_header(team, None));

        let rows: Vec<LiveRow> = team_entries
            .iter()
            .map(|e| match &e.seat {
                Some(seat) => {
                    let live = &seat.player;
                    let state = if live.is_dead {
                        format!(" (dead {:.0}s)", live.respawn_timer).red().to_string()
                    } else {
                        String::new()
                    };
                    LiveRow {
                        role: role_label(e.role),
                        player: e.name.clone(),
                        champion: e.champion.clone(),
                        live_name: format!("{}{}", live.name, state),
                        confidence: seat.confidence.to_string(),
                        kda: format!("{}/{}/{}", live.kills, live.deaths, live.assists),
                        cs: live.creep_score.to_string(),
                        level: live.level.to_string(),
                        gold: seat
                            .current_gold
                            .map(|g| format!("{:.0}", g))
                            .unwrap_or_else(|| "-".to_string()),
                        items: format_items(&seat.items),
                    }
                }
                None => LiveRow {
                    role: role_label(e.role),
                    player: e.name.clone(),
                    champion: e.champion.clone(),
                    live_name: "no live data".dimmed().to_string(),
                    confidence: "-".to_string(),
                    kda: "-".to_string(),
                    cs: "-".to_string(),
                    level: "-".to_string(),
                    gold: "-".to_string(),
                    items: format_items(&[None; ITEM_SLOTS]),
                },
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    let resolved = entries.iter().filter(|e| e.seat.is_some()).count();
    println!("\n{} {}/{} seats resolved\n", "📈".bold(), resolved, entries.len());
}

pub fn display_lobby_roles(mut entries: Vec<LobbyEntry>) {
    println!("\n{}", "🧭 CHAMPION SELECT ROLES".bold().cyan());
    println!("{}", "=".repeat(60).cyan());

    entries.sort_by_key(|e| e.role.rank());

    for team in [TeamSide::Blue, TeamSide::Red] {
        let rows: Vec<LobbyRow> = entries
            .iter()
            .filter(|e| e.team == team)
            .map(|e| LobbyRow {
                role: e.role.label().to_string(),
                player: e.name.clone(),
                champion: e.champion.clone(),
                spells: format!("{} + {}", spell_label(e.spells[0]), spell_label(e.spells[1])),
            })
            .collect();
        if rows.is_empty() {
            continue;
        }

        println!("\n{}\n", team_header(team, None));
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    println!(
        "\n{}\n",
        "Roles without a declared position are inferred from summoner spells and may be wrong.".dimmed()
    );
}

pub fn display_recent_performance(player_name: &str, entries: Vec<RecentEntry>) {
    if entries.is_empty() {
        println!("{}", "No matches to show".yellow());
        return;
    }

    let total = entries.len();
    let wins = entries.iter().filter(|e| e.won).count();
    let avg_score = entries.iter().map(|e| e.score).sum::<f64>() / total as f64;
    let avg_rank = entries.iter().map(|e| e.rank as f64).sum::<f64>() / total as f64;
    let mvps = entries.iter().filter(|e| e.rank == 1).count();

    println!(
        "\n{}",
        format!("📊 RECENT PERFORMANCE for {} (Last {} Games)", player_name, total).bold().cyan()
    );
    println!("{}\n", "=".repeat(80).cyan());
    println!(
        "{} {} W / {} L | avg score {:.1} | avg rank {:.1} | MVP x{}\n",
        "📈 Overall:".bold(),
        wins.to_string().green(),
        (total - wins).to_string().red(),
        avg_score,
        avg_rank,
        mvps
    );

    let rows: Vec<RecentRow> = entries
        .into_iter()
        .enumerate()
        .map(|(idx, e)| RecentRow {
            number: format!("{}", idx + 1),
            date: e.date,
            champion: e.champion,
            role: role_label(e.role),
            result: if e.won {
                "WIN".green().to_string()
            } else {
                "LOSS".red().to_string()
            },
            kda: e.kda,
            score: format!("{:.1}", e.score),
            rank: format!("#{}", e.rank),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
