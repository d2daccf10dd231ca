//! Participant records the engine works on, plus conversions from the wire
//! models of each feed (post-game box score, live client roster, champion
//! select lobby).

use crate::api::models::{ChampSelectMemberDto, ChampSelectSessionDto, LivePlayerDto, ParticipantDto, RawItem};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeamSide {
    Blue,
    Red,
}

impl TeamSide {
    /// Match-v5 `teamId`: 100 is blue, 200 is red. Anything else is treated as red.
    pub fn from_team_id(team_id: i32) -> Self {
        if team_id == 100 {
            TeamSide::Blue
        } else {
            TeamSide::Red
        }
    }

    /// Live client `team`: "ORDER" is blue, "CHAOS" is red.
    pub fn from_live_team(team: &str) -> Self {
        if team.eq_ignore_ascii_case("ORDER") {
            TeamSide::Blue
        } else {
            TeamSide::Red
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamSide::Blue => write!(f, "Blue"),
            TeamSide::Red => write!(f, "Red"),
        }
    }
}

/// Post-game counters as reported by the box score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxScore {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_earned: u32,
    pub damage_to_champions: u32,
    pub vision_score: u32,
    pub lane_minions: u32,
    pub neutral_minions: u32,
}

impl BoxScore {
    pub fn creep_score(&self) -> u32 {
        self.lane_minions.saturating_add(self.neutral_minions)
    }

    pub fn takedowns(&self) -> u32 {
        self.kills.saturating_add(self.assists)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerkSelection {
    pub primary_style: u32,
    /// Ordered; the first entry is the keystone.
    pub primary_selections: Vec<u32>,
    pub secondary_style: u32,
}

impl PerkSelection {
    pub fn keystone(&self) -> Option<u32> {
        self.primary_selections.first().copied()
    }
}

/// A historical participant of a finished match. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub team: TeamSide,
    pub position: Option<String>,
    pub name: String,
    pub puuid: Option<String>,
    pub champion: String,
    pub win: bool,
    pub stats: BoxScore,
    pub spells: [u32; 2],
    pub perks: PerkSelection,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl From<&ParticipantDto> for Participant {
    fn from(dto: &ParticipantDto) -> Self {
        let position = non_empty(&dto.team_position).or_else(|| {
            non_empty(&dto.individual_position).filter(|p| !p.eq_ignore_ascii_case("invalid"))
        });
        let name = non_empty(&dto.riot_id_game_name)
            .or_else(|| non_empty(&dto.summoner_name))
            .unwrap_or_default();

        let primary = dto.perks.styles.iter().find(|s| s.description == "primaryStyle");
        let secondary = dto.perks.styles.iter().find(|s| s.description == "subStyle");
        let perks = PerkSelection {
            primary_style: primary.map(|s| s.style).unwrap_or(0),
            primary_selections: primary
                .map(|s| s.selections.iter().map(|sel| sel.perk).collect())
                .unwrap_or_default(),
            secondary_style: secondary.map(|s| s.style).unwrap_or(0),
        };

        Participant {
            team: TeamSide::from_team_id(dto.team_id),
            position,
            name,
            puuid: non_empty(&dto.puuid),
            champion: dto.champion_name.clone(),
            win: dto.win,
            stats: BoxScore {
                kills: dto.kills,
                deaths: dto.deaths,
                assists: dto.assists,
                gold_earned: dto.gold_earned,
                damage_to_champions: dto.total_damage_dealt_to_champions,
                vision_score: dto.vision_score,
                lane_minions: dto.total_minions_killed,
                neutral_minions: dto.neutral_minions_killed,
            },
            spells: [dto.summoner1_id, dto.summoner2_id],
            perks,
        }
    }
}

impl From<&ChampSelectMemberDto> for Participant {
    fn from(member: &ChampSelectMemberDto) -> Self {
        let spell = |id: u64| u32::try_from(id).unwrap_or(0);
        Participant {
            team: if member.team == 1 { TeamSide::Blue } else { TeamSide::Red },
            position: non_empty(&member.assigned_position),
            name: non_empty(&member.game_name).unwrap_or_else(|| format!("Cell {}", member.cell_id)),
            puuid: non_empty(&member.puuid),
            champion: member.champion_id.to_string(),
            win: false,
            stats: BoxScore::default(),
            spells: [spell(member.spell1_id), spell(member.spell2_id)],
            perks: PerkSelection::default(),
        }
    }
}

/// Both sides of a champion select lobby as participants without counters.
pub fn lobby_participants(session: &ChampSelectSessionDto) -> Vec<Participant> {
    session
        .my_team
        .iter()
        .chain(session.their_team.iter())
        .map(Participant::from)
        .collect()
}

/// A player from one live roster poll. No identity carries over between polls.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveParticipant {
    pub team: TeamSide,
    pub name: String,
    /// In-game name without the tag, when the feed reports one.
    pub alternate_name: Option<String>,
    /// Full "Name#TAG" identity, when the feed reports one.
    pub riot_id: Option<String>,
    pub puuid: Option<String>,
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub creep_score: u32,
    pub level: u32,
    pub is_dead: bool,
    pub respawn_timer: f64,
    pub current_gold: Option<f64>,
    pub raw_items: Vec<RawItem>,
}

impl From<&LivePlayerDto> for LiveParticipant {
    fn from(dto: &LivePlayerDto) -> Self {
        let riot_id = non_empty(&dto.riot_id);
        let name = non_empty(&dto.summoner_name)
            .or_else(|| riot_id.clone())
            .unwrap_or_default();

        LiveParticipant {
            team: TeamSide::from_live_team(&dto.team),
            name,
            alternate_name: non_empty(&dto.riot_id_game_name),
            riot_id,
            puuid: non_empty(&dto.puuid),
            champion: dto.champion_name.clone(),
            kills: dto.scores.kills,
            deaths: dto.scores.deaths,
            assists: dto.scores.assists,
            creep_score: dto.scores.creep_score,
            level: dto.level,
            is_dead: dto.is_dead,
            respawn_timer: dto.respawn_timer,
            current_gold: dto.current_gold,
            raw_items: dto.items.clone(),
        }
    }
}
