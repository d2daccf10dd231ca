use serde::{Deserialize, Deserializer};

// Account V1 response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub tag_line: String,
}

// Match V5 response
#[derive(Debug, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub game_duration: i64,
    #[serde(default)]
    pub game_creation: i64,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantDto {
    pub puuid: String,
    pub riot_id_game_name: String,
    pub summoner_name: String,
    pub champion_name: String,
    pub team_id: i32,
    pub win: bool,
    pub team_position: String,
    pub individual_position: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub gold_earned: u32,
    pub total_damage_dealt_to_champions: u32,
    pub vision_score: u32,
    pub total_minions_killed: u32,
    pub neutral_minions_killed: u32,
    pub summoner1_id: u32,
    pub summoner2_id: u32,
    pub perks: PerksDto,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PerksDto {
    pub styles: Vec<PerkStyleDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PerkStyleDto {
    /// "primaryStyle" or "subStyle"
    pub description: String,
    pub style: u32,
    pub selections: Vec<PerkSelectionDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PerkSelectionDto {
    pub perk: u32,
}

// Live Client Data API: /liveclientdata/allgamedata
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveSnapshotDto {
    pub active_player: Option<ActivePlayerDto>,
    pub all_players: Vec<LivePlayerDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivePlayerDto {
    pub summoner_name: String,
    pub riot_id: String,
    pub riot_id_game_name: String,
    pub current_gold: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LivePlayerDto {
    pub summoner_name: String,
    pub riot_id: String,
    pub riot_id_game_name: String,
    pub puuid: String,
    pub champion_name: String,
    /// "ORDER" (blue) or "CHAOS" (red)
    pub team: String,
    pub level: u32,
    pub is_dead: bool,
    pub respawn_timer: f64,
    /// Only some feeds report gold per roster entry.
    pub current_gold: Option<f64>,
    pub scores: LiveScoresDto,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LiveScoresDto {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub creep_score: u32,
}

/// An entry of a live player's item list. Feeds disagree on the shape, so
/// every form is accepted here and sorted out during reconciliation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawItem {
    Slotted {
        #[serde(rename = "itemID")]
        item_id: u32,
        #[serde(default, deserialize_with = "lenient_slot")]
        slot: Option<i64>,
    },
    Bare(u32),
    Malformed(serde_json::Value),
}

/// Anything but an integer slot counts as no slot, so the item is still
/// placed in the first free slot.
fn lenient_slot<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_i64))
}

// LCU champion select: /lol-champ-select/v1/session
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampSelectSessionDto {
    pub my_team: Vec<ChampSelectMemberDto>,
    pub their_team: Vec<ChampSelectMemberDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampSelectMemberDto {
    pub cell_id: i64,
    pub champion_id: i64,
    pub assigned_position: String,
    pub spell1_id: u64,
    pub spell2_id: u64,
    pub puuid: String,
    pub game_name: String,
    /// 1 or 2
    pub team: i64,
}

// Data Dragon runesReforged.json
#[derive(Debug, Deserialize, Clone)]
pub struct RuneStyleDto {
    pub id: u32,
    pub icon: String,
    pub name: String,
    #[serde(default)]
    pub slots: Vec<RuneSlotDto>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuneSlotDto {
    #[serde(default)]
    pub runes: Vec<RuneDto>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuneDto {
    pub id: u32,
    pub icon: String,
    pub name: String,
}
