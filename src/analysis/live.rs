//! Finds the live roster entry that corresponds to a historical participant.
//!
//! The two feeds share no key at render time, so the match is a point
//! total over champion and name evidence. A miss is a normal outcome: the
//! caller shows an empty seat.

use super::model::{LiveParticipant, Participant};
use super::normalize::{normalize, normalize_str};
use crate::api::models::{ActivePlayerDto, LiveSnapshotDto, RawItem};
use tracing::trace;

pub const CHAMPION_EXACT_POINTS: i32 = 10;
pub const CHAMPION_PARTIAL_POINTS: i32 = 5;
pub const CHAMPION_ALIAS_POINTS: i32 = 10;
pub const NAME_EXACT_POINTS: i32 = 20;
pub const RIOT_ID_CONTAINS_POINTS: i32 = 15;
pub const NAME_CONTAINS_POINTS: i32 = 10;
pub const IDENTIFIER_POINTS: i32 = 20;

/// A lone exact champion match is just enough.
pub const ACCEPT_THRESHOLD: i32 = 10;

/// A candidate name must be longer than this to count as contained in the target.
const MIN_CONTAINED_NAME_CHARS: usize = 3;

pub const ITEM_SLOTS: usize = 7;

/// Internal and display names of the same champion, normalized.
const CHAMPION_ALIASES: &[(&str, &str)] = &[("monkeyking", "wukong")];

/// One roster poll: every player plus the local player's detailed record.
#[derive(Debug, Clone, Default)]
pub struct LiveRoster {
    pub players: Vec<LiveParticipant>,
    pub active_player: Option<ActivePlayerDto>,
}

impl From<&LiveSnapshotDto> for LiveRoster {
    fn from(snapshot: &LiveSnapshotDto) -> Self {
        LiveRoster {
            players: snapshot.all_players.iter().map(LiveParticipant::from).collect(),
            active_player: snapshot.active_player.clone(),
        }
    }
}

/// A resolved seat with its live fields reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSeat {
    pub player: LiveParticipant,
    pub confidence: i32,
    pub items: [Option<u32>; ITEM_SLOTS],
    pub current_gold: Option<f64>,
}

struct MatchCandidateScore<'a> {
    candidate: &'a LiveParticipant,
    confidence: i32,
}

struct TargetKey {
    name: String,
    champion: String,
    puuid: Option<String>,
}

fn champion_points(target: &str, candidate: &str) -> i32 {
    if target.is_empty() || candidate.is_empty() {
        return 0;
    }
    if target == candidate {
        return CHAMPION_EXACT_POINTS;
    }
    let aliased = CHAMPION_ALIASES
        .iter()
        .any(|(a, b)| (target == *a && candidate == *b) || (target == *b && candidate == *a));
    if aliased {
        return CHAMPION_ALIAS_POINTS;
    }
    if target.contains(candidate) || candidate.contains(target) {
        return CHAMPION_PARTIAL_POINTS;
    }
    0
}

fn name_points(target: &str, candidate: &LiveParticipant) -> i32 {
    if target.is_empty() {
        return 0;
    }

    let name = normalize_str(&candidate.name);
    let alternate = normalize(candidate.alternate_name.as_deref());
    let riot_id = normalize(candidate.riot_id.as_deref());

    if name == target || alternate == target {
        return NAME_EXACT_POINTS;
    }
    if !riot_id.is_empty() && riot_id.contains(target) {
        return RIOT_ID_CONTAINS_POINTS;
    }
    let contained = [&name, &alternate]
        .iter()
        .any(|n| n.chars().count() > MIN_CONTAINED_NAME_CHARS && target.contains(n.as_str()));
    if contained {
        return NAME_CONTAINS_POINTS;
    }
    0
}

fn identifier_points(target: Option<&str>, candidate: Option<&str>) -> i32 {
    match (target, candidate) {
        (Some(a), Some(b)) if a == b => IDENTIFIER_POINTS,
        _ => 0,
    }
}

pub struct LiveMatchResolver;

impl LiveMatchResolver {
    fn key(target: &Participant) -> TargetKey {
        TargetKey {
            name: normalize_str(&target.name),
            champion: normalize_str(&target.champion),
            puuid: target.puuid.clone(),
        }
    }

    fn score(key: &TargetKey, candidate: &LiveParticipant) -> i32 {
        champion_points(&key.champion, &normalize_str(&candidate.champion))
            + name_points(&key.name, candidate)
            + identifier_points(key.puuid.as_deref(), candidate.puuid.as_deref())
    }

    /// Raw confidence points for one pairing.
    pub fn confidence(target: &Participant, candidate: &LiveParticipant) -> i32 {
        Self::score(&Self::key(target), candidate)
    }

    /// Best candidate scoring at least [`ACCEPT_THRESHOLD`]; the first one wins a tie.
    pub fn best_match<'a>(target: &Participant, roster: &'a [LiveParticipant]) -> Option<(&'a LiveParticipant, i32)> {
        let key = Self::key(target);

        let mut best: Option<MatchCandidateScore<'a>> = None;
        for candidate in roster {
            let confidence = Self::score(&key, candidate);
            if best.as_ref().map_or(true, |b| confidence > b.confidence) {
                best = Some(MatchCandidateScore { candidate, confidence });
            }
        }

        match best {
            Some(b) if b.confidence >= ACCEPT_THRESHOLD => Some((b.candidate, b.confidence)),
            Some(b) => {
                trace!(player = %target.name, best = b.confidence, "no live candidate cleared the threshold");
                None
            }
            None => None,
        }
    }

    pub fn resolve<'a>(target: &Participant, roster: &'a [LiveParticipant]) -> Option<&'a LiveParticipant> {
        Self::best_match(target, roster).map(|(candidate, _)| candidate)
    }

    /// Resolves and reconciles items and gold for display.
    pub fn resolve_seat(target: &Participant, roster: &LiveRoster) -> Option<LiveSeat> {
        let (candidate, confidence) = Self::best_match(target, &roster.players)?;

        let current_gold = roster
            .active_player
            .as_ref()
            .and_then(|active| active_player_gold(active, candidate))
            .or(candidate.current_gold);

        Some(LiveSeat {
            player: candidate.clone(),
            confidence,
            items: reconcile_items(&candidate.raw_items),
            current_gold,
        })
    }
}

/// The active player record is more precise than the roster, but only for
/// the player it belongs to.
fn active_player_gold(active: &ActivePlayerDto, candidate: &LiveParticipant) -> Option<f64> {
    let active_names: Vec<String> = [&active.summoner_name, &active.riot_id_game_name, &active.riot_id]
        .into_iter()
        .map(|n| normalize_str(n))
        .filter(|n| !n.is_empty())
        .collect();

    let candidate_names = [
        Some(candidate.name.as_str()),
        candidate.alternate_name.as_deref(),
        candidate.riot_id.as_deref(),
    ];

    let same_player = candidate_names
        .into_iter()
        .map(normalize)
        .filter(|n| !n.is_empty())
        .any(|n| active_names.contains(&n));

    same_player.then_some(active.current_gold)
}

/// Lays live items into a fixed seven-slot bar. Items with a usable slot
/// index go there; the rest fill the first free slot left to right.
/// Malformed entries are dropped.
pub fn reconcile_items(raw: &[RawItem]) -> [Option<u32>; ITEM_SLOTS] {
    let mut slots = [None; ITEM_SLOTS];
    let mut unplaced = Vec::new();

    for item in raw {
        match item {
            RawItem::Slotted { item_id, slot } => {
                let index = slot
                    .and_then(|s| usize::try_from(s).ok())
                    .filter(|i| *i < ITEM_SLOTS && slots[*i].is_none());
                match index {
                    Some(i) => slots[i] = Some(*item_id),
                    None => unplaced.push(*item_id),
                }
            }
            RawItem::Bare(item_id) => unplaced.push(*item_id),
            RawItem::Malformed(_) => {}
        }
    }

    for item_id in unplaced {
        if let Some(free) = slots.iter_mut().find(|s| s.is_none()) {
            *free = Some(item_id);
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::{BoxScore, PerkSelection, TeamSide};
    use serde_json::json;

    fn target(name: &str, champion: &str) -> Participant {
        Participant {
            team: TeamSide::Blue,
            position: Some("MIDDLE".to_string()),
            name: name.to_string(),
            puuid: None,
            champion: champion.to_string(),
            win: false,
            stats: BoxScore::default(),
            spells: [4, 14],
            perks: PerkSelection::default(),
        }
    }

    fn live(name: &str, champion: &str) -> LiveParticipant {
        LiveParticipant {
            team: TeamSide::Blue,
            name: name.to_string(),
            alternate_name: None,
            riot_id: None,
            puuid: None,
            champion: champion.to_string(),
            kills: 0,
            deaths: 0,
            assists: 0,
            creep_score: 0,
            level: 1,
            is_dead: false,
            respawn_timer: 0.0,
            current_gold: None,
            raw_items: Vec::new(),
        }
    }

    #[test]
    fn exact_name_and_champion_resolves_confidently() {
        let roster = vec![live("Someone", "Zed"), live("faker", "Ahri")];

        let (found, confidence) = LiveMatchResolver::best_match(&target("Faker", "Ahri"), &roster).unwrap();

        assert_eq!(found.name, "faker");
        assert!(confidence >= 30);
    }

    #[test]
    fn champion_only_match_is_just_accepted() {
        let roster = vec![live("Stranger", "Ahri")];
        let faker = target("Faker", "Ahri");

        assert_eq!(LiveMatchResolver::confidence(&faker, &roster[0]), ACCEPT_THRESHOLD);
        assert_eq!(LiveMatchResolver::resolve(&faker, &roster).map(|p| p.name.as_str()), Some("Stranger"));
    }

    #[test]
    fn partial_champion_match_alone_is_rejected() {
        let roster = vec![live("Stranger", "Nunu & Willump")];
        let target = target("Faker", "Nunu");

        assert_eq!(LiveMatchResolver::confidence(&target, &roster[0]), CHAMPION_PARTIAL_POINTS);
        assert!(LiveMatchResolver::resolve(&target, &roster).is_none());
    }

    #[test]
    fn empty_roster_is_no_match() {
        assert!(LiveMatchResolver::resolve(&target("Faker", "Ahri"), &[]).is_none());
    }

    #[test]
    fn champion_alias_pair_counts_as_a_match() {
        let roster = vec![live("Stranger", "Wukong")];
        assert_eq!(
            LiveMatchResolver::confidence(&target("Faker", "MonkeyKing"), &roster[0]),
            CHAMPION_ALIAS_POINTS
        );
    }

    #[test]
    fn riot_id_containing_the_target_name_scores() {
        let mut candidate = live("Hide on bush", "Zed");
        candidate.riot_id = Some("Faker#KR1".to_string());

        assert_eq!(
            LiveMatchResolver::confidence(&target("Faker", "Ahri"), &candidate),
            RIOT_ID_CONTAINS_POINTS
        );
    }

    #[test]
    fn alternate_name_counts_as_an_exact_name() {
        let mut candidate = live("Transient Name", "Ahri");
        candidate.alternate_name = Some("Faker".to_string());

        assert_eq!(
            LiveMatchResolver::confidence(&target("Faker", "Ahri"), &candidate),
            CHAMPION_EXACT_POINTS + NAME_EXACT_POINTS
        );
    }

    #[test]
    fn short_candidate_names_are_not_treated_as_contained() {
        let target = target("FakerFan", "Ahri");

        assert_eq!(LiveMatchResolver::confidence(&target, &live("Fak", "Zed")), 0);
        assert_eq!(LiveMatchResolver::confidence(&target, &live("Faker", "Zed")), NAME_CONTAINS_POINTS);
    }

    #[test]
    fn matching_puuid_adds_identifier_points() {
        let mut with_id = target("Faker", "Ahri");
        with_id.puuid = Some("puuid-1".to_string());
        let mut candidate = live("Unrelated", "Zed");
        candidate.puuid = Some("puuid-1".to_string());

        assert_eq!(LiveMatchResolver::confidence(&with_id, &candidate), IDENTIFIER_POINTS);
    }

    #[test]
    fn first_of_equal_candidates_wins() {
        let roster = vec![live("First", "Ahri"), live("Second", "Ahri")];
        let found = LiveMatchResolver::resolve(&target("Faker", "Ahri"), &roster).unwrap();
        assert_eq!(found.name, "First");
    }

    #[test]
    fn items_honour_slots_then_fill_left_to_right() {
        let raw: Vec<RawItem> = serde_json::from_value(json!([
            3006,
            { "itemID": 3031, "slot": 0 },
            { "itemID": 1055 },
            { "itemID": 3340, "slot": 6 },
            { "itemID": 3046, "slot": 42 },
            { "bogus": true }
        ]))
        .unwrap();

        let items = reconcile_items(&raw);

        assert_eq!(
            items,
            [Some(3031), Some(3006), Some(1055), Some(3046), None, None, Some(3340)]
        );
    }

    #[test]
    fn non_integer_slots_still_place_the_item() {
        let raw: Vec<RawItem> = serde_json::from_value(json!([
            { "itemID": 3031, "slot": "2" },
            { "itemID": 3006, "slot": 1.5 },
            { "itemID": 1055, "slot": null }
        ]))
        .unwrap();

        assert!(raw.iter().all(|item| matches!(item, RawItem::Slotted { slot: None, .. })));
        assert_eq!(
            reconcile_items(&raw),
            [Some(3031), Some(3006), Some(1055), None, None, None, None]
        );
    }

    #[test]
    fn duplicate_slot_falls_back_to_first_free_slot() {
        let raw = vec![
            RawItem::Slotted { item_id: 1, slot: Some(1) },
            RawItem::Slotted { item_id: 2, slot: Some(1) },
        ];

        assert_eq!(reconcile_items(&raw), [Some(2), Some(1), None, None, None, None, None]);
    }

    #[test]
    fn active_player_gold_is_preferred_for_that_player() {
        let mut me = live("Faker", "Ahri");
        me.current_gold = Some(100.0);
        let mut other = live("Chovy", "Azir");
        other.current_gold = Some(250.0);

        let roster = LiveRoster {
            players: vec![me, other],
            active_player: Some(ActivePlayerDto {
                riot_id: "Faker#KR1".to_string(),
                riot_id_game_name: "Faker".to_string(),
                current_gold: 1234.5,
                ..Default::default()
            }),
        };

        let mine = LiveMatchResolver::resolve_seat(&target("Faker", "Ahri"), &roster).unwrap();
        let theirs = LiveMatchResolver::resolve_seat(&target("Chovy", "Azir"), &roster).unwrap();

        assert_eq!(mine.current_gold, Some(1234.5));
        assert_eq!(theirs.current_gold, Some(250.0));
    }

    #[test]
    fn roster_is_built_from_a_snapshot_document() {
        let snapshot: LiveSnapshotDto = serde_json::from_value(json!({
            "activePlayer": { "riotIdGameName": "Faker", "currentGold": 512.0 },
            "allPlayers": [
                {
                    "championName": "Ahri",
                    "riotId": "Faker#KR1",
                    "riotIdGameName": "Faker",
                    "summonerName": "Faker#KR1",
                    "team": "ORDER",
                    "level": 9,
                    "scores": { "kills": 3, "deaths": 1, "assists": 2, "creepScore": 88 },
                    "items": [{ "itemID": 6655, "slot": 0 }]
                }
            ],
            "gameData": { "gameTime": 840.0 }
        }))
        .unwrap();

        let roster = LiveRoster::from(&snapshot);
        let seat = LiveMatchResolver::resolve_seat(&target("Faker", "Ahri"), &roster).unwrap();

        assert_eq!(seat.player.team, TeamSide::Blue);
        assert_eq!(seat.player.creep_score, 88);
        assert_eq!(seat.items[0], Some(6655));
        assert_eq!(seat.current_gold, Some(512.0));
        assert!(seat.confidence >= CHAMPION_EXACT_POINTS + NAME_EXACT_POINTS);
    }
}
