use super::model::{Participant, TeamSide};
use std::collections::{BTreeMap, HashMap};

// Component weights; together they make up the 100-point base.
pub const WEIGHT_DAMAGE_SHARE: f64 = 26.0;
pub const WEIGHT_KILL_PARTICIPATION: f64 = 21.0;
pub const WEIGHT_KDA: f64 = 18.0;
pub const WEIGHT_GOLD_SHARE: f64 = 13.0;
pub const WEIGHT_FARM: f64 = 12.0;
pub const WEIGHT_VISION: f64 = 10.0;

pub const VICTORY_BONUS: f64 = 10.0;
pub const MAX_TOTAL: f64 = 120.0;

// Points where a component saturates at its full weight.
const DOMINANT_DAMAGE_SHARE: f64 = 0.35;
const DOMINANT_GOLD_SHARE: f64 = 0.28;
const KDA_CAP: f64 = 6.0;
const FARM_BASELINE_PER_MIN: f64 = 8.0;
const VISION_BASELINE_PER_MIN: f64 = 2.0;

const SHORT_GAME_SECS: u64 = 15 * 60;

/// Position of a participant in the collection handed to the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantKey(pub usize);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub damage_share: f64,
    pub kill_participation: f64,
    pub kda: f64,
    pub gold_share: f64,
    pub farm: f64,
    pub vision: f64,
    pub victory_bonus: f64,
    /// Signed; negative values reward.
    pub penalty: f64,
    pub total: f64,
    pub applied_rules: Vec<&'static str>,
}

impl ScoreBreakdown {
    pub fn weighted_sum(&self) -> f64 {
        self.damage_share + self.kill_participation + self.kda + self.gold_share + self.farm + self.vision
    }
}

/// A small signed correction applied on top of the weighted components.
/// Positive points are subtracted from the total.
pub struct AdjustmentRule {
    pub name: &'static str,
    pub points: f64,
    applies: fn(&Participant, u64) -> bool,
}

impl AdjustmentRule {
    pub fn applies(&self, participant: &Participant, duration_secs: u64) -> bool {
        (self.applies)(participant, duration_secs)
    }
}

fn is_deathless(participant: &Participant, _duration_secs: u64) -> bool {
    participant.stats.deaths == 0 && participant.stats.takedowns() > 0
}

fn is_short_game(_participant: &Participant, duration_secs: u64) -> bool {
    duration_secs < SHORT_GAME_SECS
}

pub const ADJUSTMENT_RULES: &[AdjustmentRule] = &[
    AdjustmentRule {
        name: "deathless",
        points: -3.0,
        applies: is_deathless,
    },
    AdjustmentRule {
        name: "short_game",
        points: 5.0,
        applies: is_short_game,
    },
];

#[derive(Debug, Default, Clone, Copy)]
struct TeamTotals {
    kills: u64,
    damage: u64,
    gold: u64,
}

fn team_totals(participants: &[Participant]) -> HashMap<TeamSide, TeamTotals> {
    let mut totals: HashMap<TeamSide, TeamTotals> = HashMap::new();
    for p in participants {
        let entry = totals.entry(p.team).or_default();
        entry.kills += u64::from(p.stats.kills);
        entry.damage += u64::from(p.stats.damage_to_champions);
        entry.gold += u64::from(p.stats.gold_earned);
    }
    totals
}

/// `part / whole`, or 0 when there is nothing to divide by.
fn share(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn weighted(value: f64, saturation: f64, weight: f64) -> f64 {
    (value / saturation).clamp(0.0, 1.0) * weight
}

pub struct PerformanceScorer;

impl PerformanceScorer {
    /// Scores every participant of one match. Team totals are gathered first
    /// so a team with no kills, damage or gold scores 0 on that component.
    pub fn score(participants: &[Participant], duration_secs: u64) -> BTreeMap<ParticipantKey, ScoreBreakdown> {
        let totals = team_totals(participants);
        let minutes = (duration_secs as f64 / 60.0).max(1.0);

        participants
            .iter()
            .enumerate()
            .map(|(idx, p)| {
                let team = totals.get(&p.team).copied().unwrap_or_default();
                (ParticipantKey(idx), Self::score_one(p, team, minutes, duration_secs))
            })
            .collect()
    }

    fn score_one(p: &Participant, team: TeamTotals, minutes: f64, duration_secs: u64) -> ScoreBreakdown {
        let stats = &p.stats;

        let damage_share = weighted(
            share(u64::from(stats.damage_to_champions), team.damage),
            DOMINANT_DAMAGE_SHARE,
            WEIGHT_DAMAGE_SHARE,
        );
        let kill_participation = weighted(
            share(u64::from(stats.takedowns()), team.kills),
            1.0,
            WEIGHT_KILL_PARTICIPATION,
        );
        let kda_ratio = stats.takedowns() as f64 / stats.deaths.max(1) as f64;
        let kda = weighted(kda_ratio, KDA_CAP, WEIGHT_KDA);
        let gold_share = weighted(
            share(u64::from(stats.gold_earned), team.gold),
            DOMINANT_GOLD_SHARE,
            WEIGHT_GOLD_SHARE,
        );
        let farm = weighted(stats.creep_score() as f64 / minutes, FARM_BASELINE_PER_MIN, WEIGHT_FARM);
        let vision = weighted(stats.vision_score as f64 / minutes, VISION_BASELINE_PER_MIN, WEIGHT_VISION);

        let victory_bonus = if p.win { VICTORY_BONUS } else { 0.0 };

        let mut penalty = 0.0;
        let mut applied_rules = Vec::new();
        for rule in ADJUSTMENT_RULES {
            if rule.applies(p, duration_secs) {
                penalty += rule.points;
                applied_rules.push(rule.name);
            }
        }

        let mut breakdown = ScoreBreakdown {
            damage_share,
            kill_participation,
            kda,
            gold_share,
            farm,
            vision,
            victory_bonus,
            penalty,
            total: 0.0,
            applied_rules,
        };
        breakdown.total = (breakdown.weighted_sum() + victory_bonus - penalty).clamp(0.0, MAX_TOTAL);
        breakdown
    }

    /// 1-based rank by total, best first. Equal totals keep collection order.
    pub fn rank(scores: &BTreeMap<ParticipantKey, ScoreBreakdown>) -> BTreeMap<ParticipantKey, u32> {
        let mut ordered: Vec<(&ParticipantKey, &ScoreBreakdown)> = scores.iter().collect();
        ordered.sort_by(|a, b| b.1.total.partial_cmp(&a.1.total).unwrap_or(std::cmp::Ordering::Equal));

        ordered
            .into_iter()
            .enumerate()
            .map(|(idx, (key, _))| (*key, idx as u32 + 1))
            .collect()
    }

    pub fn score_and_rank(
        participants: &[Participant],
        duration_secs: u64,
    ) -> (BTreeMap<ParticipantKey, ScoreBreakdown>, BTreeMap<ParticipantKey, u32>) {
        let scores = Self::score(participants, duration_secs);
        let ranks = Self::rank(&scores);
        (scores, ranks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::{BoxScore, PerkSelection};

    const THIRTY_MINUTES: u64 = 30 * 60;

    fn player(team: TeamSide, win: bool, stats: BoxScore) -> Participant {
        Participant {
            team,
            position: None,
            name: "player".to_string(),
            puuid: None,
            champion: "Champ".to_string(),
            win,
            stats,
            spells: [4, 14],
            perks: PerkSelection::default(),
        }
    }

    fn line(kills: u32, deaths: u32, assists: u32, gold: u32, damage: u32, vision: u32, cs: u32) -> BoxScore {
        BoxScore {
            kills,
            deaths,
            assists,
            gold_earned: gold,
            damage_to_champions: damage,
            vision_score: vision,
            lane_minions: cs,
            neutral_minions: 0,
        }
    }

    fn sample_match() -> Vec<Participant> {
        vec![
            player(TeamSide::Blue, true, line(8, 2, 6, 13000, 24000, 20, 240)),
            player(TeamSide::Blue, true, line(4, 3, 10, 10500, 12000, 35, 40)),
            player(TeamSide::Blue, true, line(6, 1, 5, 12000, 21000, 18, 220)),
            player(TeamSide::Blue, true, line(7, 4, 4, 13500, 26000, 15, 260)),
            player(TeamSide::Blue, true, line(1, 5, 15, 8000, 7000, 80, 30)),
            player(TeamSide::Red, false, line(3, 5, 4, 10000, 15000, 17, 210)),
            player(TeamSide::Red, false, line(2, 6, 6, 9000, 9000, 28, 50)),
            player(TeamSide::Red, false, line(4, 5, 3, 10500, 18000, 14, 200)),
            player(TeamSide::Red, false, line(3, 6, 4, 11000, 17000, 12, 230)),
            player(TeamSide::Red, false, line(0, 4, 8, 7000, 5000, 60, 25)),
        ]
    }

    #[test]
    fn weighted_components_never_exceed_the_base() {
        // One player with every counter of their team and absurd rates.
        let participants = vec![
            player(TeamSide::Blue, true, line(30, 0, 0, 40000, 90000, 400, 900)),
            player(TeamSide::Blue, true, line(0, 0, 0, 0, 0, 0, 0)),
        ];

        let scores = PerformanceScorer::score(&participants, 20 * 60);
        let carry = &scores[&ParticipantKey(0)];

        assert!(carry.weighted_sum() <= 100.0 + 1e-9);
        assert!(carry.total <= MAX_TOTAL);
        assert!((carry.damage_share - WEIGHT_DAMAGE_SHARE).abs() < 1e-9);
        assert!((carry.kda - WEIGHT_KDA).abs() < 1e-9);
        assert_eq!(carry.applied_rules, vec!["deathless"]);
    }

    #[test]
    fn total_is_components_plus_bonus_minus_penalty() {
        for breakdown in PerformanceScorer::score(&sample_match(), THIRTY_MINUTES).values() {
            let expected = breakdown.weighted_sum() + breakdown.victory_bonus - breakdown.penalty;
            assert!((breakdown.total - expected.clamp(0.0, MAX_TOTAL)).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_team_totals_score_zero_instead_of_nan() {
        let participants = vec![
            player(TeamSide::Red, false, line(0, 3, 0, 0, 0, 5, 10)),
            player(TeamSide::Red, false, line(0, 2, 0, 0, 0, 5, 10)),
            player(TeamSide::Blue, true, line(5, 0, 0, 5000, 4000, 5, 10)),
        ];

        let scores = PerformanceScorer::score(&participants, THIRTY_MINUTES);

        for key in [ParticipantKey(0), ParticipantKey(1)] {
            let breakdown = &scores[&key];
            assert_eq!(breakdown.kill_participation, 0.0);
            assert_eq!(breakdown.damage_share, 0.0);
            assert_eq!(breakdown.gold_share, 0.0);
            assert!(breakdown.total.is_finite());
        }
        assert!(scores[&ParticipantKey(2)].kill_participation > 0.0);
    }

    #[test]
    fn victory_bonus_only_for_the_winning_side() {
        let scores = PerformanceScorer::score(&sample_match(), THIRTY_MINUTES);

        assert_eq!(scores[&ParticipantKey(0)].victory_bonus, VICTORY_BONUS);
        assert_eq!(scores[&ParticipantKey(7)].victory_bonus, 0.0);
    }

    #[test]
    fn short_games_carry_the_short_game_adjustment() {
        let participants = vec![player(TeamSide::Blue, false, line(1, 1, 1, 2000, 1500, 2, 40))];

        let short = PerformanceScorer::score(&participants, 10 * 60);
        let long = PerformanceScorer::score(&participants, THIRTY_MINUTES);

        assert_eq!(short[&ParticipantKey(0)].applied_rules, vec!["short_game"]);
        assert_eq!(short[&ParticipantKey(0)].penalty, 5.0);
        assert!(long[&ParticipantKey(0)].applied_rules.is_empty());
    }

    #[test]
    fn ranks_are_a_permutation_ordered_by_total() {
        let (scores, ranks) = PerformanceScorer::score_and_rank(&sample_match(), THIRTY_MINUTES);

        let mut seen: Vec<u32> = ranks.values().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=10).collect::<Vec<u32>>());

        let best = ranks.iter().find(|(_, rank)| **rank == 1).map(|(key, _)| *key).unwrap();
        let worst = ranks.iter().find(|(_, rank)| **rank == 10).map(|(key, _)| *key).unwrap();
        assert!(scores[&best].total >= scores[&worst].total);
        assert_eq!(scores[&best].victory_bonus, VICTORY_BONUS);
    }

    #[test]
    fn equal_totals_keep_collection_order() {
        let same = line(2, 2, 2, 5000, 5000, 10, 100);
        let participants = vec![
            player(TeamSide::Blue, false, same),
            player(TeamSide::Blue, false, same),
            player(TeamSide::Blue, false, same),
        ];

        let (_, ranks) = PerformanceScorer::score_and_rank(&participants, THIRTY_MINUTES);

        assert_eq!(ranks[&ParticipantKey(0)], 1);
        assert_eq!(ranks[&ParticipantKey(1)], 2);
        assert_eq!(ranks[&ParticipantKey(2)], 3);
    }

    #[test]
    fn scoring_is_deterministic() {
        let participants = sample_match();

        let first = PerformanceScorer::score(&participants, THIRTY_MINUTES);
        let second = PerformanceScorer::score(&participants, THIRTY_MINUTES);

        assert_eq!(first, second);
        for (a, b) in first.values().zip(second.values()) {
            assert_eq!(a.total.to_bits(), b.total.to_bits());
        }
    }

    #[test]
    fn zero_duration_does_not_divide_by_zero() {
        let participants = vec![player(TeamSide::Blue, true, line(1, 0, 0, 500, 300, 3, 12))];
        let scores = PerformanceScorer::score(&participants, 0);

        let breakdown = &scores[&ParticipantKey(0)];
        assert!(breakdown.farm.is_finite());
        assert!(breakdown.vision.is_finite());
        assert!(breakdown.total <= MAX_TOTAL);
    }
}
