//! Canonical role assignment for one team.
//!
//! Declared positions win when present. Without them the summoner spell kit
//! decides the order, which is a best-effort guess: an unusual kit with no
//! declared position can land in the wrong slot.

use super::model::{Participant, TeamSide};
use super::normalize::normalize_str;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Bottom,
    Utility,
}

impl Role {
    pub const CANONICAL: [Role; 5] = [Role::Top, Role::Jungle, Role::Middle, Role::Bottom, Role::Utility];

    pub fn rank(self) -> u8 {
        match self {
            Role::Top => 1,
            Role::Jungle => 2,
            Role::Middle => 3,
            Role::Bottom => 4,
            Role::Utility => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Middle => "MIDDLE",
            Role::Bottom => "BOTTOM",
            Role::Utility => "UTILITY",
        }
    }

    /// Maps a declared position (any case, punctuation ignored) to a role.
    pub fn from_declared(raw: &str) -> Option<Role> {
        match normalize_str(raw).as_str() {
            "top" => Some(Role::Top),
            "jungle" => Some(Role::Jungle),
            "middle" | "mid" => Some(Role::Middle),
            "bottom" | "bot" | "adc" | "carry" => Some(Role::Bottom),
            "utility" | "support" => Some(Role::Utility),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const SPELL_CLEANSE: u32 = 1;
pub const SPELL_EXHAUST: u32 = 3;
pub const SPELL_FLASH: u32 = 4;
pub const SPELL_GHOST: u32 = 6;
pub const SPELL_HEAL: u32 = 7;
pub const SPELL_SMITE: u32 = 11;
pub const SPELL_TELEPORT: u32 = 12;
pub const SPELL_IGNITE: u32 = 14;
pub const SPELL_BARRIER: u32 = 21;

/// Sorts after every canonical rank.
const UNKNOWN_RANK: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affinity {
    JungleClear,
    Sustain,
    CrowdControl,
    GlobalMobility,
    SingleTargetDamage,
}

const SPELL_AFFINITIES: &[(u32, Affinity)] = &[
    (SPELL_SMITE, Affinity::JungleClear),
    (SPELL_HEAL, Affinity::Sustain),
    (SPELL_EXHAUST, Affinity::CrowdControl),
    (SPELL_TELEPORT, Affinity::GlobalMobility),
    (SPELL_IGNITE, Affinity::SingleTargetDamage),
];

/// Checked in this order; the first affinity present in the kit decides.
const AFFINITY_RANKS: &[(Affinity, u8)] = &[
    (Affinity::JungleClear, 2),
    (Affinity::Sustain, 4),
    (Affinity::CrowdControl, 5),
    (Affinity::GlobalMobility, 1),
    (Affinity::SingleTargetDamage, 3),
];

// Disjoint sets used to split a shared bottom lane.
const SUPPORT_LEANING: &[u32] = &[SPELL_EXHAUST, SPELL_IGNITE];
const DAMAGE_LEANING: &[u32] = &[SPELL_HEAL, SPELL_CLEANSE, SPELL_BARRIER, SPELL_GHOST];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lean {
    Support,
    Damage,
    Neutral,
}

fn kit_has(spells: &[u32; 2], affinity: Affinity) -> bool {
    spells.iter().any(|spell| {
        SPELL_AFFINITIES
            .iter()
            .any(|(id, tagged)| id == spell && *tagged == affinity)
    })
}

fn lean(spells: &[u32; 2]) -> Lean {
    let support = spells.iter().any(|s| SUPPORT_LEANING.contains(s));
    let damage = spells.iter().any(|s| DAMAGE_LEANING.contains(s));
    match (support, damage) {
        (true, false) => Lean::Support,
        (false, true) => Lean::Damage,
        _ => Lean::Neutral,
    }
}

fn declared_role(participant: &Participant) -> Option<Role> {
    participant.position.as_deref().and_then(Role::from_declared)
}

/// Heuristic sort key: 1 (TOP) through 5 (UTILITY), 6 when nothing is known.
pub fn sort_key(participant: &Participant) -> u8 {
    if let Some(role) = declared_role(participant) {
        // Feeds often label both bottom laners BOTTOM; exhaust marks the support.
        if role == Role::Bottom && kit_has(&participant.spells, Affinity::CrowdControl) {
            return Role::Utility.rank();
        }
        return role.rank();
    }

    AFFINITY_RANKS
        .iter()
        .find(|(affinity, _)| kit_has(&participant.spells, *affinity))
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_RANK)
}

/// Within each run of equal keys, damage-leaning kits go ahead of
/// support-leaning ones. Neutral kits keep their positions.
fn apply_lean_tiebreak(ordered: &mut [(u8, &Participant)]) {
    let mut start = 0;
    while start < ordered.len() {
        let key = ordered[start].0;
        let end = start + ordered[start..].iter().take_while(|(k, _)| *k == key).count();
        let run = &mut ordered[start..end];

        let leaning: Vec<usize> = (0..run.len())
            .filter(|i| lean(&run[*i].1.spells) != Lean::Neutral)
            .collect();
        let mut members: Vec<_> = leaning.iter().map(|i| run[*i]).collect();
        members.sort_by_key(|(_, p)| lean(&p.spells) == Lean::Support);
        for (i, member) in leaning.into_iter().zip(members) {
            run[i] = member;
        }

        start = end;
    }
}

pub type RoleMap<'a> = BTreeMap<Role, &'a Participant>;

/// Assigns up to five participants of one team to roles.
///
/// Participants whose declared role is still free take it directly; the
/// rest fill the remaining slots of `role_order` in sort-key order. Slots
/// stay empty when the team has fewer participants than roles.
pub fn assign<'a, I>(participants: I, role_order: &[Role]) -> RoleMap<'a>
where
    I: IntoIterator<Item = &'a Participant>,
{
    let mut ordered: Vec<(u8, &'a Participant)> = participants
        .into_iter()
        .map(|p| (sort_key(p), p))
        .collect();
    ordered.sort_by_key(|(key, _)| *key);
    apply_lean_tiebreak(&mut ordered);

    let mut roles = RoleMap::new();
    let mut leftovers = Vec::new();

    for (_, participant) in ordered {
        match declared_role(participant) {
            Some(role) if role_order.contains(&role) && !roles.contains_key(&role) => {
                roles.insert(role, participant);
            }
            _ => leftovers.push(participant),
        }
    }

    let mut leftovers = leftovers.into_iter();
    for role in role_order {
        if roles.contains_key(role) {
            continue;
        }
        match leftovers.next() {
            Some(participant) => {
                roles.insert(*role, participant);
            }
            None => break,
        }
    }

    roles
}

/// Splits a full match by team and assigns each side in canonical order.
pub fn assign_by_team(participants: &[Participant]) -> BTreeMap<TeamSide, RoleMap<'_>> {
    [TeamSide::Blue, TeamSide::Red]
        .into_iter()
        .filter_map(|side| {
            let team: Vec<&Participant> = participants.iter().filter(|p| p.team == side).collect();
            if team.is_empty() {
                None
            } else {
                Some((side, assign(team, &Role::CANONICAL)))
            }
        })
        .collect()
}

/// Reverse lookup by identity, not equality.
pub fn role_of(roles: &RoleMap<'_>, participant: &Participant) -> Option<Role> {
    roles
        .iter()
        .find(|(_, assigned)| std::ptr::eq(**assigned, participant))
        .map(|(role, _)| *role)
}
