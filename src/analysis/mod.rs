pub mod live;
pub mod model;
pub mod normalize;
pub mod roles;
pub mod scoring;

pub use live::{LiveMatchResolver, LiveRoster, LiveSeat};
pub use model::{BoxScore, LiveParticipant, Participant, PerkSelection, TeamSide};
pub use roles::{assign, assign_by_team, Role, RoleMap};
pub use scoring::{ParticipantKey, PerformanceScorer, ScoreBreakdown};
