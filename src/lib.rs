//! Participant reconciliation and performance ranking for League of Legends
//! matches: canonical roles per team, weighted scores and ranks across all
//! ten players, live-feed seat resolution, and batched rune metadata lookup.

pub mod analysis;
pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod telemetry;
