//! Moondust Leaderboard — read-side ranking and the weekly champion.
//!
//! Rank is a count, not a dense sequence: an actor's rank is one plus the
//! number of actors with strictly greater totals, so ties share a rank.
//! Champion selection runs at most once per cycle and never awards points;
//! those were credited at approval time.

pub mod champion;
pub mod queries;

pub use champion::select_champion;
pub use queries::{
    CycleStatusView, FullStatsView, LeaderboardView, ModerationStatusView, PersonalStats,
    champion_history, cycle_status, full_stats, leaderboard, moderation_status, personal_stats,
    rank_for_points,
};
