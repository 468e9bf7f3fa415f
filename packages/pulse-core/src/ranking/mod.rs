//! Leaderboard ranking and watchlist projection.

mod leaderboard;
mod watchlist;

pub use leaderboard::{rank_leaderboard, LeaderboardEntry};
pub use watchlist::project_watchlist;
