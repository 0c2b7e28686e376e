//! Domain models for the Early Bird backend.

pub mod leaderboard;
pub mod registration;

pub use leaderboard::{LeaderboardEntry, LeaderboardResponse, ReferralStatsResponse};
pub use registration::{Registration, RegisterRequest, RegisterResponse, StatusCategory};
