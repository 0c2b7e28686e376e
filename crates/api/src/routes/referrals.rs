//! Referral routes: leaderboard and per-user stats.

use axum::{
    extract::{Path, State},
    Json,
};

use domain::models::leaderboard::rank_referrers;
use domain::models::{LeaderboardResponse, ReferralStatsResponse};

use crate::app::AppState;
use crate::error::ApiError;

/// Get the referral leaderboard (top 10 referrers).
///
/// GET /leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let records = state.store.all_registrations().await?;
    Ok(Json(LeaderboardResponse {
        success: true,
        leaderboard: rank_referrers(records),
    }))
}

/// Get one registrant's referral stats.
///
/// GET /referral-stats/:email
pub async fn referral_stats(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ReferralStatsResponse>, ApiError> {
    let record = state
        .store
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ReferralStatsResponse {
        success: true,
        referral_code: record.referral_code,
        referral_count: record.referral_count,
    }))
}
