//! Leaderboard and referral-stats projections.

use serde::Serialize;

use super::registration::Registration;

/// How many referrers the leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 10;

/// One leaderboard row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub referral_count: i64,
    pub city: String,
}

/// Response for the leaderboard endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub success: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Response for the per-user referral-stats endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralStatsResponse {
    pub success: bool,
    pub referral_code: String,
    pub referral_count: i64,
}

/// Ranks registrations into the top-referrer leaderboard.
///
/// Keeps only records with at least one referral, sorts descending by
/// count, and truncates to [`LEADERBOARD_SIZE`] rows.
pub fn rank_referrers(records: Vec<Registration>) -> Vec<LeaderboardEntry> {
    let mut referrers: Vec<Registration> = records
        .into_iter()
        .filter(|r| r.referral_count > 0)
        .collect();
    referrers.sort_by(|a, b| b.referral_count.cmp(&a.referral_count));
    referrers
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|r| LeaderboardEntry {
            name: r.full_name,
            referral_count: r.referral_count,
            city: r.city,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::{StatusCategory, REGISTRATION_SOURCE};
    use chrono::Utc;

    fn record(name: &str, count: i64) -> Registration {
        Registration {
            full_name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            city: "Pune".into(),
            current_status: StatusCategory::Student,
            timestamp: Utc::now(),
            source: REGISTRATION_SOURCE.into(),
            referral_code: format!("{}123", name.to_uppercase()),
            referred_by: None,
            referral_count: count,
        }
    }

    #[test]
    fn test_rank_referrers_filters_zero_counts() {
        let ranked = rank_referrers(vec![record("a", 0), record("b", 2), record("c", 0)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "b");
    }

    #[test]
    fn test_rank_referrers_sorts_descending() {
        let ranked = rank_referrers(vec![record("a", 1), record("b", 5), record("c", 3)]);
        let counts: Vec<i64> = ranked.iter().map(|e| e.referral_count).collect();
        assert_eq!(counts, vec![5, 3, 1]);
    }

    #[test]
    fn test_rank_referrers_truncates_to_ten() {
        let records = (1..=15).map(|i| record(&format!("u{i}"), i)).collect();
        let ranked = rank_referrers(records);
        assert_eq!(ranked.len(), LEADERBOARD_SIZE);
        assert_eq!(ranked[0].referral_count, 15);
        assert_eq!(ranked[9].referral_count, 6);
    }

    #[test]
    fn test_rank_referrers_empty_input() {
        assert!(rank_referrers(Vec::new()).is_empty());
    }
}
