use serde::{Deserialize, Serialize};

/// Contribution counters shown on a profile
///
/// Maintained by the story services; registration starts everything at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub stories_uploaded: i64,
    pub stories_read: i64,
    pub total_listens: i64,
    pub dialects_contributed: i64,
    pub total_points: i64,
    pub leaderboard_rank: Option<i64>,
}
