use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sentinel shown where a national percentile could not be resolved.
pub const PERCENTILE_UNAVAILABLE: &str = "N/A";

/// One row of the `sat_scores` reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SatScoreRow {
    pub total_score: i64,
    pub nat_rep_percentile: Option<String>,
    pub user_percentile: Option<String>,
}

/// The rows at a score and at the adjacent scores 100 points above and below.
/// Each slot is `None` when the table has no row for that score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentSatRows {
    pub exact: Option<SatScoreRow>,
    pub higher: Option<SatScoreRow>,
    pub lower: Option<SatScoreRow>,
}

/// One row of the `college_scores` reference table. NULL bands read as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CollegeScoreRow {
    pub college_name: String,
    pub sat_25th_percentile: i64,
    pub sat_50th_percentile: i64,
    pub sat_75th_percentile: i64,
}

/// Admissions bands for a college as returned to clients, joined with the
/// national percentile of its median score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeAdmissions {
    pub college_name: String,
    pub sat_25th_percentile: i64,
    pub sat_50th_percentile: i64,
    pub sat_75th_percentile: i64,
    pub percentile: String,
}

impl CollegeAdmissions {
    /// Zero-filled stand-in for a college that is missing or failed to load.
    pub fn placeholder(college_name: impl Into<String>) -> Self {
        Self {
            college_name: college_name.into(),
            sat_25th_percentile: 0,
            sat_50th_percentile: 0,
            sat_75th_percentile: 0,
            percentile: PERCENTILE_UNAVAILABLE.to_string(),
        }
    }
}

impl From<CollegeScoreRow> for CollegeAdmissions {
    fn from(row: CollegeScoreRow) -> Self {
        Self {
            college_name: row.college_name,
            sat_25th_percentile: row.sat_25th_percentile,
            sat_50th_percentile: row.sat_50th_percentile,
            sat_75th_percentile: row.sat_75th_percentile,
            percentile: PERCENTILE_UNAVAILABLE.to_string(),
        }
    }
}

/// Admissions data for three recommended colleges, keyed by rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedColleges {
    pub first: CollegeAdmissions,
    pub second: CollegeAdmissions,
    pub third: CollegeAdmissions,
}
