use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::lookup::sat::fetch_national_percentile;
use crate::models::reference::{CollegeAdmissions, CollegeScoreRow, RankedColleges};

const COLLEGE_ROW_QUERY: &str = r#"
    SELECT college_name,
           COALESCE(CAST(sat_25th_percentile AS INTEGER), 0) AS sat_25th_percentile,
           COALESCE(CAST(sat_50th_percentile AS INTEGER), 0) AS sat_50th_percentile,
           COALESCE(CAST(sat_75th_percentile AS INTEGER), 0) AS sat_75th_percentile
    FROM college_scores
    WHERE college_name = ?
"#;

/// Exact-name lookup of a college's SAT bands.
pub async fn fetch_college(
    pool: &SqlitePool,
    college_name: &str,
) -> Result<Option<CollegeScoreRow>, sqlx::Error> {
    sqlx::query_as::<_, CollegeScoreRow>(COLLEGE_ROW_QUERY)
        .bind(college_name)
        .fetch_optional(pool)
        .await
}

/// Resolves one college into its client-facing admissions record.
///
/// Never fails: a miss or a failed query yields a placeholder echoing the
/// submitted name. Found colleges with a median score get the national
/// percentile of that median attached, or "N/A" if it cannot be resolved.
pub async fn college_admissions(pool: &SqlitePool, college_name: &str) -> CollegeAdmissions {
    let row = match fetch_college(pool, college_name).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            debug!("No admissions row for '{college_name}'");
            return CollegeAdmissions::placeholder(college_name);
        }
        Err(e) => {
            warn!("Admissions query for '{college_name}' failed: {e}");
            return CollegeAdmissions::placeholder(college_name);
        }
    };

    let mut admissions = CollegeAdmissions::from(row);
    if admissions.sat_50th_percentile != 0 {
        match fetch_national_percentile(pool, admissions.sat_50th_percentile).await {
            Ok(Some(percentile)) => admissions.percentile = percentile,
            Ok(None) => {}
            Err(e) => warn!(
                "Percentile query for '{college_name}' ({}) failed: {e}",
                admissions.sat_50th_percentile
            ),
        }
    }
    admissions
}

/// Looks up three colleges concurrently. Each lookup settles on its own, so
/// one miss or failure only replaces that slot with a placeholder.
pub async fn ranked_college_admissions(
    pool: &SqlitePool,
    first: &str,
    second: &str,
    third: &str,
) -> RankedColleges {
    let (first, second, third) = tokio::join!(
        college_admissions(pool, first),
        college_admissions(pool, second),
        college_admissions(pool, third),
    );
    RankedColleges {
        first,
        second,
        third,
    }
}
