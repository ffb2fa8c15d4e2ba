use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::models::reference::{AdjacentSatRows, SatScoreRow};

pub const MIN_SAT_SCORE: i64 = 400;
pub const MAX_SAT_SCORE: i64 = 1600;
/// Distance between the exact score and its higher/lower neighbours.
const ADJACENT_STEP: i64 = 100;

const SAT_ROW_QUERY: &str = r#"
    SELECT CAST(total_score AS INTEGER) AS total_score,
           CAST(nat_rep_percentile AS TEXT) AS nat_rep_percentile,
           CAST(user_percentile AS TEXT) AS user_percentile
    FROM sat_scores
    WHERE total_score = ?
"#;

/// Returns `(higher, lower)` neighbour scores, clamped to the SAT range.
pub fn adjacent_scores(score: i64) -> (i64, i64) {
    (
        (score + ADJACENT_STEP).min(MAX_SAT_SCORE),
        (score - ADJACENT_STEP).max(MIN_SAT_SCORE),
    )
}

/// Rounds half up to the nearest multiple of 10, the granularity of the
/// percentile table.
pub fn round_to_nearest_ten(score: i64) -> i64 {
    (score + 5).div_euclid(10) * 10
}

async fn fetch_row(
    conn: &mut SqliteConnection,
    score: i64,
) -> Result<Option<SatScoreRow>, sqlx::Error> {
    sqlx::query_as::<_, SatScoreRow>(SAT_ROW_QUERY)
        .bind(score)
        .fetch_optional(conn)
        .await
}

/// Fetches the row at `score` plus the rows 100 points above and below it.
///
/// All three queries run in order on one checked-out connection. A failing
/// exact query fails the call; a failing neighbour query is logged and
/// leaves that slot empty.
pub async fn fetch_adjacent(pool: &SqlitePool, score: i64) -> Result<AdjacentSatRows, sqlx::Error> {
    let mut conn = pool.acquire().await?;

    debug!("Running exact SAT query with score {score}");
    let exact = fetch_row(&mut conn, score).await?;

    let (higher_score, lower_score) = adjacent_scores(score);

    let higher = fetch_row(&mut conn, higher_score)
        .await
        .unwrap_or_else(|e| {
            warn!("Higher SAT query for {higher_score} failed: {e}");
            None
        });

    let lower = fetch_row(&mut conn, lower_score)
        .await
        .unwrap_or_else(|e| {
            warn!("Lower SAT query for {lower_score} failed: {e}");
            None
        });

    Ok(AdjacentSatRows {
        exact,
        higher,
        lower,
    })
}

/// Looks up the national percentile for `score` rounded to the nearest 10.
pub async fn fetch_national_percentile(
    pool: &SqlitePool,
    score: i64,
) -> Result<Option<String>, sqlx::Error> {
    let rounded = round_to_nearest_ten(score);
    let mut conn = pool.acquire().await?;
    let row = fetch_row(&mut conn, rounded).await?;
    Ok(row
        .and_then(|r| r.nat_rep_percentile)
        .filter(|p| !p.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{empty_pool, seeded_pool};

    #[test]
    fn test_adjacent_scores_inside_range() {
        assert_eq!(adjacent_scores(1200), (1300, 1100));
    }

    #[test]
    fn test_adjacent_scores_clamp_at_bounds() {
        assert_eq!(adjacent_scores(1550), (1600, 1450));
        assert_eq!(adjacent_scores(1600), (1600, 1500));
        assert_eq!(adjacent_scores(450), (550, 400));
        assert_eq!(adjacent_scores(400), (500, 400));
    }

    #[test]
    fn test_adjacent_scores_hold_for_every_valid_score() {
        for score in MIN_SAT_SCORE..=MAX_SAT_SCORE {
            let (higher, lower) = adjacent_scores(score);
            assert_eq!(higher, (score + 100).min(1600));
            assert_eq!(lower, (score - 100).max(400));
        }
    }

    #[test]
    fn test_round_to_nearest_ten() {
        assert_eq!(round_to_nearest_ten(1303), 1300);
        assert_eq!(round_to_nearest_ten(1305), 1310);
        assert_eq!(round_to_nearest_ten(1435), 1440);
        assert_eq!(round_to_nearest_ten(1200), 1200);
        assert_eq!(round_to_nearest_ten(1596), 1600);
    }

    #[tokio::test]
    async fn test_fetch_adjacent_returns_all_three_rows() {
        let pool = seeded_pool().await;
        let rows = fetch_adjacent(&pool, 1200).await.unwrap();

        let exact = rows.exact.expect("exact row");
        assert_eq!(exact.total_score, 1200);
        assert_eq!(exact.nat_rep_percentile.as_deref(), Some("74"));
        assert_eq!(exact.user_percentile.as_deref(), Some("70"));
        assert_eq!(rows.higher.map(|r| r.total_score), Some(1300));
        assert_eq!(rows.lower.map(|r| r.total_score), Some(1100));
    }

    #[tokio::test]
    async fn test_fetch_adjacent_misses_are_none() {
        let pool = seeded_pool().await;
        let rows = fetch_adjacent(&pool, 1250).await.unwrap();
        assert!(rows.exact.is_none());
        assert_eq!(rows.higher.map(|r| r.total_score), Some(1350));
        assert!(rows.lower.is_none());
    }

    #[tokio::test]
    async fn test_fetch_adjacent_clamps_at_top_of_range() {
        let pool = seeded_pool().await;
        let rows = fetch_adjacent(&pool, 1600).await.unwrap();
        assert_eq!(rows.exact.map(|r| r.total_score), Some(1600));
        assert_eq!(rows.higher.map(|r| r.total_score), Some(1600));
        assert_eq!(rows.lower.map(|r| r.total_score), Some(1500));
    }

    #[tokio::test]
    async fn test_fetch_adjacent_fails_when_table_missing() {
        let pool = empty_pool().await;
        assert!(fetch_adjacent(&pool, 1200).await.is_err());
    }

    #[tokio::test]
    async fn test_inserted_row_reads_back_unchanged() {
        let pool = empty_pool().await;
        sqlx::query(
            "CREATE TABLE sat_scores (total_score INTEGER PRIMARY KEY, nat_rep_percentile TEXT, user_percentile TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO sat_scores VALUES (1200, '74', '70')")
            .execute(&pool)
            .await
            .unwrap();

        let rows = fetch_adjacent(&pool, 1200).await.unwrap();
        assert_eq!(
            rows.exact,
            Some(SatScoreRow {
                total_score: 1200,
                nat_rep_percentile: Some("74".to_string()),
                user_percentile: Some("70".to_string()),
            })
        );
        assert!(rows.higher.is_none());
        assert!(rows.lower.is_none());
    }

    #[tokio::test]
    async fn test_numeric_percentile_columns_read_as_text() {
        let pool = empty_pool().await;
        sqlx::query(
            "CREATE TABLE sat_scores (total_score INTEGER PRIMARY KEY, nat_rep_percentile INTEGER, user_percentile INTEGER)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO sat_scores VALUES (1300, 86, 83)")
            .execute(&pool)
            .await
            .unwrap();

        let percentile = fetch_national_percentile(&pool, 1298).await.unwrap();
        assert_eq!(percentile.as_deref(), Some("86"));
    }

    #[tokio::test]
    async fn test_text_score_column_decodes() {
        let pool = empty_pool().await;
        sqlx::query(
            "CREATE TABLE sat_scores (total_score TEXT, nat_rep_percentile TEXT, user_percentile TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO sat_scores VALUES ('1200', '74', '70'), ('1100', '58', '55')")
            .execute(&pool)
            .await
            .unwrap();
        let rows = fetch_adjacent(&pool, 1200).await.unwrap();
        assert_eq!(rows.exact.map(|r| r.total_score), Some(1200));
        assert_eq!(rows.lower.map(|r| r.total_score), Some(1100));
        assert!(rows.higher.is_none());
    }

    #[tokio::test]
    async fn test_real_score_column_decodes() {
        let pool = empty_pool().await;
        sqlx::query("CREATE TABLE sat_scores (total_score REAL, nat_rep_percentile, user_percentile)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO sat_scores VALUES (1300.0, 86, 83)")
            .execute(&pool)
            .await
            .unwrap();

        let rows = fetch_adjacent(&pool, 1300).await.unwrap();
        let exact = rows.exact.expect("exact row");
        assert_eq!(exact.total_score, 1300);
        assert_eq!(exact.nat_rep_percentile.as_deref(), Some("86"));
    }

    #[tokio::test]
    async fn test_failing_neighbour_rows_degrade_to_none() {
        let pool = seeded_pool().await;
        // Invalid UTF-8 percentile: the 1300 and 1100 rows fail to decode.
        sqlx::query("UPDATE sat_scores SET nat_rep_percentile = X'FF' WHERE total_score IN (1100, 1300)")
            .execute(&pool)
            .await
            .unwrap();

        let rows = fetch_adjacent(&pool, 1200).await.unwrap();
        assert_eq!(rows.exact.map(|r| r.total_score), Some(1200));
        assert!(rows.higher.is_none());
        assert!(rows.lower.is_none());

        assert!(fetch_adjacent(&pool, 1300).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_national_percentile_rounds_score() {
        let pool = seeded_pool().await;
        assert_eq!(
            fetch_national_percentile(&pool, 1303).await.unwrap().as_deref(),
            Some("86")
        );
        assert_eq!(fetch_national_percentile(&pool, 1435).await.unwrap(), None);
    }
}
