//! Advice pipeline shared by the profile action and `/sat-advice`.
//!
//! The completion call and the SAT lookup are independent and run together;
//! whichever fails first cancels the other. College enrichment needs the
//! names from the completion, so it runs after.

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::advisor::profile::StudentProfile;
use crate::advisor::recommendations::parse_recommendations;
use crate::config::Enrichment;
use crate::errors::AppError;
use crate::llm_client::{CompletionChoice, CompletionClient};
use crate::lookup::college::ranked_college_admissions;
use crate::lookup::sat::fetch_adjacent;
use crate::models::reference::{AdjacentSatRows, RankedColleges};

#[derive(Debug, Clone)]
pub struct Advice {
    pub completion: CompletionChoice,
    pub sat_data: Option<AdjacentSatRows>,
    pub college_data: Option<RankedColleges>,
}

pub async fn advise(
    db: &SqlitePool,
    llm: &dyn CompletionClient,
    profile: &StudentProfile,
    enrichment: Enrichment,
) -> Result<Advice, AppError> {
    let summary = profile.summary();

    let completion = async { llm.complete(&summary).await.map_err(AppError::from) };
    let sat_lookup = async {
        if enrichment.sat_data {
            fetch_adjacent(db, profile.sat_score)
                .await
                .map(Some)
                .map_err(AppError::from)
        } else {
            Ok(None)
        }
    };

    let (completion, sat_data) = tokio::try_join!(completion, sat_lookup)?;

    let college_data = if enrichment.college_data {
        enrich_recommendations(db, &completion).await
    } else {
        None
    };

    Ok(Advice {
        completion,
        sat_data,
        college_data,
    })
}

async fn enrich_recommendations(
    db: &SqlitePool,
    completion: &CompletionChoice,
) -> Option<RankedColleges> {
    let names = parse_recommendations(completion.text().unwrap_or_default());
    match names.as_slice() {
        [first, second, third, ..] => {
            info!("Enriching recommendations: {first}; {second}; {third}");
            Some(ranked_college_admissions(db, first, second, third).await)
        }
        _ => {
            warn!(
                "Completion listed {} recommendations, expected 3; skipping college data",
                names.len()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::db::test_support::empty_pool;
    use crate::llm_client::LlmError;

    /// Completion that never resolves, counting how often it was started.
    struct StalledCompletion {
        started: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for StalledCompletion {
        async fn complete(&self, _user_message: &str) -> Result<CompletionChoice, LlmError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    fn profile() -> StudentProfile {
        StudentProfile {
            state: "Ohio".to_string(),
            sat_score: 1200,
            gpa: 3.6,
            major: None,
            school_size: None,
            proximity_importance: None,
            financial_aid_importance: 3,
        }
    }

    #[tokio::test]
    async fn test_sat_failure_cancels_pending_completion() {
        let pool = empty_pool().await;
        let llm = StalledCompletion {
            started: AtomicUsize::new(0),
        };
        let enrichment = Enrichment {
            sat_data: true,
            college_data: true,
        };

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            advise(&pool, &llm, &profile(), enrichment),
        )
        .await
        .expect("advise returns without waiting on the completion");

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(llm.started.load(Ordering::SeqCst), 1);
    }
}
