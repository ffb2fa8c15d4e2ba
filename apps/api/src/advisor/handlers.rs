//! Axum route handlers for the advisor API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::advisor::advice::advise;
use crate::advisor::form::FormFields;
use crate::advisor::profile::{parse_sat_score, StudentProfile, FIELD_SAT_SCORE};
use crate::config::Enrichment;
use crate::errors::{ActionError, AppError};
use crate::llm_client::CompletionChoice;
use crate::lookup::college::{college_admissions, ranked_college_admissions};
use crate::lookup::sat::fetch_adjacent;
use crate::models::reference::{AdjacentSatRows, CollegeAdmissions, RankedColleges};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Envelope returned by the profile page action.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    pub status: u16,
    pub body: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAdviceBody {
    pub message: &'static str,
    pub api_response: CompletionChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat_data: Option<AdjacentSatRows>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college_data: Option<RankedColleges>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatAdviceResponse {
    pub open_ai_response: CompletionChoice,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatDataResponse {
    pub sat_data: AdjacentSatRows,
}

/// Either three ranked names, or the older single `collegeName` shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDataRequest {
    pub first: Option<String>,
    pub second: Option<String>,
    pub third: Option<String>,
    pub college_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CollegeData {
    Ranked(RankedColleges),
    Single(CollegeAdmissions),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDataResponse {
    pub college_data: CollegeData,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /
///
/// Profile submission page action. Runs the completion with whatever
/// enrichment is configured and wraps the outcome in `{status, body}`.
#[tracing::instrument(skip_all)]
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    fields: Result<FormFields, AppError>,
) -> Result<Json<ActionResponse<ProfileAdviceBody>>, ActionError> {
    let profile = StudentProfile::from_fields(&fields?)?;

    let advice = advise(
        &state.db,
        state.llm.as_ref(),
        &profile,
        state.config.enrichment,
    )
    .await?;

    Ok(Json(ActionResponse {
        status: StatusCode::OK.as_u16(),
        body: ProfileAdviceBody {
            message: "Form submitted successfully",
            api_response: advice.completion,
            sat_data: advice.sat_data,
            college_data: advice.college_data,
        },
    }))
}

/// POST /sat-advice
///
/// Completion only; no lookup enrichment.
#[tracing::instrument(skip_all)]
pub async fn handle_sat_advice(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Json<SatAdviceResponse>, AppError> {
    let profile = StudentProfile::from_fields(&fields)?;
    let advice = advise(&state.db, state.llm.as_ref(), &profile, Enrichment::NONE).await?;
    Ok(Json(SatAdviceResponse {
        open_ai_response: advice.completion,
    }))
}

/// POST /sat-data
///
/// Exact, +100 and −100 percentile rows for a submitted score.
///
/// `satScore` must be a whole number in 400..=1600. Blank, non-numeric and
/// out-of-range values get 400 "Invalid SAT score".
#[tracing::instrument(skip_all)]
pub async fn handle_sat_data(
    State(state): State<AppState>,
    fields: FormFields,
) -> Result<Json<SatDataResponse>, AppError> {
    let score = fields
        .get(FIELD_SAT_SCORE)
        .and_then(parse_sat_score)
        .ok_or_else(|| AppError::Validation("Invalid SAT score".to_string()))?;

    let sat_data = fetch_adjacent(&state.db, score).await?;
    Ok(Json(SatDataResponse { sat_data }))
}

/// POST /college-data
///
/// Admissions bands for three named colleges (or one, in the legacy shape).
/// Misses and failed lookups come back as placeholder rows.
#[tracing::instrument(skip_all)]
pub async fn handle_college_data(
    State(state): State<AppState>,
    body: Result<Json<CollegeDataRequest>, JsonRejection>,
) -> Result<Json<CollegeDataResponse>, AppError> {
    let Json(request) =
        body.map_err(|_| AppError::Validation("Invalid request body".to_string()))?;

    let ranked = [&request.first, &request.second, &request.third];
    let college_data = if ranked.iter().any(|v| v.is_some()) {
        let [first, second, third] = ranked.map(non_blank);
        let (Some(first), Some(second), Some(third)) = (first, second, third) else {
            return Err(AppError::Validation("Missing college name".to_string()));
        };
        CollegeData::Ranked(ranked_college_admissions(&state.db, first, second, third).await)
    } else if let Some(name) = non_blank(&request.college_name) {
        CollegeData::Single(college_admissions(&state.db, name).await)
    } else {
        return Err(AppError::Validation("Missing college name".to_string()));
    };

    Ok(Json(CollegeDataResponse { college_data }))
}
