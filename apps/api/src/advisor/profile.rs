//! Student profile parsed from the submission form, and the first-person
//! summary sent to the counselor model.

use crate::advisor::form::FormFields;
use crate::errors::AppError;
use crate::lookup::sat::{MAX_SAT_SCORE, MIN_SAT_SCORE};

pub const FIELD_STATE: &str = "state";
pub const FIELD_SAT_SCORE: &str = "satScore";
pub const FIELD_GPA: &str = "gpa";
pub const FIELD_MAJOR: &str = "major";
pub const FIELD_SCHOOL_SIZE: &str = "school-size";
pub const FIELD_PROXIMITY: &str = "proximity-importance";
pub const FIELD_FINANCIAL_AID: &str = "financial-aid-importance";

#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub state: String,
    pub sat_score: i64,
    pub gpa: f64,
    pub major: Option<String>,
    pub school_size: Option<String>,
    /// 1–5
    pub proximity_importance: Option<u8>,
    /// 1–5
    pub financial_aid_importance: u8,
}

/// Parses a total SAT score. Accepts whole numbers in 400..=1600, including
/// a trailing `.0`.
pub fn parse_sat_score(raw: &str) -> Option<i64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    let score = value as i64;
    (MIN_SAT_SCORE..=MAX_SAT_SCORE)
        .contains(&score)
        .then_some(score)
}

fn parse_importance(raw: &str) -> Option<u8> {
    raw.parse::<u8>().ok().filter(|v| (1..=5).contains(v))
}

fn parse_gpa(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn required<'a>(fields: &'a FormFields, name: &str) -> Result<&'a str, AppError> {
    fields
        .get(name)
        .ok_or_else(|| AppError::Validation(format!("Missing required field: {name}")))
}

fn invalid(name: &str) -> AppError {
    AppError::Validation(format!("Invalid {name}"))
}

impl StudentProfile {
    pub fn from_fields(fields: &FormFields) -> Result<Self, AppError> {
        let state = required(fields, FIELD_STATE)?.to_string();

        let sat_score = parse_sat_score(required(fields, FIELD_SAT_SCORE)?)
            .ok_or_else(|| AppError::Validation("Invalid SAT score".to_string()))?;

        let gpa = parse_gpa(required(fields, FIELD_GPA)?).ok_or_else(|| invalid(FIELD_GPA))?;

        let financial_aid_importance = parse_importance(required(fields, FIELD_FINANCIAL_AID)?)
            .ok_or_else(|| invalid(FIELD_FINANCIAL_AID))?;

        let proximity_importance = fields
            .get(FIELD_PROXIMITY)
            .map(|raw| parse_importance(raw).ok_or_else(|| invalid(FIELD_PROXIMITY)))
            .transpose()?;

        Ok(Self {
            state,
            sat_score,
            gpa,
            major: fields.get(FIELD_MAJOR).map(str::to_string),
            school_size: fields.get(FIELD_SCHOOL_SIZE).map(str::to_string),
            proximity_importance,
            financial_aid_importance,
        })
    }

    /// First-person summary used as the user message of the completion.
    pub fn summary(&self) -> String {
        let mut summary = format!("I'm from {}.", self.state);
        if let Some(p) = self.proximity_importance {
            summary.push_str(&format!(
                " Staying close to home is a {p} out of 5 in importance to me."
            ));
        }
        summary.push_str(&format!(
            " My SAT score is {} and my GPA is {}.",
            self.sat_score,
            format_gpa(self.gpa)
        ));
        if let Some(major) = &self.major {
            summary.push_str(&format!(" I'm interested in majoring in {major}."));
        }
        if let Some(size) = &self.school_size {
            summary.push_str(&format!(" I have a {size} size school preference."));
        }
        summary.push_str(&format!(
            " On a scale of 1-5, financial aid is a {} in importance to me.",
            self.financial_aid_importance
        ));
        summary.push_str(" What are my college options?");
        summary
    }
}

/// Two decimals with trailing zeros dropped, keeping at least one: 4 → "4.0".
fn format_gpa(gpa: f64) -> String {
    let mut text = format!("{gpa:.2}");
    if text.ends_with('0') {
        text.pop();
    }
    text
}
