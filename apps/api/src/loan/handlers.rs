//! Axum route handler for the loan pre-screening API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::errors::AppError;
use crate::loan::advisor::assess_applicant;
use crate::loan::models::{LoanCheckRequest, LoanCheckResponse};
use crate::state::AppState;

/// POST /api/loan-check
///
/// Validates the applicant, runs the assessment and returns
/// `{success: true, data: EligibilityResult}`. Generation problems never fail
/// the request; only malformed input does.
pub async fn handle_loan_check(
    State(state): State<AppState>,
    payload: Result<Json<LoanCheckRequest>, JsonRejection>,
) -> Result<Json<LoanCheckResponse>, AppError> {
    let Json(request) = payload?;
    let (profile, terms) = request.into_profile()?;

    let data = assess_applicant(
        &state.knowledge,
        state.generator.as_deref(),
        state.generation,
        &profile,
        terms,
    )
    .await;

    Ok(Json(LoanCheckResponse {
        success: true,
        data,
    }))
}
