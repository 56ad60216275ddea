use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::knowledge::LoanProduct;
use crate::loan::dti::{LoanTerms, MAX_INTEREST_RATE, MAX_TERM_MONTHS};
use crate::loan::scoring::ApprovalSource;

pub const DEFAULT_LOAN_PURPOSE: &str = "생활자금";
/// Upper bound of the domestic credit-score scale.
pub const MAX_CREDIT_SCORE: i64 = 1000;

/// Request body for `POST /api/loan-check`.
///
/// Fields are optional at the wire level so a missing value produces a
/// field-specific 400 instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanCheckRequest {
    pub age: Option<i64>,
    pub annual_income: Option<i64>,
    pub credit_score: Option<i64>,
    pub desired_amount: Option<i64>,
    pub monthly_debt: Option<i64>,
    pub loan_purpose: Option<String>,
    pub loan_term_months: Option<i64>,
    pub interest_rate: Option<f64>,
}

/// Applicant attributes for one request. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub age: u32,
    pub annual_income: i64,
    pub credit_score: u32,
    pub desired_amount: i64,
    pub monthly_debt: i64,
    pub loan_purpose: String,
}

impl LoanCheckRequest {
    /// Validates the request into a profile plus the loan terms to price it with.
    pub fn into_profile(self) -> Result<(ApplicantProfile, LoanTerms), AppError> {
        let age = required_non_negative("age", self.age)?;
        let annual_income = required_non_negative("annual_income", self.annual_income)?;
        let credit_score = required_non_negative("credit_score", self.credit_score)?;
        let desired_amount = required_non_negative("desired_amount", self.desired_amount)?;
        let monthly_debt = non_negative("monthly_debt", self.monthly_debt.unwrap_or(0))?;

        if credit_score > MAX_CREDIT_SCORE {
            return Err(AppError::Validation(format!(
                "credit_score must be between 0 and {MAX_CREDIT_SCORE}"
            )));
        }
        let age = u32::try_from(age)
            .map_err(|_| AppError::Validation("age is out of range".to_string()))?;

        let mut terms = LoanTerms::default();
        if let Some(months) = self.loan_term_months {
            terms.term_months = u32::try_from(months)
                .ok()
                .filter(|m| (1..=MAX_TERM_MONTHS).contains(m))
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "loan_term_months must be between 1 and {MAX_TERM_MONTHS}"
                    ))
                })?;
        }
        if let Some(rate) = self.interest_rate {
            if !(0.0..=MAX_INTEREST_RATE).contains(&rate) {
                return Err(AppError::Validation(format!(
                    "interest_rate must be between 0 and {MAX_INTEREST_RATE}"
                )));
            }
            terms.annual_rate_percent = rate;
        }

        let loan_purpose = self
            .loan_purpose
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_LOAN_PURPOSE.to_string());

        Ok((
            ApplicantProfile {
                age,
                annual_income,
                // bounded by MAX_CREDIT_SCORE above
                credit_score: credit_score as u32,
                desired_amount,
                monthly_debt,
                loan_purpose,
            },
            terms,
        ))
    }
}

fn required_non_negative(field: &str, value: Option<i64>) -> Result<i64, AppError> {
    let value = value.ok_or_else(|| AppError::Validation(format!("{field} is required")))?;
    non_negative(field, value)
}

fn non_negative(field: &str, value: i64) -> Result<i64, AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} must not be negative")));
    }
    Ok(value)
}

/// A product record augmented with its match score against one applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: LoanProduct,
    pub match_score: u32,
    pub match_reason: String,
    pub all_reasons: Vec<String>,
}

/// Per-request assessment, returned directly as the response body's `data`.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityResult {
    /// Always within 0..=100.
    pub approval_percentage: u8,
    /// Rule-based score, reported even when the generated text supplied one.
    pub baseline_percentage: u8,
    pub approval_source: ApprovalSource,
    /// Percentage of monthly income, ≥ 0, two decimals.
    pub dti: f64,
    /// Markdown.
    pub explanation: String,
    /// False when the explanation came from the deterministic template.
    pub generated: bool,
    pub recommended_products: Vec<ScoredProduct>,
}

#[derive(Debug, Serialize)]
pub struct LoanCheckResponse {
    pub success: bool,
    pub data: EligibilityResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> LoanCheckRequest {
        serde_json::from_value(json!({
            "age": 30,
            "annual_income": 40000000,
            "credit_score": 750,
            "desired_amount": 20000000,
            "monthly_debt": 500000,
            "loan_purpose": "주택구입"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_request_converts() {
        let (profile, terms) = valid_request().into_profile().unwrap();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.credit_score, 750);
        assert_eq!(profile.loan_purpose, "주택구입");
        assert_eq!(terms, LoanTerms::default());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut request = valid_request();
        request.annual_income = None;
        let err = request.into_profile().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("annual_income")));
    }

    #[test]
    fn test_null_fields_deserialize_as_missing() {
        let request: LoanCheckRequest = serde_json::from_value(json!({
            "age": 30,
            "annual_income": 40000000,
            "credit_score": null,
            "desired_amount": 1000
        }))
        .unwrap();
        assert!(request.into_profile().is_err());
    }

    #[test]
    fn test_monthly_debt_and_purpose_default() {
        let mut request = valid_request();
        request.monthly_debt = None;
        request.loan_purpose = Some("   ".to_string());
        let (profile, _) = request.into_profile().unwrap();
        assert_eq!(profile.monthly_debt, 0);
        assert_eq!(profile.loan_purpose, DEFAULT_LOAN_PURPOSE);
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let mut request = valid_request();
        request.desired_amount = Some(-1);
        assert!(request.into_profile().is_err());
    }

    #[test]
    fn test_credit_score_above_scale_is_rejected() {
        let mut request = valid_request();
        request.credit_score = Some(1001);
        assert!(request.into_profile().is_err());
    }

    #[test]
    fn test_term_and_rate_overrides() {
        let mut request = valid_request();
        request.loan_term_months = Some(120);
        request.interest_rate = Some(3.2);
        let (_, terms) = request.into_profile().unwrap();
        assert_eq!(terms.term_months, 120);
        assert!((terms.annual_rate_percent - 3.2).abs() < f64::EPSILON);

        let mut request = valid_request();
        request.loan_term_months = Some(0);
        assert!(request.into_profile().is_err());
    }

    #[test]
    fn test_terms_beyond_pricing_range_are_rejected() {
        let mut request = valid_request();
        request.loan_term_months = Some(i64::from(MAX_TERM_MONTHS));
        assert!(request.into_profile().is_ok());

        let mut request = valid_request();
        request.loan_term_months = Some(1000);
        let err = request.into_profile().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("600")));

        let mut request = valid_request();
        request.interest_rate = Some(150.0);
        assert!(request.into_profile().is_err());

        let mut request = valid_request();
        request.interest_rate = Some(f64::NAN);
        assert!(request.into_profile().is_err());
    }

    #[test]
    fn test_scored_product_flattens_record_fields() {
        let product: LoanProduct = serde_json::from_value(json!({
            "name": "청년 전용 대출",
            "interest_rate": "3.5%"
        }))
        .unwrap();
        let scored = ScoredProduct {
            product,
            match_score: 95,
            match_reason: "청년 우대 상품".to_string(),
            all_reasons: vec!["청년 우대 상품".to_string()],
        };
        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["name"], "청년 전용 대출");
        assert_eq!(value["interest_rate"], "3.5%");
        assert_eq!(value["match_score"], 95);
    }
}
