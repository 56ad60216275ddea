//! Debt-to-income ratio.
//!
//! DTI = (existing monthly debt + amortized payment of the new loan)
//!       / monthly income × 100, rounded to two decimals.
//! Out-of-range inputs are clamped so they have no effect instead of failing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TERM_MONTHS: u32 = 60;
pub const DEFAULT_INTEREST_RATE: f64 = 5.0;

/// Longest term the amortization formula is evaluated for (50 years).
pub const MAX_TERM_MONTHS: u32 = 600;
/// Highest annual rate, in percent, the formula accepts.
pub const MAX_INTEREST_RATE: f64 = 100.0;

/// Repayment terms used to price the requested loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub term_months: u32,
    /// Annual interest rate in percent.
    pub annual_rate_percent: f64,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            term_months: DEFAULT_TERM_MONTHS,
            annual_rate_percent: DEFAULT_INTEREST_RATE,
        }
    }
}

impl LoanTerms {
    fn clamped(self) -> (f64, f64) {
        let months = self.term_months.clamp(1, MAX_TERM_MONTHS) as f64;
        let rate = if self.annual_rate_percent.is_finite() {
            self.annual_rate_percent.clamp(0.0, MAX_INTEREST_RATE)
        } else {
            0.0
        };
        (months, rate / 100.0 / 12.0)
    }
}

/// Level monthly payment (equal principal-and-interest) for `principal`.
pub fn monthly_payment(principal: i64, terms: LoanTerms) -> f64 {
    if principal <= 0 {
        return 0.0;
    }
    let principal = principal as f64;
    let (months, monthly_rate) = terms.clamped();

    if monthly_rate > 0.0 {
        let growth = (1.0 + monthly_rate).powf(months);
        principal * (monthly_rate * growth) / (growth - 1.0)
    } else {
        principal / months
    }
}

/// Computes the DTI percentage. Zero when there is no income.
pub fn calculate_dti(annual_income: i64, monthly_debt: i64, loan_amount: i64, terms: LoanTerms) -> f64 {
    if annual_income <= 0 {
        return 0.0;
    }

    let monthly_income = annual_income as f64 / 12.0;
    let total_monthly_debt = monthly_debt.max(0) as f64 + monthly_payment(loan_amount, terms);

    round2(total_monthly_debt / monthly_income * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_income_is_zero() {
        assert_eq!(calculate_dti(0, 1_000_000, 50_000_000, LoanTerms::default()), 0.0);
        assert_eq!(calculate_dti(-5, 0, 0, LoanTerms::default()), 0.0);
    }

    #[test]
    fn test_existing_debt_only() {
        // 600,000 / (36,000,000 / 12) = 20%
        assert_eq!(calculate_dti(36_000_000, 600_000, 0, LoanTerms::default()), 20.0);
    }

    #[test]
    fn test_amortized_payment_matches_formula() {
        // 20,000,000 at 5% over 60 months ≈ 377,424.6 per month
        let payment = monthly_payment(20_000_000, LoanTerms::default());
        assert!((payment - 377_424.6).abs() < 1.0, "payment was {payment}");
    }

    #[test]
    fn test_reference_applicant() {
        // (500,000 + 377,424.6) / 3,333,333.3 × 100 = 26.32
        let dti = calculate_dti(40_000_000, 500_000, 20_000_000, LoanTerms::default());
        assert_eq!(dti, 26.32);
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        let terms = LoanTerms {
            term_months: 10,
            annual_rate_percent: 0.0,
        };
        assert_eq!(monthly_payment(1_000_000, terms), 100_000.0);
        // 100,000 / 1,000,000 × 100
        assert_eq!(calculate_dti(12_000_000, 0, 1_000_000, terms), 10.0);
    }

    #[test]
    fn test_degenerate_terms_are_clamped() {
        let zero_term = LoanTerms {
            term_months: 0,
            annual_rate_percent: 0.0,
        };
        assert_eq!(monthly_payment(1_000, zero_term), 1_000.0);

        let negative_rate = LoanTerms {
            term_months: 10,
            annual_rate_percent: -3.0,
        };
        assert_eq!(monthly_payment(1_000, negative_rate), 100.0);

        let nan_rate = LoanTerms {
            term_months: 10,
            annual_rate_percent: f64::NAN,
        };
        assert_eq!(monthly_payment(1_000, nan_rate), 100.0);
    }

    #[test]
    fn test_negative_amounts_have_no_effect() {
        let base = calculate_dti(24_000_000, 0, 0, LoanTerms::default());
        assert_eq!(calculate_dti(24_000_000, -100, -100, LoanTerms::default()), base);
    }

    #[test]
    fn test_result_has_two_decimals() {
        let dti = calculate_dti(37_000_000, 123_457, 9_876_543, LoanTerms::default());
        assert_eq!(dti, (dti * 100.0).round() / 100.0);
    }

    proptest! {
        #[test]
        fn dti_zero_income_for_any_inputs(
            debt in 0i64..1_000_000_000,
            amount in 0i64..10_000_000_000,
            months in 0u32..1000,
            rate in 0.0f64..50.0,
        ) {
            let terms = LoanTerms { term_months: months, annual_rate_percent: rate };
            prop_assert_eq!(calculate_dti(0, debt, amount, terms), 0.0);
        }

        #[test]
        fn dti_non_decreasing_in_loan_amount(
            income in 1i64..1_000_000_000,
            debt in 0i64..100_000_000,
            amount in 0i64..5_000_000_000,
            extra in 0i64..5_000_000_000,
            months in 1u32..600,
            rate in 0.0f64..30.0,
        ) {
            let terms = LoanTerms { term_months: months, annual_rate_percent: rate };
            let lower = calculate_dti(income, debt, amount, terms);
            let higher = calculate_dti(income, debt, amount + extra, terms);
            prop_assert!(higher >= lower, "{} < {}", higher, lower);
        }

        #[test]
        fn dti_non_decreasing_in_monthly_debt(
            income in 1i64..1_000_000_000,
            debt in 0i64..100_000_000,
            extra in 0i64..100_000_000,
            amount in 0i64..5_000_000_000,
        ) {
            let terms = LoanTerms::default();
            let lower = calculate_dti(income, debt, amount, terms);
            let higher = calculate_dti(income, debt + extra, amount, terms);
            prop_assert!(higher >= lower, "{} < {}", higher, lower);
        }

        #[test]
        fn dti_is_never_negative(
            income in -1_000_000i64..1_000_000_000,
            debt in -1_000_000i64..100_000_000,
            amount in -1_000_000i64..5_000_000_000,
        ) {
            prop_assert!(calculate_dti(income, debt, amount, LoanTerms::default()) >= 0.0);
        }
    }
}
