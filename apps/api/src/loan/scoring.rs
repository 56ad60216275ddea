//! Eligibility scoring — deterministic, rule-based approval estimate.
//!
//! Baseline: 50, adjusted by credit tier, DTI tier and income band, clamped
//! to 0..=100. The same tier bands label the templated explanation.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const BASE_SCORE: i64 = 50;

pub const HIGH_INCOME: i64 = 50_000_000;
pub const MIDDLE_INCOME: i64 = 30_000_000;
pub const LOW_INCOME: i64 = 20_000_000;

/// Qualitative label attached to every tier in the explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Rating {
    /// 800 / 700 / 600 bands.
    pub fn for_credit(credit_score: i64) -> Self {
        if credit_score >= 800 {
            Rating::Excellent
        } else if credit_score >= 700 {
            Rating::Good
        } else if credit_score >= 600 {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    /// 30 / 40 / 50 percent bands. A non-comparable DTI rates poor.
    pub fn for_dti(dti: f64) -> Self {
        if dti <= 30.0 {
            Rating::Excellent
        } else if dti <= 40.0 {
            Rating::Good
        } else if dti <= 50.0 {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    /// 80 / 60 / 40 percent bands.
    pub fn for_approval(approval_percentage: u8) -> Self {
        if approval_percentage >= 80 {
            Rating::Excellent
        } else if approval_percentage >= 60 {
            Rating::Good
        } else if approval_percentage >= 40 {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "excellent",
            Rating::Good => "good",
            Rating::Fair => "fair",
            Rating::Poor => "poor",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Rating::Excellent => "✅",
            Rating::Good => "🟡",
            Rating::Fair => "⚠️",
            Rating::Poor => "❌",
        }
    }
}

fn credit_points(rating: Rating) -> i64 {
    match rating {
        Rating::Excellent => 30,
        Rating::Good => 20,
        Rating::Fair => 10,
        Rating::Poor => -20,
    }
}

fn dti_points(rating: Rating) -> i64 {
    match rating {
        Rating::Excellent => 15,
        Rating::Good => 5,
        Rating::Fair => -5,
        Rating::Poor => -20,
    }
}

fn income_points(annual_income: i64) -> i64 {
    if annual_income >= HIGH_INCOME {
        10
    } else if annual_income >= MIDDLE_INCOME {
        5
    } else if annual_income < LOW_INCOME {
        -10
    } else {
        0
    }
}

/// Rule-based approval percentage, always within 0..=100.
pub fn baseline_approval(credit_score: i64, dti: f64, annual_income: i64) -> u8 {
    let score = BASE_SCORE
        + credit_points(Rating::for_credit(credit_score))
        + dti_points(Rating::for_dti(dti))
        + income_points(annual_income);

    score.clamp(0, 100) as u8
}

/// Where the reported approval percentage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalSource {
    Generated,
    Baseline,
}

fn labelled_percentage() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"승인\s*가능성[^\d\n]*(\d{1,3})(?:\.\d+)?\s*%").expect("static regex")
    })
}

fn any_percentage() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|[^\d.])(\d{1,3})(?:\.\d+)?\s*%").expect("static regex"))
}

/// Pulls an approval percentage out of generated prose.
///
/// A number on the "승인 가능성" line wins; otherwise the first `NN%` in the
/// text. Fractions are truncated and values above 100 are clamped.
pub fn extract_percentage(text: &str) -> Option<u8> {
    let captures = labelled_percentage()
        .captures(text)
        .or_else(|| any_percentage().captures(text))?;

    let value: u32 = captures.get(1)?.as_str().parse().ok()?;
    Some(value.min(100) as u8)
}

/// Picks the reported percentage: the generated one when present, else the
/// baseline.
pub fn resolve_approval(generated_text: Option<&str>, baseline: u8) -> (u8, ApprovalSource) {
    match generated_text.and_then(extract_percentage) {
        Some(pct) => (pct, ApprovalSource::Generated),
        None => (baseline, ApprovalSource::Baseline),
    }
}
