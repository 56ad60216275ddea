//! Keyword extraction: Hangul tokens from the applicant's text followed by
//! context tags derived from the profile.

use std::sync::OnceLock;

use regex::Regex;

use crate::loan::models::ApplicantProfile;

pub const YOUTH_TAG: &str = "청년";
pub const SENIOR_TAG: &str = "시니어";
pub const PREMIUM_TAG: &str = "프리미엄";
pub const PREFERRED_TAG: &str = "우대";
pub const RISK_TAG: &str = "위험";
pub const GUARANTEE_TAG: &str = "보증";

pub const YOUTH_MAX_AGE: u32 = 35;
pub const SENIOR_MIN_AGE: u32 = 55;
pub const PREMIUM_MIN_CREDIT: u32 = 800;
pub const RISK_MAX_CREDIT: u32 = 600;

fn hangul_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[가-힣]{2,}").expect("static regex"))
}

/// Runs of two or more Hangul syllables in scan order, then profile tags.
/// Duplicates are kept.
pub fn extract_keywords(text: &str, profile: &ApplicantProfile) -> Vec<String> {
    let mut keywords: Vec<String> = hangul_run()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    if profile.age < YOUTH_MAX_AGE {
        keywords.push(YOUTH_TAG.to_string());
    } else if profile.age >= SENIOR_MIN_AGE {
        keywords.push(SENIOR_TAG.to_string());
    }

    if profile.credit_score >= PREMIUM_MIN_CREDIT {
        keywords.push(PREMIUM_TAG.to_string());
        keywords.push(PREFERRED_TAG.to_string());
    } else if profile.credit_score < RISK_MAX_CREDIT {
        keywords.push(RISK_TAG.to_string());
        keywords.push(GUARANTEE_TAG.to_string());
    }

    keywords
}

/// The sentence the loan form is summarised into before keyword extraction.
pub fn describe_applicant(profile: &ApplicantProfile) -> String {
    use crate::loan::format::won;

    format!(
        "나이 {}세, 연소득 {}원, 신용점수 {}점으로 {}원 대출을 받고 싶습니다.",
        profile.age,
        won(profile.annual_income),
        profile.credit_score,
        won(profile.desired_amount)
    )
}
