//! Relevance search over the knowledge snapshot.
//!
//! Regulations, scoring criteria, rates and risks are rule filters that keep
//! record order and cut to a fixed top-N. Products are scored instead: every
//! product gets a weighted match score against the applicant and only those
//! scoring at least `PRODUCT_MIN_SCORE` are recommended.

use serde::Serialize;
use tracing::debug;

use crate::knowledge::{
    InterestRate, KnowledgeBase, LoanProduct, Regulation, RiskFactor, ScoringCriterion,
};
use crate::loan::format::won;
use crate::loan::keywords::{
    PREFERRED_TAG, PREMIUM_MIN_CREDIT, PREMIUM_TAG, SENIOR_MIN_AGE, SENIOR_TAG,
    YOUTH_MAX_AGE, YOUTH_TAG,
};
use crate::loan::models::{ApplicantProfile, ScoredProduct};

pub const REGULATION_LIMIT: usize = 5;
pub const PRODUCT_LIMIT: usize = 5;
pub const SCORING_LIMIT: usize = 3;
pub const RATE_LIMIT: usize = 3;
pub const RISK_LIMIT: usize = 3;

pub const PRODUCT_MIN_SCORE: u32 = 40;

const RATIO_TERMS: &[&str] = &["DTI", "LTV", "DSR"];
const DEMOGRAPHIC_TERMS: &[&str] = &["연령", "소득", "신용점수"];
const SCORING_TERMS: &[&str] = &["신용점수", "소득", "연령", "고용"];
const GENERAL_RATE_CATEGORIES: &[&str] = &["기준금리", "변동금리", "고정금리"];
const GENERAL_RISK_CATEGORIES: &[&str] = &["시장 리스크", "경제 리스크"];
const OCCUPATION_TERMS: &[&str] = &["직장인", "공무원", "교사"];

/// Applicants below this credit score see credit risk factors.
const CREDIT_RISK_BELOW: u32 = 700;
/// Applicants below this income see income risk factors.
const INCOME_RISK_BELOW: i64 = 30_000_000;

/// How far below a product's minimum credit score an applicant is still considered.
const CREDIT_GRACE_POINTS: i64 = 50;
/// Fraction of a product's minimum income that still earns partial credit.
const INCOME_GRACE_RATIO: f64 = 0.8;

const DEFAULT_MATCH_REASON: &str = "기본 자격 조건 충족";

/// Search results for one applicant, one list per category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelevantContent {
    pub regulations: Vec<Regulation>,
    pub products: Vec<ScoredProduct>,
    pub scoring: Vec<ScoringCriterion>,
    pub rates: Vec<InterestRate>,
    pub risks: Vec<RiskFactor>,
}

/// Runs every category search against the snapshot.
pub fn search_relevant_content(
    knowledge: &KnowledgeBase,
    keywords: &[String],
    profile: &ApplicantProfile,
) -> RelevantContent {
    debug!("Searching knowledge with keywords {:?}", keywords);

    let content = RelevantContent {
        regulations: search_regulations(&knowledge.regulations),
        products: search_products(&knowledge.products, profile),
        scoring: search_scoring(&knowledge.scoring_criteria),
        rates: search_rates(&knowledge.rates, profile),
        risks: search_risks(&knowledge.risks, profile),
    };

    debug!(
        "Search hits: regulations={}, products={}, scoring={}, rates={}, risks={}",
        content.regulations.len(),
        content.products.len(),
        content.scoring.len(),
        content.rates.len(),
        content.risks.len()
    );
    content
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Regulations about DTI/LTV/DSR or demographic criteria, in file order.
pub fn search_regulations(regulations: &[Regulation]) -> Vec<Regulation> {
    regulations
        .iter()
        .filter(|reg| {
            let body = reg.body();
            contains_any(body, RATIO_TERMS) || contains_any(body, DEMOGRAPHIC_TERMS)
        })
        .take(REGULATION_LIMIT)
        .cloned()
        .collect()
}

/// Weighted match score of one product and the reasons behind it, in rule order.
pub fn score_product(product: &LoanProduct, profile: &ApplicantProfile) -> (u32, Vec<String>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    let credit_score = i64::from(profile.credit_score);
    let name = product.name.as_str();

    // Credit score
    if credit_score >= product.min_credit_score {
        score += 30;
        if profile.credit_score >= PREMIUM_MIN_CREDIT && name.contains(PREMIUM_TAG) {
            score += 20;
            reasons.push("프리미엄 고객 대상".to_string());
        }
    } else if credit_score >= product.min_credit_score - CREDIT_GRACE_POINTS {
        score += 15;
        reasons.push("신용점수 개선 시 가능".to_string());
    }

    // Income
    if profile.annual_income >= product.min_income {
        score += 25;
    } else if profile.annual_income as f64 >= product.min_income as f64 * INCOME_GRACE_RATIO {
        score += 15;
        reasons.push("소득 조건 근접".to_string());
    }

    // Requested amount
    let amount = profile.desired_amount;
    let within_max = product.max_amount.map_or(true, |max| amount <= max);
    if amount >= product.min_amount && within_max {
        score += 25;
    } else if let Some(max) = product.max_amount.filter(|max| amount > *max) {
        score += 10;
        reasons.push(format!("최대 {}원까지 가능", won(max)));
    } else {
        score += 15;
        reasons.push(format!("최소 {}원부터 가능", won(product.min_amount)));
    }

    // Age-targeted products
    if profile.age < YOUTH_MAX_AGE && name.contains(YOUTH_TAG) {
        score += 20;
        reasons.push("청년 우대 상품".to_string());
    } else if profile.age >= SENIOR_MIN_AGE && name.contains(SENIOR_TAG) {
        score += 20;
        reasons.push("시니어 전용 상품".to_string());
    }

    // Occupation-targeted products are open to every applicant
    if contains_any(name, OCCUPATION_TERMS) {
        score += 10;
    }

    (score, reasons)
}

/// Products scoring at least `PRODUCT_MIN_SCORE`, best first. Ties keep
/// catalogue order.
pub fn search_products(products: &[LoanProduct], profile: &ApplicantProfile) -> Vec<ScoredProduct> {
    let mut suitable: Vec<ScoredProduct> = products
        .iter()
        .filter_map(|product| {
            let (match_score, all_reasons) = score_product(product, profile);
            if match_score < PRODUCT_MIN_SCORE {
                return None;
            }
            let match_reason = all_reasons
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_MATCH_REASON.to_string());
            Some(ScoredProduct {
                product: product.clone(),
                match_score,
                match_reason,
                all_reasons,
            })
        })
        .collect();

    // stable: equal scores stay in catalogue order
    suitable.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    suitable.truncate(PRODUCT_LIMIT);
    suitable
}

/// Scoring criteria whose category concerns credit, income, age or employment.
pub fn search_scoring(criteria: &[ScoringCriterion]) -> Vec<ScoringCriterion> {
    criteria
        .iter()
        .filter(|c| contains_any(&c.category, SCORING_TERMS))
        .take(SCORING_LIMIT)
        .cloned()
        .collect()
}

/// Preferential rates for premium credit, youth rates for young applicants,
/// and the general base/variable/fixed rate tables.
pub fn search_rates(rates: &[InterestRate], profile: &ApplicantProfile) -> Vec<InterestRate> {
    rates
        .iter()
        .filter(|rate| {
            let category = rate.category.as_str();
            (profile.credit_score >= PREMIUM_MIN_CREDIT && category.contains(PREFERRED_TAG))
                || (profile.age < YOUTH_MAX_AGE && category.contains(YOUTH_TAG))
                || GENERAL_RATE_CATEGORIES.contains(&category)
        })
        .take(RATE_LIMIT)
        .cloned()
        .collect()
}

/// Risk factors matching the applicant's weak spots, plus market-wide risks.
pub fn search_risks(risks: &[RiskFactor], profile: &ApplicantProfile) -> Vec<RiskFactor> {
    risks
        .iter()
        .filter(|risk| {
            let category = risk.category.as_str();
            (profile.credit_score < CREDIT_RISK_BELOW && category.contains("신용"))
                || (profile.annual_income < INCOME_RISK_BELOW && category.contains("소득"))
                || (profile.age >= SENIOR_MIN_AGE && category.contains("고용"))
                || GENERAL_RISK_CATEGORIES.contains(&category)
        })
        .take(RISK_LIMIT)
        .cloned()
        .collect()
}
