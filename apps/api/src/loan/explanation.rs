//! Templated explanation used whenever generated text is unavailable.
//!
//! Same section layout the analysis prompt asks the generator for, so clients
//! render both the same way. Every tier line carries its `Rating` label.

use crate::loan::keywords::YOUTH_MAX_AGE;
use crate::loan::models::ApplicantProfile;
use crate::loan::scoring::{Rating, HIGH_INCOME};

pub const DISCLAIMER: &str =
    "⚠️ **주의**: 이 결과는 규칙 기반 예상 분석이며, 실제 심사 결과와 다를 수 있습니다.";

fn approval_summary(rating: Rating) -> (&'static str, &'static str) {
    match rating {
        Rating::Excellent => (
            "승인 가능성이 매우 높습니다!",
            "고객님의 신용상태와 소득조건이 우수하여 대출 승인이 원활할 것으로 예상됩니다.",
        ),
        Rating::Good => (
            "승인 가능성이 양호합니다.",
            "전반적인 조건이 적절하나, 일부 개선사항이 있을 수 있습니다.",
        ),
        Rating::Fair => (
            "승인 가능성이 보통입니다.",
            "추가 서류나 조건 개선이 필요할 수 있습니다.",
        ),
        Rating::Poor => (
            "승인이 어려울 수 있습니다.",
            "신용점수나 소득조건 개선 후 재신청을 권장합니다.",
        ),
    }
}

fn dti_summary(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "**DTI가 매우 양호합니다.** 추가 대출 여력이 충분합니다.",
        Rating::Good => "**DTI가 적정 범위입니다.** 안정적인 상환이 가능할 것으로 보입니다.",
        Rating::Fair => "**DTI가 다소 높습니다.** 상환 부담을 신중히 고려해주세요.",
        Rating::Poor => {
            "**DTI가 위험 수준입니다.** 대출금액 조정이나 기존 부채 정리를 권장합니다."
        }
    }
}

fn credit_summary(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "**최우수 신용등급**으로 최저금리 혜택을 받을 수 있습니다.",
        Rating::Good => "**우수한 신용등급**으로 우대금리 적용이 가능합니다.",
        Rating::Fair => "**보통 신용등급**으로 일반 조건으로 대출이 가능합니다.",
        Rating::Poor => "**신용점수 개선이 필요합니다.** 신용관리 후 재신청을 권장합니다.",
    }
}

fn tier_line(rating: Rating, text: &str) -> String {
    format!("{} {} `{}`", rating.emoji(), text, rating.label())
}

fn advice(profile: &ApplicantProfile, dti: f64) -> Vec<&'static str> {
    let mut tips = Vec::new();
    if profile.age < YOUTH_MAX_AGE {
        tips.push("- 🎯 **청년 우대 상품**을 적극 활용하세요.");
    }
    if profile.annual_income >= HIGH_INCOME {
        tips.push("- 💰 **고소득자 전용 상품**을 고려해보세요.");
    }
    if dti > 40.0 {
        tips.push("- 📊 **DTI 개선**을 위해 기존 부채 정리를 우선 고려하세요.");
    }
    if matches!(
        Rating::for_credit(i64::from(profile.credit_score)),
        Rating::Fair | Rating::Poor
    ) {
        tips.push("- 📈 **신용점수 향상**을 위해 연체 방지와 신용카드 사용률을 줄이세요.");
    }
    if tips.is_empty() {
        tips.push("- 💡 현재 조건을 유지하면서 여러 금융기관의 금리를 비교해보세요.");
    }
    tips
}

/// Markdown explanation for `approval_percentage`, the DTI and the applicant's
/// credit score.
pub fn fallback_explanation(profile: &ApplicantProfile, dti: f64, approval_percentage: u8) -> String {
    let approval_rating = Rating::for_approval(approval_percentage);
    let dti_rating = Rating::for_dti(dti);
    let credit_rating = Rating::for_credit(i64::from(profile.credit_score));
    let (headline, detail) = approval_summary(approval_rating);

    let parts = [
        "## 대출 심사 결과 분석".to_string(),
        format!("**승인 가능성: {approval_percentage}%**"),
        tier_line(approval_rating, &format!("**{headline}**")),
        detail.to_string(),
        "## DTI(총부채원리금상환비율) 분석".to_string(),
        format!("**계산된 DTI: {dti}%**"),
        tier_line(dti_rating, dti_summary(dti_rating)),
        "## 신용점수 분석".to_string(),
        format!("**현재 신용점수: {}점**", profile.credit_score),
        tier_line(credit_rating, credit_summary(credit_rating)),
        "## 맞춤형 조언".to_string(),
        advice(profile, dti).join("\n"),
        "## 다음 단계".to_string(),
        [
            "1. 관심 상품의 상세 조건을 확인하세요.",
            "2. 필요 서류를 미리 준비하세요.",
            "3. 영업점 방문 또는 온라인으로 정식 신청하세요.",
        ]
        .join("\n"),
        DISCLAIMER.to_string(),
    ];

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(age: u32, income: i64, credit: u32) -> ApplicantProfile {
        ApplicantProfile {
            age,
            annual_income: income,
            credit_score: credit,
            desired_amount: 20_000_000,
            monthly_debt: 500_000,
            loan_purpose: "생활자금".to_string(),
        }
    }

    #[test]
    fn test_states_percentage_and_dti() {
        let text = fallback_explanation(&profile(30, 40_000_000, 750), 26.32, 90);
        assert!(text.contains("**승인 가능성: 90%**"));
        assert!(text.contains("**계산된 DTI: 26.32%**"));
        assert!(text.contains("**현재 신용점수: 750점**"));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn test_each_tier_is_labelled() {
        let text = fallback_explanation(&profile(30, 40_000_000, 750), 26.32, 90);
        // approval 90 → excellent, dti 26.32 → excellent, credit 750 → good
        assert!(text.contains("✅ **승인 가능성이 매우 높습니다!** `excellent`"));
        assert!(text.contains("✅ **DTI가 매우 양호합니다.** 추가 대출 여력이 충분합니다. `excellent`"));
        assert!(text.contains("🟡 **우수한 신용등급**으로 우대금리 적용이 가능합니다. `good`"));
    }

    #[test]
    fn test_poor_applicant_gets_poor_labels_and_advice() {
        let text = fallback_explanation(&profile(45, 15_000_000, 550), 65.0, 0);
        assert!(text.contains("❌ **승인이 어려울 수 있습니다.** `poor`"));
        assert!(text.contains("**DTI가 위험 수준입니다.**"));
        assert!(text.contains("`poor`"));
        assert!(text.contains("**DTI 개선**"));
        assert!(text.contains("**신용점수 향상**"));
        assert!(!text.contains("청년 우대 상품"));
    }

    #[test]
    fn test_advice_never_empty() {
        let text = fallback_explanation(&profile(40, 40_000_000, 750), 20.0, 90);
        assert!(text.contains("금리를 비교해보세요"));
    }

    #[test]
    fn test_fair_band_labels() {
        let text = fallback_explanation(&profile(40, 25_000_000, 650), 45.0, 50);
        assert!(text.contains("`fair`"));
        assert!(text.contains("**승인 가능성이 보통입니다.**"));
        assert!(text.contains("**보통 신용등급**"));
    }
}
