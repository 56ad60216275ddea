// Prompt text for the loan analysis call.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::knowledge::KnowledgeRecord;
use crate::llm_client::prompts::{fill_template, join_sections, FRIENDLY_EXPERT_TONE};
use crate::loan::format::won;
use crate::loan::models::ApplicantProfile;
use crate::loan::search::RelevantContent;

/// Items per category embedded in the prompt.
pub const PROMPT_ITEMS_PER_CATEGORY: usize = 3;

pub const ANALYSIS_ROLE: &str = "당신은 전문적인 대출 심사 AI입니다. \
    다음 고객 정보와 관련 규정을 바탕으로 대출 승인 가능성을 분석하고 조언해주세요.";

/// Analysis prompt body.
/// Replace: {age}, {annual_income}, {credit_score}, {desired_amount},
///          {monthly_debt}, {loan_purpose}, {dti}, {knowledge}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"## 고객 정보
- 나이: {age}세
- 연소득: {annual_income}원
- 신용점수: {credit_score}점
- 희망 대출금액: {desired_amount}원
- 기존 월 부채상환액: {monthly_debt}원
- 대출 목적: {loan_purpose}
- 계산된 DTI: {dti}%

## 관련 규정 정보
{knowledge}

다음 마크다운 형식으로 응답해주세요:

## 대출 심사 결과 분석
**승인 가능성: XX%**

(승인 가능성 분석 내용을 ✅🟡⚠️❌ 이모지와 함께 작성)

## DTI(총부채원리금상환비율) 분석
**계산된 DTI: {dti}%**

(DTI 분석 내용)

## 신용점수 분석
**현재 신용점수: {credit_score}점**

(신용점수 분석 내용)

## 맞춤형 조언
- 🎯 (조언 1)
- 💰 (조언 2)
- 📊 (조언 3)

## 다음 단계
1. (단계 1)
2. (단계 2)
3. (단계 3)"#;

/// Builds the full analysis prompt for one applicant.
pub fn build_analysis_prompt(profile: &ApplicantProfile, dti: f64, content: &RelevantContent) -> String {
    let body = fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("age", profile.age.to_string().as_str()),
            ("annual_income", won(profile.annual_income).as_str()),
            ("credit_score", profile.credit_score.to_string().as_str()),
            ("desired_amount", won(profile.desired_amount).as_str()),
            ("monthly_debt", won(profile.monthly_debt).as_str()),
            ("loan_purpose", profile.loan_purpose.as_str()),
            ("dti", dti.to_string().as_str()),
            ("knowledge", format_content_for_prompt(content).as_str()),
        ],
    );

    join_sections(&[ANALYSIS_ROLE, &body, FRIENDLY_EXPERT_TONE])
}

/// Renders the search results as `### CATEGORY` blocks of `- title: description`
/// lines, at most `PROMPT_ITEMS_PER_CATEGORY` per category. Empty categories
/// are left out.
pub fn format_content_for_prompt(content: &RelevantContent) -> String {
    let mut lines = Vec::new();

    push_category(&mut lines, "REGULATIONS", &content.regulations);
    push_category(
        &mut lines,
        "PRODUCTS",
        content.products.iter().map(|p| &p.product),
    );
    push_category(&mut lines, "SCORING", &content.scoring);
    push_category(&mut lines, "RATES", &content.rates);
    push_category(&mut lines, "RISKS", &content.risks);

    lines.join("\n")
}

fn push_category<'a, R, I>(lines: &mut Vec<String>, heading: &str, items: I)
where
    R: KnowledgeRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut items = items.into_iter().take(PROMPT_ITEMS_PER_CATEGORY).peekable();
    if items.peek().is_none() {
        return;
    }
    lines.push(format!("### {heading}"));
    for item in items {
        lines.push(format!(
            "- {}: {}",
            item.display_title(),
            item.display_description()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{LoanProduct, Regulation};
    use crate::loan::models::ScoredProduct;
    use serde_json::json;

    fn profile() -> ApplicantProfile {
        ApplicantProfile {
            age: 30,
            annual_income: 40_000_000,
            credit_score: 750,
            desired_amount: 20_000_000,
            monthly_debt: 500_000,
            loan_purpose: "주택구입".to_string(),
        }
    }

    fn regulation(n: usize) -> Regulation {
        serde_json::from_value(json!({"title": format!("규정{n}"), "content": format!("DTI 내용{n}")}))
            .unwrap()
    }

    #[test]
    fn test_empty_content_formats_to_nothing() {
        assert_eq!(format_content_for_prompt(&RelevantContent::default()), "");
    }

    #[test]
    fn test_at_most_three_items_per_category() {
        let content = RelevantContent {
            regulations: (1..=5).map(regulation).collect(),
            ..RelevantContent::default()
        };
        let text = format_content_for_prompt(&content);
        assert_eq!(text, "### REGULATIONS\n- 규정1: DTI 내용1\n- 규정2: DTI 내용2\n- 규정3: DTI 내용3");
    }

    #[test]
    fn test_products_use_name_and_description() {
        let product: LoanProduct = serde_json::from_value(json!({
            "name": "청년 전용 대출",
            "description": "만 34세 이하"
        }))
        .unwrap();
        let content = RelevantContent {
            products: vec![ScoredProduct {
                product,
                match_score: 95,
                match_reason: "청년 우대 상품".to_string(),
                all_reasons: vec![],
            }],
            ..RelevantContent::default()
        };
        assert_eq!(
            format_content_for_prompt(&content),
            "### PRODUCTS\n- 청년 전용 대출: 만 34세 이하"
        );
    }

    #[test]
    fn test_prompt_embeds_applicant_and_dti() {
        let prompt = build_analysis_prompt(&profile(), 26.32, &RelevantContent::default());
        assert!(prompt.starts_with(ANALYSIS_ROLE));
        assert!(prompt.contains("- 나이: 30세"));
        assert!(prompt.contains("- 연소득: 40,000,000원"));
        assert!(prompt.contains("- 대출 목적: 주택구입"));
        assert!(prompt.contains("**계산된 DTI: 26.32%**"));
        assert!(prompt.ends_with(FRIENDLY_EXPERT_TONE));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_purpose_braces_are_not_expanded() {
        let mut applicant = profile();
        applicant.loan_purpose = "{dti} 용도 {knowledge}".to_string();
        let content = RelevantContent {
            regulations: vec![regulation(1)],
            ..RelevantContent::default()
        };
        let prompt = build_analysis_prompt(&applicant, 12.5, &content);
        assert!(prompt.contains("- 대출 목적: {dti} 용도 {knowledge}\n"));
        assert!(prompt.contains("- 계산된 DTI: 12.5%"));
        assert_eq!(prompt.matches("### REGULATIONS").count(), 1);
    }
}
