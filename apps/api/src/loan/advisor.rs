//! Loan assessment pipeline.
//!
//! DTI → keywords → relevance search → baseline score → prompt → one
//! generation call. Every generation failure (no generator, provider error,
//! timeout, empty reply) collapses into the templated explanation, so an
//! assessment always completes.

use tracing::{info, warn};

use crate::knowledge::KnowledgeBase;
use crate::llm_client::{generate_with_timeout, GenerationSettings, TextGenerator};
use crate::loan::dti::{calculate_dti, LoanTerms};
use crate::loan::explanation::fallback_explanation;
use crate::loan::keywords::{describe_applicant, extract_keywords};
use crate::loan::models::{ApplicantProfile, EligibilityResult};
use crate::loan::prompts::build_analysis_prompt;
use crate::loan::scoring::{baseline_approval, resolve_approval, ApprovalSource};
use crate::loan::search::search_relevant_content;

/// Products returned to the client.
pub const RECOMMENDED_PRODUCTS: usize = 3;

/// Assesses one applicant against the knowledge snapshot.
///
/// `generator` is `None` in demo mode.
pub async fn assess_applicant(
    knowledge: &KnowledgeBase,
    generator: Option<&dyn TextGenerator>,
    settings: GenerationSettings,
    profile: &ApplicantProfile,
    terms: LoanTerms,
) -> EligibilityResult {
    let dti = calculate_dti(
        profile.annual_income,
        profile.monthly_debt,
        profile.desired_amount,
        terms,
    );

    let keywords = extract_keywords(&describe_applicant(profile), profile);
    let mut content = search_relevant_content(knowledge, &keywords, profile);
    let baseline = baseline_approval(i64::from(profile.credit_score), dti, profile.annual_income);

    let generated = match generator {
        Some(generator) => {
            let prompt = build_analysis_prompt(profile, dti, &content);
            match generate_with_timeout(generator, &prompt, settings).await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Loan analysis generation failed, using template: {e}");
                    None
                }
            }
        }
        None => None,
    };

    let (approval_percentage, approval_source, explanation) = match generated {
        Some(text) => {
            let (pct, source) = resolve_approval(Some(&text), baseline);
            (pct, source, Some(text))
        }
        None => (baseline, ApprovalSource::Baseline, None),
    };

    let generated = explanation.is_some();
    let explanation =
        explanation.unwrap_or_else(|| fallback_explanation(profile, dti, approval_percentage));

    content.products.truncate(RECOMMENDED_PRODUCTS);

    info!(
        "Loan assessment: dti={dti}, baseline={baseline}, approval={approval_percentage} ({approval_source:?}), generated={generated}, products={}",
        content.products.len()
    );

    EligibilityResult {
        approval_percentage,
        baseline_percentage: baseline,
        approval_source,
        dti,
        explanation,
        generated,
        recommended_products: content.products,
    }
}
