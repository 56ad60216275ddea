//! Typed knowledge records, one struct per category.
//!
//! The source tables are loosely keyed: some entries carry `title`, others
//! `name`; some `description`, others `content`. Each record keeps the keys it
//! knows as explicit optional fields, preserves everything else in `extra`,
//! and answers "what do I call this" through `KnowledgeRecord` instead of
//! callers probing for keys.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Capability accessors shared by every record kind.
pub trait KnowledgeRecord {
    /// Best human-readable title, empty when the record has none.
    fn display_title(&self) -> &str;
    /// Best human-readable description, empty when the record has none.
    fn display_description(&self) -> &str;
}

/// Title/description keys that appear across the tables under varying names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Descriptor {
    fn title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref().or(self.content.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Regulation {
    #[serde(flatten)]
    pub text: Descriptor,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Regulation {
    /// Body text the regulation filters match against.
    pub fn body(&self) -> &str {
        self.text.content.as_deref().unwrap_or("")
    }
}

impl KnowledgeRecord for Regulation {
    fn display_title(&self) -> &str {
        self.text.title().unwrap_or("")
    }

    fn display_description(&self) -> &str {
        self.text.description().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub min_credit_score: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub min_income: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub min_amount: i64,
    /// `None` means no upper bound.
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_amount: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KnowledgeRecord for LoanProduct {
    fn display_title(&self) -> &str {
        &self.name
    }

    fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .or_else(|| self.extra.get("content").and_then(Value::as_str))
            .unwrap_or("")
    }
}

/// Shared shape of the three category-keyed tables.
macro_rules! categorized_record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default)]
            pub category: String,
            #[serde(flatten)]
            pub text: Descriptor,
            #[serde(flatten)]
            pub extra: Map<String, Value>,
        }

        impl KnowledgeRecord for $name {
            fn display_title(&self) -> &str {
                self.text.title().unwrap_or(self.category.as_str())
            }

            fn display_description(&self) -> &str {
                self.text.description().unwrap_or("")
            }
        }
    };
}

categorized_record!(
    /// A credit-scoring criterion (`credit_scoring.json` → `scoring_criteria`).
    ScoringCriterion
);
categorized_record!(
    /// An interest-rate entry (`interest_rates.json` → `interest_rates`).
    InterestRate
);
categorized_record!(
    /// A lending risk factor (`risk_factors.json` → `risk_factors`).
    RiskFactor
);

// ────────────────────────────────────────────────────────────────────────────
// Lenient numeric fields
// ────────────────────────────────────────────────────────────────────────────

/// Accepts integers, floats, numeric strings (with thousands separators) and
/// null. Anything unparseable reads as absent rather than failing the record.
fn number_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
            let cleaned = cleaned.trim();
            cleaned
                .parse::<i64>()
                .ok()
                .or_else(|| cleaned.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0))
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_regulation_title_falls_back_to_name() {
        let reg: Regulation = serde_json::from_value(json!({
            "name": "DSR 규제",
            "content": "총부채원리금상환비율 40% 이내"
        }))
        .unwrap();
        assert_eq!(reg.display_title(), "DSR 규제");
        assert_eq!(reg.display_description(), "총부채원리금상환비율 40% 이내");
        assert_eq!(reg.body(), "총부채원리금상환비율 40% 이내");
    }

    #[test]
    fn test_description_preferred_over_content() {
        let reg: Regulation = serde_json::from_value(json!({
            "title": "LTV",
            "description": "요약",
            "content": "본문"
        }))
        .unwrap();
        assert_eq!(reg.display_description(), "요약");
        assert_eq!(reg.body(), "본문");
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let value = json!({
            "name": "직장인 신용대출",
            "min_credit_score": 650,
            "interest_rate": "4.5~7.0%",
            "features": ["비대면"]
        });
        let product: LoanProduct = serde_json::from_value(value).unwrap();
        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["interest_rate"], "4.5~7.0%");
        assert_eq!(back["features"][0], "비대면");
        assert_eq!(back["min_credit_score"], 650);
    }

    #[test]
    fn test_product_numbers_are_lenient() {
        let product: LoanProduct = serde_json::from_value(json!({
            "name": "주택담보대출",
            "min_income": "30,000,000",
            "min_amount": 10000000.0,
            "max_amount": null
        }))
        .unwrap();
        assert_eq!(product.min_income, 30_000_000);
        assert_eq!(product.min_amount, 10_000_000);
        assert_eq!(product.min_credit_score, 0);
        assert_eq!(product.max_amount, None);
    }

    #[test]
    fn test_categorized_record_title_defaults_to_category() {
        let rate: InterestRate = serde_json::from_value(json!({
            "category": "기준금리",
            "rate": 3.5
        }))
        .unwrap();
        assert_eq!(rate.display_title(), "기준금리");
        assert_eq!(rate.display_description(), "");
        assert_eq!(rate.extra["rate"], 3.5);
    }
}
