//! Knowledge base — the fixed set of JSON reference tables loaded once at
//! startup and shared read-only by every request.
//!
//! A missing file, malformed JSON or absent top-level key empties that one
//! category and is logged; it never stops the process.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

pub mod handlers;
pub mod records;

pub use records::{
    InterestRate, KnowledgeRecord, LoanProduct, Regulation, RiskFactor, ScoringCriterion,
};

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} has no top-level array under '{key}'")]
    MissingKey { path: PathBuf, key: &'static str },
}

/// The five knowledge categories and where each one lives on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Regulations,
    Products,
    ScoringCriteria,
    Rates,
    Risks,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Regulations,
        Category::Products,
        Category::ScoringCriteria,
        Category::Rates,
        Category::Risks,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Category::Regulations => "loan_regulations.json",
            Category::Products => "loan_products.json",
            Category::ScoringCriteria => "credit_scoring.json",
            Category::Rates => "interest_rates.json",
            Category::Risks => "risk_factors.json",
        }
    }

    /// Top-level key holding the record array inside the file.
    pub fn array_key(self) -> &'static str {
        match self {
            Category::Regulations => "regulations",
            Category::Products => "products",
            Category::ScoringCriteria => "scoring_criteria",
            Category::Rates => "interest_rates",
            Category::Risks => "risk_factors",
        }
    }

    /// Short name used in URLs, prompts and search results.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Regulations => "regulations",
            Category::Products => "products",
            Category::ScoringCriteria => "scoring",
            Category::Rates => "rates",
            Category::Risks => "risks",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Load outcome for one category, kept for the operator summary endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatus {
    pub category: Category,
    pub file: String,
    pub records: usize,
    pub skipped: usize,
    pub error: Option<String>,
}

/// Immutable snapshot of every knowledge table.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub regulations: Vec<Regulation>,
    pub products: Vec<LoanProduct>,
    pub scoring_criteria: Vec<ScoringCriterion>,
    pub rates: Vec<InterestRate>,
    pub risks: Vec<RiskFactor>,
    pub status: Vec<CategoryStatus>,
}

impl KnowledgeBase {
    /// Loads every category from `dir`. Always succeeds; failed categories
    /// are empty and recorded in `status`.
    pub fn load_from_dir(dir: &Path) -> Self {
        let mut kb = KnowledgeBase::default();

        kb.regulations = kb.load_category(dir, Category::Regulations);
        kb.products = kb.load_category(dir, Category::Products);
        kb.scoring_criteria = kb.load_category(dir, Category::ScoringCriteria);
        kb.rates = kb.load_category(dir, Category::Rates);
        kb.risks = kb.load_category(dir, Category::Risks);

        let loaded = kb.status.iter().filter(|s| s.error.is_none()).count();
        let records: usize = Category::ALL.iter().map(|c| kb.len(*c)).sum();
        info!(
            "Knowledge base ready: {loaded}/{} categories, {records} records from {}",
            Category::ALL.len(),
            dir.display()
        );
        kb
    }

    fn load_category<T: DeserializeOwned>(&mut self, dir: &Path, category: Category) -> Vec<T> {
        let path = dir.join(category.file_name());
        let (records, skipped, error) = match read_records::<T>(&path, category.array_key()) {
            Ok((records, skipped)) => {
                info!(
                    "Loaded {} {} records from {}",
                    records.len(),
                    category,
                    path.display()
                );
                (records, skipped, None)
            }
            Err(e) => {
                warn!("Knowledge category '{category}' is empty: {e}");
                (Vec::new(), 0, Some(e.to_string()))
            }
        };

        self.status.push(CategoryStatus {
            category,
            file: category.file_name().to_string(),
            records: records.len(),
            skipped,
            error,
        });
        records
    }

    /// Number of records held for a category.
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Regulations => self.regulations.len(),
            Category::Products => self.products.len(),
            Category::ScoringCriteria => self.scoring_criteria.len(),
            Category::Rates => self.rates.len(),
            Category::Risks => self.risks.len(),
        }
    }

    /// Records of a category as raw JSON values.
    pub fn records_json(&self, category: Category) -> Result<Vec<Value>, serde_json::Error> {
        match category {
            Category::Regulations => to_values(&self.regulations),
            Category::Products => to_values(&self.products),
            Category::ScoringCriteria => to_values(&self.scoring_criteria),
            Category::Rates => to_values(&self.rates),
            Category::Risks => to_values(&self.risks),
        }
    }
}

fn to_values<T: Serialize>(records: &[T]) -> Result<Vec<Value>, serde_json::Error> {
    records.iter().map(serde_json::to_value).collect()
}

/// Reads the array under `key` and deserializes each element. Elements that
/// do not fit the record shape are skipped and counted, not fatal.
fn read_records<T: DeserializeOwned>(
    path: &Path,
    key: &'static str,
) -> Result<(Vec<T>, usize), KnowledgeError> {
    let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut document: Value = serde_json::from_str(&raw).map_err(|source| KnowledgeError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let items = match document.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(KnowledgeError::MissingKey {
                path: path.to_path_buf(),
                key,
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!("Skipping record {index} in {}: {e}", path.display());
            }
        }
    }

    Ok((records, skipped))
}
