//! Loan pre-screening: DTI, keyword extraction, knowledge search, approval
//! scoring and the explanation that goes back to the client.

pub mod advisor;
pub mod dti;
pub mod explanation;
pub mod format;
pub mod handlers;
pub mod keywords;
pub mod models;
pub mod prompts;
pub mod scoring;
pub mod search;
