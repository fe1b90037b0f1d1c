use serde::{Deserialize, Serialize};

use super::tokenizer::tokenize;

/// Outcome of comparing a job description against a resume.
///
/// Sequences are produced in token order; treat them as sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordComparison {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub unique: Vec<String>,
    pub match_percent: u8,
    pub job_keywords: usize,
    pub resume_keywords: usize,
}

pub fn compare_keywords(job_description: &str, resume: &str) -> KeywordComparison {
    let job_tokens = tokenize(job_description);
    let resume_tokens = tokenize(resume);

    let matched: Vec<String> = job_tokens.intersection(&resume_tokens).cloned().collect();
    let missing: Vec<String> = job_tokens.difference(&resume_tokens).cloned().collect();
    let unique: Vec<String> = resume_tokens.difference(&job_tokens).cloned().collect();

    let match_percent = match_percent(matched.len(), job_tokens.len());

    tracing::debug!(
        job_keywords = job_tokens.len(),
        resume_keywords = resume_tokens.len(),
        matched = matched.len(),
        match_percent,
        "compared keywords"
    );

    KeywordComparison {
        matched,
        missing,
        unique,
        match_percent,
        job_keywords: job_tokens.len(),
        resume_keywords: resume_tokens.len(),
    }
}

/// `round(100 * matched / total)` with halves rounded up; zero when `total` is zero.
fn match_percent(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (200 * matched + total) / (2 * total);
    percent.min(100) as u8
}
