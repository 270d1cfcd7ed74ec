//! Skill Matcher: intersects a vocabulary category against résumé and JD text.
//!
//! Algorithm:
//! 1. Case-fold both texts.
//! 2. For each term, in vocabulary order, keep it iff the term is a substring of BOTH texts.
//! 3. Apply the group's display casing, truncate to the category cap.
//!
//! Pure substring containment: no tokenization, no stemming. A term nested in another
//! ("java" in "javascript", "go" in "good") matches on its own. That imprecision is accepted.

use serde::{Deserialize, Serialize};

use crate::letter::vocabulary::SkillCategory;

/// Matched terms in vocabulary order, never longer than `cap`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub terms: Vec<String>,
    pub cap: usize,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Comma-separated rendering used in letter prose.
    pub fn joined(&self) -> String {
        self.terms.join(", ")
    }
}

/// Returns the category terms present in both texts.
pub fn match_category(resume_text: &str, job_text: &str, category: &SkillCategory) -> MatchResult {
    let resume_lower = resume_text.to_lowercase();
    let job_lower = job_text.to_lowercase();

    let terms = category
        .terms()
        .filter(|(term, _)| !term.is_empty())
        .filter(|(term, _)| job_lower.contains(term) && resume_lower.contains(term))
        .map(|(term, casing)| casing.apply(term))
        .take(category.cap)
        .collect();

    MatchResult {
        terms,
        cap: category.cap,
    }
}
