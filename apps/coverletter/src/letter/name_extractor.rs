//! Name Extractor: best-effort detection of the candidate's name from the top of a résumé.
//!
//! Résumé headers are unstructured, so this never fails: when nothing convincing is found
//! the result is `CandidateName::Placeholder`, rendered as "Your Name".
//!
//! Cascade (first success wins):
//! 1. First 5 non-empty lines, skipping header noise ("resume", "contact", "email", ...).
//! 2. Per line, an ordered list of (pattern, validator) strategies.
//! 3. Fallback: the first two tokens of one of the first 3 non-empty lines.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const NAME_PLACEHOLDER: &str = "Your Name";

const MAX_HEADER_LINES: usize = 5;
const MAX_FALLBACK_LINES: usize = 3;

/// Lines containing any of these (case-insensitive) are headers, not names.
const HEADER_STOPLIST: &[&str] = &["resume", "cv", "contact", "phone", "email", "address"];

/// Which heuristic produced the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStrategy {
    PlainName,
    MiddleInitial,
    LabeledName,
    LeadingTokens,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateName {
    Extracted { name: String, strategy: NameStrategy },
    Placeholder,
}

impl CandidateName {
    pub fn as_str(&self) -> &str {
        match self {
            CandidateName::Extracted { name, .. } => name,
            CandidateName::Placeholder => NAME_PLACEHOLDER,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, CandidateName::Placeholder)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Strategy list
// ────────────────────────────────────────────────────────────────────────────

struct NamePattern {
    strategy: NameStrategy,
    regex: Regex,
}

/// Separator allowed after a bare name: "Jane Smith | Engineer", "Jane Smith - Berlin".
const TRAILER: &str = r"\s*(?:[|,•\-–—].*)?$";
const WORD: &str = r"[A-Z][A-Za-z'\-]+";

static NAME_PATTERNS: LazyLock<Vec<NamePattern>> = LazyLock::new(|| {
    vec![
        NamePattern {
            strategy: NameStrategy::PlainName,
            regex: Regex::new(&format!(r"^({WORD}(?:\s+{WORD}){{1,2}}){TRAILER}"))
                .expect("valid regex"),
        },
        NamePattern {
            strategy: NameStrategy::MiddleInitial,
            regex: Regex::new(&format!(r"^({WORD}\s+[A-Z]\.\s+{WORD}){TRAILER}"))
                .expect("valid regex"),
        },
        NamePattern {
            strategy: NameStrategy::LabeledName,
            regex: Regex::new(&format!(
                r"^(?i:full\s+name|name)\s*:\s*({WORD}(?:\s+{WORD}){{1,2}}){TRAILER}"
            ))
            .expect("valid regex"),
        },
    ]
});

/// A candidate is a name iff it has 2–3 words, each starting with an uppercase letter.
fn is_valid_name(candidate: &str) -> bool {
    let words: Vec<&str> = candidate.split_whitespace().collect();
    (2..=3).contains(&words.len())
        && words
            .iter()
            .all(|w| w.chars().next().is_some_and(char::is_uppercase))
}

fn is_header_noise(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_STOPLIST.iter().any(|word| lower.contains(word))
}

fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn match_line(line: &str) -> Option<CandidateName> {
    NAME_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.regex.captures(line)?.get(1)?.as_str();
        let name = captured.split_whitespace().collect::<Vec<_>>().join(" ");
        is_valid_name(&name).then_some(CandidateName::Extracted {
            name,
            strategy: pattern.strategy,
        })
    })
}

fn leading_tokens(line: &str) -> Option<CandidateName> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    let second = tokens.next()?;
    let looks_like_name = |t: &str| {
        t.chars().count() > 1
            && t.chars().all(char::is_alphabetic)
            && t.chars().next().is_some_and(char::is_uppercase)
    };
    (looks_like_name(first) && looks_like_name(second)).then(|| CandidateName::Extracted {
        name: format!("{first} {second}"),
        strategy: NameStrategy::LeadingTokens,
    })
}

/// Extracts the candidate's full name, or `CandidateName::Placeholder`.
pub fn extract_name(resume_text: &str) -> CandidateName {
    let from_header = non_empty_lines(resume_text)
        .take(MAX_HEADER_LINES)
        .filter(|line| !is_header_noise(line))
        .find_map(match_line);

    from_header
        .or_else(|| {
            non_empty_lines(resume_text)
                .take(MAX_FALLBACK_LINES)
                .find_map(leading_tokens)
        })
        .unwrap_or(CandidateName::Placeholder)
}
