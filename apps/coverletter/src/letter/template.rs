//! Letter template: a fixed text with named `{{placeholder}}` markers.
//!
//! A template is only constructed through `LetterTemplate::parse`, which guarantees every
//! known placeholder appears exactly once and nothing else looks like a marker. Rendering is
//! a single pass, so substituted values are never re-scanned.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::letter::composer::LetterFields;

pub const PLACEHOLDERS: &[&str] = &[
    "position",
    "company",
    "experience_summary",
    "motivation",
    "skills_summary",
    "candidate_name",
];

pub const DEFAULT_TEMPLATE: &str = "Dear Hiring Manager,

I am writing to express my strong interest in {{position}} position at {{company}}. With my background and skills that align well with your requirements, I am excited about the opportunity to contribute to your team.

{{experience_summary}}

I am particularly drawn to this opportunity because {{motivation}}. I believe my experience in {{skills_summary}} makes me an ideal candidate for this role.

Thank you for considering my application. I look forward to the opportunity to discuss how my skills and enthusiasm can contribute to your continued success.

Sincerely,
{{candidate_name}}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z_]+)\}\}").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{{{0}}}}}'")]
    UnknownPlaceholder(String),

    #[error("placeholder '{{{{{0}}}}}' is missing")]
    MissingPlaceholder(String),

    #[error("placeholder '{{{{{name}}}}}' appears {count} times, expected once")]
    DuplicatePlaceholder { name: String, count: usize },

    #[error("stray placeholder marker near byte {0}")]
    StrayMarker(usize),
}

/// A validated letter template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LetterTemplate {
    text: String,
}

impl LetterTemplate {
    pub fn parse(text: impl Into<String>) -> Result<Self, TemplateError> {
        let text = text.into();
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for caps in PLACEHOLDER_RE.captures_iter(&text) {
            let name = caps.get(1).map_or("", |m| m.as_str());
            if !PLACEHOLDERS.contains(&name) {
                return Err(TemplateError::UnknownPlaceholder(name.to_string()));
            }
            *counts.entry(name).or_default() += 1;
        }

        for &name in PLACEHOLDERS {
            match counts.get(name).copied().unwrap_or(0) {
                0 => return Err(TemplateError::MissingPlaceholder(name.to_string())),
                1 => {}
                count => {
                    return Err(TemplateError::DuplicatePlaceholder {
                        name: name.to_string(),
                        count,
                    })
                }
            }
        }

        // Anything that still looks like a marker once the real ones are gone is malformed.
        let stripped = PLACEHOLDER_RE.replace_all(&text, "");
        if let Some(pos) = stripped.find("{{").or_else(|| stripped.find("}}")) {
            return Err(TemplateError::StrayMarker(pos));
        }

        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Substitutes every placeholder in one pass.
    pub fn render(&self, fields: &LetterFields) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.text, |caps: &Captures| {
                fields.value_of(&caps[1]).unwrap_or_default()
            })
            .into_owned()
    }
}

impl Default for LetterTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl TryFrom<String> for LetterTemplate {
    type Error = TemplateError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

impl From<LetterTemplate> for String {
    fn from(template: LetterTemplate) -> Self {
        template.text
    }
}

/// True if `text` still contains a `{{name}}` marker.
#[cfg(test)]
pub fn contains_placeholder(text: &str) -> bool {
    PLACEHOLDER_RE.is_match(text)
}
