//! Skill vocabulary: the fixed term lists the matcher intersects against résumé and JD text.
//!
//! Two categories drive the letter: a broad "experience" list feeding the narrative paragraph
//! and a narrow "key skills" list (languages + technologies) feeding the skills sentence.
//! Both are plain data so a JSON letter config can replace them without touching logic.

use serde::{Deserialize, Serialize};

/// How a matched term is displayed in the letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Casing {
    /// Keep the vocabulary spelling ("react", "node.js").
    #[default]
    AsIs,
    /// Capitalize every letter that follows a non-letter ("python" → "Python", "c++" → "C++").
    Title,
}

impl Casing {
    pub fn apply(&self, term: &str) -> String {
        match self {
            Casing::AsIs => term.to_string(),
            Casing::Title => title_case(term),
        }
    }
}

/// An ordered run of terms sharing one display casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermGroup {
    #[serde(default)]
    pub casing: Casing,
    pub terms: Vec<String>,
}

/// A matchable category: groups are scanned in order, results truncated to `cap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub cap: usize,
    pub groups: Vec<TermGroup>,
}

impl SkillCategory {
    /// Iterates `(lowercase term, casing)` in vocabulary order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, Casing)> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.terms.iter().map(move |t| (t.as_str(), g.casing)))
    }

    pub fn term_count(&self) -> usize {
        self.groups.iter().map(|g| g.terms.len()).sum()
    }

    /// Lowercases and trims every term, dropping blanks. Comparison is always case-folded.
    fn normalize(&mut self) {
        for group in &mut self.groups {
            group.terms = group
                .terms
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillVocabulary {
    /// Broad competencies used in the "relevant experience" paragraph. Default cap: 5.
    pub experience: SkillCategory,
    /// Languages and technologies used in the compact "key skills" phrase. Default cap: 3.
    pub key_skills: SkillCategory,
}

impl SkillVocabulary {
    pub fn normalized(mut self) -> Self {
        self.experience.normalize();
        self.key_skills.normalize();
        self
    }
}

const EXPERIENCE_TERMS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "node.js",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "scrum",
    "api",
    "database",
    "cloud",
    "machine learning",
    "data analysis",
    "project management",
    "leadership",
];

const LANGUAGE_TERMS: &[&str] = &["python", "java", "javascript", "c++", "c#", "go", "rust", "php"];

const TECHNOLOGY_TERMS: &[&str] = &[
    "react", "angular", "vue", "node.js", "django", "flask", "spring", "aws", "azure", "gcp",
];

pub const DEFAULT_EXPERIENCE_CAP: usize = 5;
pub const DEFAULT_KEY_SKILLS_CAP: usize = 3;

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self {
            experience: SkillCategory {
                cap: DEFAULT_EXPERIENCE_CAP,
                groups: vec![TermGroup {
                    casing: Casing::AsIs,
                    terms: owned(EXPERIENCE_TERMS),
                }],
            },
            key_skills: SkillCategory {
                cap: DEFAULT_KEY_SKILLS_CAP,
                groups: vec![
                    TermGroup {
                        casing: Casing::Title,
                        terms: owned(LANGUAGE_TERMS),
                    },
                    TermGroup {
                        casing: Casing::AsIs,
                        terms: owned(TECHNOLOGY_TERMS),
                    },
                ],
            },
        }
    }
}

fn title_case(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut prev_is_letter = false;
    for c in term.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_languages() {
        assert_eq!(Casing::Title.apply("python"), "Python");
        assert_eq!(Casing::Title.apply("c++"), "C++");
        assert_eq!(Casing::Title.apply("c#"), "C#");
        assert_eq!(Casing::Title.apply("javascript"), "Javascript");
    }

    #[test]
    fn test_title_case_capitalizes_after_punctuation() {
        assert_eq!(Casing::Title.apply("node.js"), "Node.Js");
        assert_eq!(Casing::Title.apply("machine learning"), "Machine Learning");
    }

    #[test]
    fn test_as_is_keeps_spelling() {
        assert_eq!(Casing::AsIs.apply("react"), "react");
    }

    #[test]
    fn test_default_vocabulary_shape() {
        let vocab = SkillVocabulary::default();
        assert_eq!(vocab.experience.cap, 5);
        assert_eq!(vocab.key_skills.cap, 3);
        assert_eq!(vocab.experience.term_count(), 19);
        assert_eq!(vocab.key_skills.term_count(), 18);
        let first: Vec<_> = vocab.key_skills.terms().take(1).collect();
        assert_eq!(first, vec![("python", Casing::Title)]);
    }

    #[test]
    fn test_normalized_lowercases_and_drops_blanks() {
        let vocab = SkillVocabulary {
            experience: SkillCategory {
                cap: 2,
                groups: vec![TermGroup {
                    casing: Casing::AsIs,
                    terms: vec![" Rust ".to_string(), "".to_string(), "GraphQL".to_string()],
                }],
            },
            ..SkillVocabulary::default()
        }
        .normalized();
        assert_eq!(vocab.experience.groups[0].terms, vec!["rust", "graphql"]);
    }

    #[test]
    fn test_casing_deserializes_snake_case() {
        let group: TermGroup =
            serde_json::from_str(r#"{"casing": "title", "terms": ["go"]}"#).unwrap();
        assert_eq!(group.casing, Casing::Title);

        let group: TermGroup = serde_json::from_str(r#"{"terms": ["go"]}"#).unwrap();
        assert_eq!(group.casing, Casing::AsIs);
    }
}
