//! Letter Composer: merges matcher and name-extractor output into the letter template.
//!
//! Flow: match experience terms → match key skills → extract name → build `LetterFields`
//!       → single-pass template render → (optional) save to disk.
//!
//! Composition is a pure function of its inputs. Persistence failures are reported in the
//! returned `SaveOutcome` and never discard the composed text.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::documents::text_file::write_text_file;
use crate::letter::config::LetterConfig;
use crate::letter::name_extractor::{extract_name, CandidateName};
use crate::letter::skill_matcher::{match_category, MatchResult};

const DEFAULT_POSITION: &str = "the position";
const DEFAULT_COMPANY: &str = "the organization";
const DEFAULT_SKILLS: &str = "software development, problem-solving, and team collaboration";
const GENERIC_EXPERIENCE: &str = "My professional background has equipped me with the technical \
skills and experience that align well with the requirements outlined in your job posting.";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Raw inputs for one letter. Blank company/position are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LetterInput {
    pub resume_text: String,
    pub job_text: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Values substituted into the template, one per placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterFields {
    /// Position phrase including its article: "the Backend Engineer" or "the position".
    pub position: String,
    pub company: String,
    pub experience_summary: String,
    pub motivation: String,
    pub skills_summary: String,
    pub candidate_name: String,
}

impl LetterFields {
    pub fn value_of(&self, placeholder: &str) -> Option<&str> {
        let value = match placeholder {
            "position" => &self.position,
            "company" => &self.company,
            "experience_summary" => &self.experience_summary,
            "motivation" => &self.motivation,
            "skills_summary" => &self.skills_summary,
            "candidate_name" => &self.candidate_name,
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComposedLetter {
    pub text: String,
    pub fields: LetterFields,
    pub candidate_name: CandidateName,
    pub experience_matches: MatchResult,
    pub key_skill_matches: MatchResult,
}

/// Result of persisting the plain-text letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { path: PathBuf, bytes: u64 },
    Failed { path: PathBuf, reason: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// A composed letter plus the optional save result.
#[derive(Debug, Clone, Serialize)]
pub struct CoverLetterOutcome {
    pub letter: ComposedLetter,
    pub save: Option<SaveOutcome>,
}

impl CoverLetterOutcome {
    /// Human-readable report, as shown by the CLI.
    pub fn message(&self) -> String {
        let text = &self.letter.text;
        match &self.save {
            None => format!("Cover letter generated:\n\n{text}"),
            Some(SaveOutcome::Saved { path, .. }) => format!(
                "Cover letter generated and saved to {}:\n\n{text}",
                path.display()
            ),
            Some(SaveOutcome::Failed { path, reason }) => format!(
                "Cover letter generated but failed to save to {}: {reason}\n\n{text}",
                path.display()
            ),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Removes brace characters so no value can smuggle a placeholder marker into the output.
fn sanitize(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '{' | '}')).collect()
}

fn experience_summary(matches: &MatchResult) -> String {
    if matches.is_empty() {
        return GENERIC_EXPERIENCE.to_string();
    }
    format!(
        "My experience with {} directly aligns with your requirements. I have successfully \
         applied these technologies in previous roles to deliver high-quality solutions and \
         drive business results.",
        matches.joined()
    )
}

fn skills_summary(matches: &MatchResult) -> String {
    if matches.is_empty() {
        DEFAULT_SKILLS.to_string()
    } else {
        matches.joined()
    }
}

/// Builds the letter for `input` using the vocabulary and template in `config`.
pub fn compose(config: &LetterConfig, input: &LetterInput) -> ComposedLetter {
    let experience_matches = match_category(
        &input.resume_text,
        &input.job_text,
        &config.vocabulary.experience,
    );
    let key_skill_matches = match_category(
        &input.resume_text,
        &input.job_text,
        &config.vocabulary.key_skills,
    );
    let candidate_name = extract_name(&input.resume_text);

    let title = non_blank(input.position.as_deref());
    let company = non_blank(input.company.as_deref()).unwrap_or(DEFAULT_COMPANY);

    let fields = LetterFields {
        position: title.map_or_else(|| DEFAULT_POSITION.to_string(), |t| format!("the {t}")),
        company: company.to_string(),
        experience_summary: experience_summary(&experience_matches),
        motivation: format!(
            "it aligns with my career goals and offers the opportunity to apply my skills in {}",
            title.map_or_else(|| DEFAULT_POSITION.to_string(), str::to_lowercase)
        ),
        skills_summary: skills_summary(&key_skill_matches),
        candidate_name: candidate_name.as_str().to_string(),
    };
    let fields = LetterFields {
        position: sanitize(&fields.position),
        company: sanitize(&fields.company),
        experience_summary: sanitize(&fields.experience_summary),
        motivation: sanitize(&fields.motivation),
        skills_summary: sanitize(&fields.skills_summary),
        candidate_name: sanitize(&fields.candidate_name),
    };

    debug!(
        "Composed letter: {} experience matches, {} key skills, name placeholder: {}",
        experience_matches.len(),
        key_skill_matches.len(),
        candidate_name.is_placeholder()
    );

    ComposedLetter {
        text: config.template.render(&fields),
        fields,
        candidate_name,
        experience_matches,
        key_skill_matches,
    }
}

/// Writes `text` to `path`, creating missing parent directories.
pub fn save_letter(text: &str, path: &Path) -> SaveOutcome {
    match write_text_file(path, text) {
        Ok(()) => {
            let bytes = text.len() as u64;
            info!("Cover letter saved to {} ({bytes} bytes)", path.display());
            SaveOutcome::Saved {
                path: path.to_path_buf(),
                bytes,
            }
        }
        Err(e) => {
            warn!("Failed to save cover letter to {}: {e}", path.display());
            SaveOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}

/// Composes the letter and, when `output` is given, saves it.
pub fn generate(config: &LetterConfig, input: &LetterInput, output: Option<&Path>) -> CoverLetterOutcome {
    let letter = compose(config, input);
    let save = output.map(|path| save_letter(&letter.text, path));
    CoverLetterOutcome { letter, save }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::letter::template::contains_placeholder;

    const RESUME: &str = "Jane Smith
Software Engineer
Email: jane@example.com

EXPERIENCE
- Built Python services and React dashboards on AWS
- Ran Docker and Kubernetes clusters";

    const JOB: &str = "We are hiring an engineer with Python, React, Docker and AWS experience.";

    fn input(company: Option<&str>, position: Option<&str>) -> LetterInput {
        LetterInput {
            resume_text: RESUME.to_string(),
            job_text: JOB.to_string(),
            company: company.map(String::from),
            position: position.map(String::from),
        }
    }

    #[test]
    fn test_full_letter_fields() {
        let letter = compose(
            &LetterConfig::default(),
            &input(Some("Acme Corp"), Some("Backend Engineer")),
        );
        assert!(letter
            .text
            .contains("strong interest in the Backend Engineer position at Acme Corp."));
        assert!(letter.text.contains("apply my skills in backend engineer."));
        assert!(letter.text.contains("My experience with python, react, aws, docker"));
        assert!(letter.text.contains("my experience in Python, react, aws makes me"));
        assert!(letter.text.ends_with("Sincerely,\nJane Smith"));
        assert_eq!(letter.candidate_name.as_str(), "Jane Smith");
    }

    #[test]
    fn test_empty_company_and_position_use_generic_phrases() {
        let letter = compose(&LetterConfig::default(), &input(Some(""), Some("   ")));
        assert!(letter
            .text
            .contains("interest in the position position at the organization."));
        assert_eq!(letter.fields.position, "the position");
        assert_eq!(letter.fields.company, "the organization");
        assert!(letter.text.contains("apply my skills in the position."));
    }

    #[test]
    fn test_no_matches_use_filler_text() {
        let letter = compose(
            &LetterConfig::default(),
            &LetterInput {
                resume_text: "Pastry chef".to_string(),
                job_text: "Accountant".to_string(),
                ..LetterInput::default()
            },
        );
        assert_eq!(letter.fields.experience_summary, GENERIC_EXPERIENCE);
        assert_eq!(letter.fields.skills_summary, DEFAULT_SKILLS);
        assert!(letter.experience_matches.is_empty());
    }

    #[test]
    fn test_python_and_react_skills_in_letter() {
        let letter = compose(
            &LetterConfig::default(),
            &LetterInput {
                resume_text: "Python and React".to_string(),
                job_text: "Python and React".to_string(),
                ..LetterInput::default()
            },
        );
        assert_eq!(letter.key_skill_matches.terms, vec!["Python", "react"]);
        assert_eq!(letter.fields.skills_summary, "Python, react");
    }

    #[test]
    fn test_placeholder_name_in_signature() {
        let letter = compose(
            &LetterConfig::default(),
            &LetterInput {
                resume_text: "📞 ✉\n555 0100".to_string(),
                job_text: String::new(),
                ..LetterInput::default()
            },
        );
        assert!(letter.candidate_name.is_placeholder());
        assert!(letter.text.ends_with("Sincerely,\nYour Name"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let config = LetterConfig::default();
        let first = compose(&config, &input(Some("Acme"), Some("SRE")));
        let second = compose(&config, &input(Some("Acme"), Some("SRE")));
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_no_placeholders_survive_hostile_inputs() {
        let config = LetterConfig::default();
        let cases = [
            input(Some("{{company}}"), Some("{{position}}")),
            input(Some("{{{{candidate_name}}}}"), None),
            input(None, Some("}}{{motivation")),
            LetterInput {
                resume_text: "{{skills_summary}} Smith\npython".to_string(),
                job_text: "{{experience_summary}} python".to_string(),
                ..LetterInput::default()
            },
            LetterInput::default(),
        ];
        for case in &cases {
            let letter = compose(&config, case);
            assert!(
                !contains_placeholder(&letter.text),
                "placeholder leaked for {case:?}: {}",
                letter.text
            );
        }
    }

    #[test]
    fn test_generate_without_output_does_not_save() {
        let outcome = generate(&LetterConfig::default(), &input(None, None), None);
        assert!(outcome.save.is_none());
        assert!(outcome.message().starts_with("Cover letter generated:\n\n"));
    }

    #[test]
    fn test_generate_creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("letter.txt");

        let outcome = generate(&LetterConfig::default(), &input(None, None), Some(&path));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, outcome.letter.text);
        assert_eq!(
            outcome.save,
            Some(SaveOutcome::Saved {
                path: path.clone(),
                bytes: written.len() as u64
            })
        );
        let message = outcome.message();
        assert!(message.contains("saved to"));
        assert!(message.contains(&path.display().to_string()));
    }

    #[test]
    fn test_save_failure_keeps_letter() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join("letter.txt");

        let outcome = generate(&LetterConfig::default(), &input(None, None), Some(&path));

        assert!(matches!(outcome.save, Some(SaveOutcome::Failed { .. })));
        assert!(!outcome.letter.text.is_empty());
        assert!(outcome.message().contains("failed to save"));
        assert!(outcome.message().ends_with(&outcome.letter.text));
    }

    #[test]
    fn test_save_to_bare_filename_in_cwd_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.txt");
        assert!(save_letter("hello", &path).is_saved());
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }
}
