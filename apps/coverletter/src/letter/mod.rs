// Letter synthesis core.
// Pure functions over decoded text; file and PDF handling live in `documents` and `render`.

pub mod composer;
pub mod config;
pub mod handlers;
pub mod name_extractor;
pub mod skill_matcher;
pub mod template;
pub mod vocabulary;

pub use composer::{generate, ComposedLetter, CoverLetterOutcome, LetterInput, SaveOutcome};
pub use config::LetterConfig;
