//! Static catalog of study modes and onboarding questions.
//!
//! The catalog is defined in `catalog.toml` and embedded in the binary at
//! compile time. It is parsed and validated on every load so a bad edit
//! surfaces as a [`CatalogError`] rather than a panic.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::Difficulty;

/// Errors from loading the embedded catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("duplicate mode id: {0:?}")]
    DuplicateModeId(String),

    #[error("duplicate question id: {0:?}")]
    DuplicateQuestionId(String),

    #[error("question {0:?} is a choice question but has no options")]
    MissingOptions(String),

    #[error("difficulty question options {found:?} do not match the known levels")]
    DifficultyMismatch { found: Vec<String> },
}

/// A selectable study mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    /// UI color token.
    pub color: String,
}

/// Input widget kind for an onboarding question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Number,
    Date,
    Multiselect,
    Select,
}

impl QuestionKind {
    /// Whether answers are picked from a fixed option list.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Multiselect | Self::Select)
    }
}

/// One onboarding question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Answer key in the `answers` object (e.g. `hoursPerDay`).
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// The full catalog served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub modes: Vec<ModeInfo>,
    pub questions: Vec<Question>,
}

impl Catalog {
    /// Look up a mode by id.
    pub fn find_mode(&self, id: &str) -> Option<&ModeInfo> {
        self.modes.iter().find(|m| m.id == id)
    }

    /// Look up a question by id.
    pub fn find_question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Options offered by the `subjects` question.
    pub fn subject_options(&self) -> &[String] {
        self.find_question("subjects")
            .map(|q| q.options.as_slice())
            .unwrap_or_default()
    }

    /// Options offered by the `difficulty` question.
    pub fn difficulty_levels(&self) -> &[String] {
        self.find_question("difficulty")
            .map(|q| q.options.as_slice())
            .unwrap_or_default()
    }
}

/// The embedded catalog TOML.
static CATALOG_TOML: &str = include_str!("catalog.toml");

/// Load and validate the embedded catalog.
pub fn load_catalog() -> Result<Catalog, CatalogError> {
    parse_catalog(CATALOG_TOML)
}

/// Parse and validate a catalog TOML string.
pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    let catalog: Catalog = toml::from_str(content)?;
    validate(&catalog)?;
    Ok(catalog)
}

fn validate(catalog: &Catalog) -> Result<(), CatalogError> {
    let mut mode_ids = HashSet::new();
    for mode in &catalog.modes {
        if !mode_ids.insert(mode.id.as_str()) {
            return Err(CatalogError::DuplicateModeId(mode.id.clone()));
        }
    }

    let mut question_ids = HashSet::new();
    for question in &catalog.questions {
        if !question_ids.insert(question.id.as_str()) {
            return Err(CatalogError::DuplicateQuestionId(question.id.clone()));
        }
        if question.kind.is_choice() && question.options.is_empty() {
            return Err(CatalogError::MissingOptions(question.id.clone()));
        }
    }

    // The generator echoes difficulty strings; keep the offered levels in
    // lockstep with the enum.
    let levels = catalog.difficulty_levels();
    if !levels.is_empty() {
        let known: Vec<String> = Difficulty::ALL.iter().map(ToString::to_string).collect();
        if levels != known.as_slice() {
            return Err(CatalogError::DifficultyMismatch {
                found: levels.to_vec(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{DEFAULT_SUBJECTS, Mode};

    #[test]
    fn embedded_catalog_loads() {
        let catalog = load_catalog().expect("embedded catalog should be valid");
        assert_eq!(catalog.modes.len(), 2);
        assert_eq!(catalog.questions.len(), 4);
    }

    #[test]
    fn modes_match_generator_identifiers() {
        let catalog = load_catalog().unwrap();
        for mode in &catalog.modes {
            assert!(
                !matches!(Mode::from(mode.id.as_str()), Mode::Unknown(_)),
                "catalog mode {:?} is not known to the generator",
                mode.id
            );
        }
    }

    #[test]
    fn question_ids_in_order() {
        let catalog = load_catalog().unwrap();
        let ids: Vec<&str> = catalog.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["hoursPerDay", "targetDate", "subjects", "difficulty"]);
    }

    #[test]
    fn question_kinds() {
        let catalog = load_catalog().unwrap();
        let kinds: Vec<QuestionKind> = catalog.questions.iter().map(|q| q.kind).collect();
        assert_eq!(
            kinds,
            vec![
                QuestionKind::Number,
                QuestionKind::Date,
                QuestionKind::Multiselect,
                QuestionKind::Select
            ]
        );
    }

    #[test]
    fn thirteen_subjects_including_defaults() {
        let catalog = load_catalog().unwrap();
        let subjects = catalog.subject_options();
        assert_eq!(subjects.len(), 13);
        for default in DEFAULT_SUBJECTS {
            assert!(subjects.iter().any(|s| s == default), "missing {default}");
        }
    }

    #[test]
    fn difficulty_levels_match_enum() {
        let catalog = load_catalog().unwrap();
        assert_eq!(
            catalog.difficulty_levels(),
            ["Iniciante", "Intermediário", "Avançado"]
        );
    }

    #[test]
    fn find_mode_by_id() {
        let catalog = load_catalog().unwrap();
        assert_eq!(catalog.find_mode("APRU_1b").unwrap().color, "blue");
        assert!(catalog.find_mode("nope").is_none());
    }

    #[test]
    fn serializes_type_field_and_skips_empty_options() {
        let catalog = load_catalog().unwrap();
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["questions"][0]["type"], "number");
        assert!(json["questions"][0].get("options").is_none());
        assert_eq!(json["questions"][3]["type"], "select");
    }

    #[test]
    fn rejects_duplicate_mode_ids() {
        let toml = r#"
questions = []

[[modes]]
id = "A"
name = "A"
description = "a"
color = "red"

[[modes]]
id = "A"
name = "A again"
description = "a"
color = "red"
"#;
        assert!(matches!(
            parse_catalog(toml),
            Err(CatalogError::DuplicateModeId(id)) if id == "A"
        ));
    }

    #[test]
    fn rejects_choice_question_without_options() {
        let toml = r#"
modes = []

[[questions]]
id = "subjects"
question = "Pick"
type = "multiselect"
"#;
        assert!(matches!(
            parse_catalog(toml),
            Err(CatalogError::MissingOptions(id)) if id == "subjects"
        ));
    }

    #[test]
    fn rejects_unknown_difficulty_levels() {
        let toml = r#"
modes = []

[[questions]]
id = "difficulty"
question = "Level?"
type = "select"
options = ["Easy", "Hard"]
"#;
        assert!(matches!(
            parse_catalog(toml),
            Err(CatalogError::DifficultyMismatch { .. })
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            parse_catalog("this is not valid toml {{{"),
            Err(CatalogError::TomlError(_))
        ));
    }
}
