//! Question bank and assembled exam catalog.
//!
//! The question bank maps question display text to stable catalog
//! identifiers of the form `{Category}-{ordinal}`. The exam catalog bundles
//! a loaded roster with the checklists resolved for its questions, so the
//! scheduler and assessor receive everything they need up front instead of
//! reaching into global state.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Checklist, ExamQuestion, ExamRoster};
use crate::parser::DEFAULT_MAX_SCORE;

// ---------------------------------------------------------------------------
// Question bank
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    questions: Vec<TomlBankEntry>,
}

#[derive(Debug, Deserialize)]
struct TomlBankEntry {
    category: String,
    text: String,
    #[serde(default)]
    score: Option<f64>,
}

/// One bank entry with its minted identifier.
#[derive(Debug, Clone)]
pub struct BankQuestion {
    /// `{Category}-{ordinal}`, ordinal 1-based within the category.
    pub id: String,
    pub category: String,
    pub text: String,
    pub max_score: f64,
}

/// Registry of known questions, looked up by display text.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<BankQuestion>,
}

impl QuestionBank {
    /// Load a bank from a TOML catalog file. Identifiers are minted per
    /// category in document order, so the file is the source of truth for
    /// ordinals.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question bank {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("failed to parse question bank {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parsed: TomlBankFile = toml::from_str(content)?;
        let mut ordinals: BTreeMap<String, u32> = BTreeMap::new();
        let questions = parsed
            .questions
            .into_iter()
            .map(|entry| {
                let ordinal = ordinals.entry(entry.category.clone()).or_insert(0);
                *ordinal += 1;
                BankQuestion {
                    id: format!("{}-{}", entry.category, ordinal),
                    category: entry.category,
                    text: entry.text,
                    max_score: entry.score.unwrap_or(DEFAULT_MAX_SCORE),
                }
            })
            .collect();
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BankQuestion> {
        self.questions.iter()
    }

    /// Find a bank entry by display text: exact, then case-insensitive,
    /// then with whitespace runs collapsed.
    pub fn find_by_text(&self, text: &str) -> Option<&BankQuestion> {
        if let Some(q) = self.questions.iter().find(|q| q.text == text) {
            return Some(q);
        }
        let lowered = text.to_lowercase();
        if let Some(q) = self
            .questions
            .iter()
            .find(|q| q.text.to_lowercase() == lowered)
        {
            return Some(q);
        }
        let normalized = normalize_text(text);
        self.questions
            .iter()
            .find(|q| normalize_text(&q.text) == normalized)
    }

    /// Find a bank entry by its minted identifier: exact, then
    /// case-insensitive, then with spaces and hyphens stripped.
    pub fn find_by_id(&self, id: &str) -> Option<&BankQuestion> {
        if let Some(q) = self.questions.iter().find(|q| q.id == id) {
            return Some(q);
        }
        let lowered = id.to_lowercase();
        if let Some(q) = self.questions.iter().find(|q| q.id.to_lowercase() == lowered) {
            return Some(q);
        }
        let normalized = normalize_id(id);
        self.questions
            .iter()
            .find(|q| normalize_id(&q.id) == normalized)
    }

    /// Like [`QuestionBank::find_by_id`], but an unknown id is an error
    /// naming the available ids.
    pub fn resolve_id(&self, id: &str) -> Result<&BankQuestion> {
        self.find_by_id(id).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown question id '{id}'. Available: {}",
                self.questions
                    .iter()
                    .map(|q| q.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }

    /// Fill roster questions from the bank: resolve each question id and
    /// take the bank's weight and text where the document left them out.
    /// A score set explicitly in the document wins over the bank's weight.
    pub fn apply_to_roster(&self, roster: &mut ExamRoster) -> Result<()> {
        for question in &mut roster.questions {
            let bank_entry = self.resolve_id(&question.id)?;
            question.id = bank_entry.id.clone();
            if question.text.is_empty() {
                question.text = bank_entry.text.clone();
            }
            if question.score.is_none() {
                question.score = Some(bank_entry.max_score);
            }
        }
        Ok(())
    }
}

fn normalize_id(id: &str) -> String {
    id.chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Checklist loading
// ---------------------------------------------------------------------------

/// Load the checklist for one question id from `solutions_dir`.
///
/// The file is named after the question id (`CI-5.toml`) and holds the two
/// feature groups as string arrays.
pub fn load_checklist(solutions_dir: &Path, question_id: &str) -> Result<Option<Checklist>> {
    let path = solutions_dir.join(format!("{question_id}.toml"));
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read checklist {}", path.display()))?;
    let checklist: Checklist = toml::from_str(&raw)
        .with_context(|| format!("failed to parse checklist {}", path.display()))?;
    Ok(Some(checklist))
}

// ---------------------------------------------------------------------------
// Assembled catalog
// ---------------------------------------------------------------------------

/// Everything a run needs: the roster plus the checklist for each question
/// that has one. Questions without a checklist stay assessable as errors,
/// so one missing solution file never aborts a whole run.
#[derive(Debug, Clone)]
pub struct ExamCatalog {
    pub roster: ExamRoster,
    checklists: BTreeMap<String, Checklist>,
}

impl ExamCatalog {
    /// Assemble a catalog by resolving each roster question's checklist
    /// from `solutions_dir`. Returns the catalog together with the ids of
    /// questions whose checklist file was missing.
    pub fn assemble(roster: ExamRoster, solutions_dir: &Path) -> Result<(Self, Vec<String>)> {
        let mut checklists = BTreeMap::new();
        let mut missing = Vec::new();

        for question in &roster.questions {
            match load_checklist(solutions_dir, &question.id) {
                Ok(Some(checklist)) => {
                    checklists.insert(question.id.clone(), checklist);
                }
                Ok(None) => {
                    tracing::warn!(question_id = %question.id, "no checklist file found");
                    missing.push(question.id.clone());
                }
                // A broken checklist file disables that question, not the run.
                Err(err) => {
                    tracing::warn!(question_id = %question.id, error = %err, "unusable checklist file");
                    missing.push(question.id.clone());
                }
            }
        }

        Ok((
            Self {
                roster,
                checklists,
            },
            missing,
        ))
    }

    /// Build a catalog from parts already in memory. Used by tests and by
    /// single-student assessment paths that load checklists elsewhere.
    pub fn from_parts(roster: ExamRoster, checklists: BTreeMap<String, Checklist>) -> Self {
        Self { roster, checklists }
    }

    pub fn checklist(&self, question_id: &str) -> Option<&Checklist> {
        self.checklists.get(question_id)
    }

    pub fn questions(&self) -> &[ExamQuestion] {
        &self.roster.questions
    }
}

/// A non-fatal problem found while validating a catalog.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Question this warning concerns, if any.
    pub question_id: Option<String>,
    pub message: String,
}

/// Check an assembled catalog for problems worth fixing before a run:
/// missing or empty checklists, duplicate question ids, and students who
/// answered nothing.
pub fn validate_catalog(catalog: &ExamCatalog, missing: &[String]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for id in missing {
        warnings.push(ValidationWarning {
            question_id: Some(id.clone()),
            message: "no checklist file in the solutions directory".to_string(),
        });
    }

    let mut seen = std::collections::BTreeSet::new();
    for question in catalog.questions() {
        if !seen.insert(question.id.as_str()) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "duplicate question id".to_string(),
            });
        }
        if let Some(checklist) = catalog.checklist(&question.id) {
            if checklist.is_empty() {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: "checklist has no features".to_string(),
                });
            }
        }
    }

    for student in &catalog.roster.students {
        if student.answered_count() == 0 {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("student {} answered no questions", student.email),
            });
        }
    }

    warnings
}
