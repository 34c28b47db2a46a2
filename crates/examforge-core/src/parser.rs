//! Exam document parsing.
//!
//! Loads the per-exam document triple (questions, responses, optional
//! reference grades) from TOML files and assembles an [`ExamRoster`].
//! Only finished attempts enter the roster; reference grades attach to
//! students by identity and are reporting-only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::error::LoadError;
use crate::model::{ExamQuestion, ExamRoster, ReferenceGrades, StudentRecord};

pub use crate::model::DEFAULT_MAX_SCORE;

/// State value marking an attempt as eligible for assessment.
const FINISHED_STATE: &str = "Finished";

/// Paths to the documents for one exam run.
#[derive(Debug, Clone)]
pub struct ExamDocumentPaths {
    pub questions: PathBuf,
    pub responses: PathBuf,
    pub grades: Option<PathBuf>,
}

/// Build the conventional document paths for an exam date,
/// e.g. `se-2025-06-05-questions.toml` under `exams_dir`.
pub fn exam_paths_for_date(exams_dir: &Path, date: &str) -> ExamDocumentPaths {
    ExamDocumentPaths {
        questions: exams_dir.join(format!("se-{date}-questions.toml")),
        responses: exams_dir.join(format!("se-{date}-responses.toml")),
        grades: Some(exams_dir.join(format!("se-{date}-grades.toml"))),
    }
}

// ---------------------------------------------------------------------------
// Intermediate TOML structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlQuestionsFile {
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    number: Option<u32>,
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TomlResponsesFile {
    #[serde(default)]
    students: Vec<TomlStudentRow>,
}

/// One student row. Response text lives in flat `response{N}` keys, so the
/// unknown keys are collected through a flattened map.
#[derive(Debug, Deserialize)]
struct TomlStudentRow {
    #[serde(default)]
    emailaddress: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    startedon: Option<String>,
    #[serde(default)]
    completed: Option<String>,
    #[serde(default)]
    timetaken: Option<String>,
    #[serde(flatten)]
    rest: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct TomlGradesFile {
    #[serde(default)]
    grades: Vec<TomlGradeRow>,
}

#[derive(Debug, Deserialize)]
struct TomlGradeRow {
    #[serde(default)]
    emailaddress: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    grade2700: Option<f64>,
    #[serde(flatten)]
    rest: BTreeMap<String, toml::Value>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the full exam roster from a document triple.
///
/// Missing questions/responses documents are fatal ([`LoadError::InputNotFound`]);
/// a missing grades document is tolerated with a warning, since reference
/// grades are comparison-only.
pub fn load_exam(paths: &ExamDocumentPaths) -> Result<ExamRoster> {
    let questions_raw = read_required(&paths.questions)?;
    let responses_raw = read_required(&paths.responses)?;

    let grades_raw = match &paths.grades {
        Some(path) if path.exists() => Some(std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?),
        Some(path) => {
            tracing::warn!("grades document not found: {}", path.display());
            None
        }
        None => None,
    };

    let questions = parse_questions_str(&questions_raw)
        .with_context(|| format!("failed to parse {}", paths.questions.display()))?;
    let grades = match grades_raw {
        Some(raw) => parse_grades_str(&raw).context("failed to parse grades document")?,
        None => BTreeMap::new(),
    };
    let students = parse_responses_str(&responses_raw, questions.len() as u32, &grades)
        .with_context(|| format!("failed to parse {}", paths.responses.display()))?;

    let exam_id = format!("{}_{}", file_stem(&paths.questions), file_stem(&paths.responses));

    Ok(ExamRoster {
        exam_id,
        questions,
        students,
    })
}

fn read_required(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(LoadError::InputNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse the questions document. Question numbers default to document order;
/// an absent score stays absent so a question bank can still fill it in,
/// falling back to [`DEFAULT_MAX_SCORE`] at assessment time.
pub fn parse_questions_str(content: &str) -> Result<Vec<ExamQuestion>> {
    let parsed: TomlQuestionsFile = toml::from_str(content)?;
    Ok(parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| ExamQuestion {
            number: q.number.unwrap_or(i as u32 + 1),
            id: q.id,
            text: q.text,
            score: q.score,
        })
        .collect())
}

/// Parse the responses document into student records. Attempts whose state
/// is not "Finished" are skipped. Reference grades are attached by identity.
pub fn parse_responses_str(
    content: &str,
    question_count: u32,
    grades: &BTreeMap<String, ReferenceGrades>,
) -> Result<Vec<StudentRecord>> {
    let parsed: TomlResponsesFile = toml::from_str(content)?;

    let mut students = Vec::new();
    for row in parsed.students {
        if row.state.as_deref() != Some(FINISHED_STATE) {
            continue;
        }
        // Results are keyed by identity; a row without one cannot be stored
        // without colliding with other identity-less rows.
        let Some(email) = row.emailaddress else {
            tracing::warn!("skipping finished response row without an emailaddress");
            continue;
        };

        let mut responses = BTreeMap::new();
        for n in 1..=question_count {
            let key = format!("response{n}");
            if let Some(value) = row.rest.get(&key).and_then(|v| v.as_str()) {
                responses.insert(n, value.to_string());
            }
        }

        let reference_grades = grades.get(&email).cloned();
        students.push(StudentRecord {
            email,
            responses,
            started: row.startedon,
            completed: row.completed,
            time_taken: row.timetaken,
            reference_grades,
        });
    }

    Ok(students)
}

/// Parse the grades document into per-identity reference grades.
///
/// Per-question grade keys encode the question number and are matched by
/// the pattern `q{N}xxx` (three trailing digits).
pub fn parse_grades_str(content: &str) -> Result<BTreeMap<String, ReferenceGrades>> {
    let parsed: TomlGradesFile = toml::from_str(content)?;
    let key_pattern = Regex::new(r"^q(\d+)\d{3}$").expect("static pattern");

    let mut by_email = BTreeMap::new();
    for row in parsed.grades {
        let Some(email) = row.emailaddress else {
            continue;
        };
        if row.state.as_deref() != Some(FINISHED_STATE) {
            continue;
        }

        let mut per_question = BTreeMap::new();
        for (key, value) in &row.rest {
            if let Some(caps) = key_pattern.captures(key) {
                let Ok(number) = caps[1].parse::<u32>() else {
                    continue;
                };
                if let Some(grade) = toml_number(value) {
                    per_question.insert(number, grade);
                }
            }
        }

        by_email.insert(
            email,
            ReferenceGrades {
                total: row.grade2700.unwrap_or(0.0),
                per_question,
            },
        );
    }

    Ok(by_email)
}

fn toml_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
