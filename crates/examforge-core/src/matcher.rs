//! Student identity resolution.
//!
//! Resolves a possibly partial, case-varying identity query to exactly one
//! roster entry. The policy is a strict priority ladder; ambiguity at the
//! prefix tier is surfaced instead of silently taking the first hit.

use crate::error::MatchError;
use crate::model::StudentRecord;

/// Minimum query length for the prefix-matching tier.
pub const MIN_PREFIX_LEN: usize = 10;

/// How many roster identities to suggest when a query fails.
const CANDIDATE_SAMPLE: usize = 5;

/// Resolve a student query against the roster.
///
/// Priority order, first success wins:
/// 1. exact case-sensitive match
/// 2. case-insensitive exact match
/// 3. case-insensitive prefix match, only for queries of at least
///    [`MIN_PREFIX_LEN`] characters; a unique prefix hit resolves,
///    multiple hits fail with [`MatchError::Ambiguous`]
///
/// Trailing whitespace and a trailing `.` are stripped from the query first
/// (both show up routinely in copy-pasted identities).
pub fn resolve<'a>(
    query: &str,
    roster: &'a [StudentRecord],
) -> Result<&'a StudentRecord, MatchError> {
    let clean = query.trim().trim_end_matches('.');

    if let Some(student) = roster.iter().find(|s| s.email == clean) {
        return Ok(student);
    }

    let lowered = clean.to_lowercase();
    if let Some(student) = roster.iter().find(|s| s.email.to_lowercase() == lowered) {
        return Ok(student);
    }

    if clean.len() >= MIN_PREFIX_LEN {
        let hits: Vec<&StudentRecord> = roster
            .iter()
            .filter(|s| s.email.to_lowercase().starts_with(&lowered))
            .collect();
        match hits.as_slice() {
            [single] => return Ok(single),
            [] => {}
            many => {
                return Err(MatchError::Ambiguous {
                    query: clean.to_string(),
                    candidates: many.iter().map(|s| s.email.clone()).collect(),
                });
            }
        }
    }

    Err(MatchError::NotFound {
        query: clean.to_string(),
        candidates: roster
            .iter()
            .take(CANDIDATE_SAMPLE)
            .map(|s| s.email.clone())
            .collect(),
    })
}
