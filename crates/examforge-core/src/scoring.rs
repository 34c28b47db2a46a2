//! Weighted checklist scoring.
//!
//! Pure functions from feature verdicts to a numeric score, a reproducible
//! breakdown string, and per-group statistics. No I/O, no mutation.

use serde::{Deserialize, Serialize};

use crate::model::{FeatureType, FeatureVerdict};

/// Weight given to core features when both groups are present.
pub const CORE_WEIGHT: f64 = 0.70;
/// Weight given to important details when both groups are present.
pub const IMPORTANT_WEIGHT: f64 = 0.30;

/// Counts and weighting for one feature group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: u32,
    pub satisfied: u32,
    /// Raw satisfaction percentage, rounded to 1 decimal.
    pub percentage: f64,
    /// Weight applied to this group.
    pub weight: f64,
}

/// Statistics produced alongside a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub core: GroupStats,
    pub details_important: GroupStats,
    /// Which weighting rule applied.
    pub scoring_system: String,
}

/// Outcome of scoring one set of verdicts.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    /// Final score, rounded to 2 decimals, within `0.0..=max_score`.
    pub score: f64,
    /// Reproducible human-readable derivation.
    pub breakdown: String,
    /// Absent when there were no features to score.
    pub stats: Option<ScoreStats>,
}

/// Round to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to 1 decimal place.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Score a set of feature verdicts against a maximum score.
///
/// Weight selection, first rule that applies wins:
/// 1. both groups present: 70% core + 30% important
/// 2. only core: 100% core
/// 3. only important: 100% important
/// 4. no features: score 0, breakdown "No features assessed"
pub fn score_features(verdicts: &[FeatureVerdict], max_score: f64) -> ScoreOutcome {
    let core_total = count(verdicts, FeatureType::Core, false);
    let core_satisfied = count(verdicts, FeatureType::Core, true);
    let important_total = count(verdicts, FeatureType::ImportantDetail, false);
    let important_satisfied = count(verdicts, FeatureType::ImportantDetail, true);

    let (core_weight, important_weight, scoring_system) = if core_total > 0 && important_total > 0 {
        (CORE_WEIGHT, IMPORTANT_WEIGHT, "70% Core + 30% Important")
    } else if core_total > 0 {
        (1.0, 0.0, "100% Core (no Important details)")
    } else if important_total > 0 {
        (0.0, 1.0, "100% Important (no Core - unusual)")
    } else {
        return ScoreOutcome {
            score: 0.0,
            breakdown: "No features assessed".to_string(),
            stats: None,
        };
    };

    let core_pct = if core_total > 0 {
        core_satisfied as f64 / core_total as f64 * core_weight
    } else {
        0.0
    };
    let important_pct = if important_total > 0 {
        important_satisfied as f64 / important_total as f64 * important_weight
    } else {
        0.0
    };

    let final_pct = core_pct + important_pct;
    let score = round2(final_pct * max_score);

    let mut parts = Vec::new();
    if core_total > 0 {
        let raw = core_satisfied as f64 / core_total as f64 * 100.0;
        parts.push(format!(
            "Core: {core_satisfied}/{core_total} ({raw:.0}% → {:.0}%)",
            core_pct * 100.0
        ));
    }
    if important_total > 0 {
        let raw = important_satisfied as f64 / important_total as f64 * 100.0;
        parts.push(format!(
            "Important: {important_satisfied}/{important_total} ({raw:.0}% → {:.0}%)",
            important_pct * 100.0
        ));
    }

    let mut breakdown = parts.join(" + ");
    breakdown.push_str(&format!(
        " = {:.0}% of {max_score} = {score}",
        final_pct * 100.0
    ));
    breakdown.push_str(&format!(" [{scoring_system}]"));

    let stats = ScoreStats {
        core: GroupStats {
            total: core_total,
            satisfied: core_satisfied,
            percentage: if core_total > 0 {
                round1(core_satisfied as f64 / core_total as f64 * 100.0)
            } else {
                0.0
            },
            weight: core_weight,
        },
        details_important: GroupStats {
            total: important_total,
            satisfied: important_satisfied,
            percentage: if important_total > 0 {
                round1(important_satisfied as f64 / important_total as f64 * 100.0)
            } else {
                0.0
            },
            weight: important_weight,
        },
        scoring_system: scoring_system.to_string(),
    };

    ScoreOutcome {
        score,
        breakdown,
        stats: Some(stats),
    }
}

fn count(verdicts: &[FeatureVerdict], kind: FeatureType, satisfied_only: bool) -> u32 {
    verdicts
        .iter()
        .filter(|v| v.feature_type == kind && (!satisfied_only || v.satisfied))
        .count() as u32
}
