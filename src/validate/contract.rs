use std::fmt;

use tracing::warn;

use crate::models::{MAX_INSTRUCTED_SCORE, RiskRow, Stage};

const FREQUENCY_RANGE: (i64, i64) = (1, 5);
const SEVERITY_RANGE: (i64, i64) = (1, 4);
const COUNTERMEASURE_RANGE: (usize, usize) = (2, 5);
const PPE_KEYWORDS: [&str; 5] = ["보호구", "복장", "착용", "PPE", "attire"];

/// A prompt rule the service did not follow. Advisory only: rows are never
/// rejected or clamped because of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractWarning {
    ScoreAboveLimit { row: usize, score: i64 },
    FrequencyOutOfRange { row: usize, value: i64 },
    SeverityOutOfRange { row: usize, value: i64 },
    CountermeasureCount { row: usize, count: usize },
    FirstRowNotPpeCheck,
}

impl fmt::Display for ContractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractWarning::ScoreAboveLimit { row, score } => {
                write!(f, "row {row}: score {score} exceeds {MAX_INSTRUCTED_SCORE}")
            }
            ContractWarning::FrequencyOutOfRange { row, value } => {
                write!(f, "row {row}: frequency {value} outside 1-5")
            }
            ContractWarning::SeverityOutOfRange { row, value } => {
                write!(f, "row {row}: severity {value} outside 1-4")
            }
            ContractWarning::CountermeasureCount { row, count } => {
                write!(f, "row {row}: {count} countermeasures, expected 2-5")
            }
            ContractWarning::FirstRowNotPpeCheck => {
                write!(f, "first row is not a preparation-stage PPE/attire check")
            }
        }
    }
}

/// Checks rows against the rules the risk table prompt states.
pub fn check_contract(rows: &[RiskRow]) -> Vec<ContractWarning> {
    let mut warnings = Vec::new();

    if let Some(first) = rows.first() {
        let is_ppe = PPE_KEYWORDS
            .iter()
            .any(|k| first.hazard.contains(k) || first.countermeasures.contains(k));
        if first.stage_kind() != Stage::Preparation || !is_ppe {
            warnings.push(ContractWarning::FirstRowNotPpeCheck);
        }
    }

    for (index, row) in rows.iter().enumerate() {
        let n = index + 1;
        if row.score() > MAX_INSTRUCTED_SCORE {
            warnings.push(ContractWarning::ScoreAboveLimit { row: n, score: row.score() });
        }
        if !(FREQUENCY_RANGE.0..=FREQUENCY_RANGE.1).contains(&row.frequency) {
            warnings.push(ContractWarning::FrequencyOutOfRange { row: n, value: row.frequency });
        }
        if !(SEVERITY_RANGE.0..=SEVERITY_RANGE.1).contains(&row.severity) {
            warnings.push(ContractWarning::SeverityOutOfRange { row: n, value: row.severity });
        }
        let count = row.countermeasure_items().len();
        if !(COUNTERMEASURE_RANGE.0..=COUNTERMEASURE_RANGE.1).contains(&count) {
            warnings.push(ContractWarning::CountermeasureCount { row: n, count });
        }
    }

    for warning in &warnings {
        warn!("risk table contract: {}", warning);
    }
    warnings
}
