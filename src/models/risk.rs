use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scores at or above this are high risk.
pub const HIGH_RISK_THRESHOLD: i64 = 6;
/// Scores at or above this (and below high) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: i64 = 3;
/// Upper bound the prompts ask the service to respect.
pub const MAX_INSTRUCTED_SCORE: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: i64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskBand::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    /// 상/중/하 label used in reports and exports.
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::High => "상",
            RiskBand::Medium => "중",
            RiskBand::Low => "하",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "상" | "high" => Some(RiskBand::High),
            "중" | "medium" => Some(RiskBand::Medium),
            "하" | "low" => Some(RiskBand::Low),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            RiskBand::High => "🔴",
            RiskBand::Medium => "🟡",
            RiskBand::Low => "🟢",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::High => write!(f, "high"),
            RiskBand::Medium => write!(f, "medium"),
            RiskBand::Low => write!(f, "low"),
        }
    }
}

const MAIN_WORK_EN: &str = "main work";

/// Procedural phase a row belongs to, derived from its stage label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Preparation,
    MainWork { sub_task: Option<String> },
    Cleanup,
    Unclassified,
}

impl Stage {
    pub fn classify(label: &str) -> Self {
        let label = label.trim();
        let lower = label.to_lowercase();

        let english = label
            .get(..MAIN_WORK_EN.len())
            .filter(|head| head.eq_ignore_ascii_case(MAIN_WORK_EN))
            .map(|_| &label[MAIN_WORK_EN.len()..]);
        if let Some(rest) = label.strip_prefix("본작업").or(english) {
            let sub_task = rest.trim_start_matches([':', '-', ' ']).trim();
            return Stage::MainWork {
                sub_task: (!sub_task.is_empty()).then(|| sub_task.to_owned()),
            };
        }
        if label.contains("준비") || lower.contains("prep") {
            return Stage::Preparation;
        }
        if label.contains("종료")
            || label.contains("정리")
            || lower.contains("cleanup")
            || lower.contains("clean-up")
            || lower.contains("closeout")
        {
            return Stage::Cleanup;
        }
        Stage::Unclassified
    }
}

/// One line of the risk assessment report.
///
/// Score and band are derived on access so an edited row never carries
/// stale values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRow {
    pub stage: String,
    pub hazard: String,
    pub countermeasures: String,
    pub frequency: i64,
    pub severity: i64,
}

impl RiskRow {
    pub fn new(
        stage: impl Into<String>,
        hazard: impl Into<String>,
        countermeasures: impl Into<String>,
        frequency: i64,
        severity: i64,
    ) -> Self {
        Self {
            stage: stage.into(),
            hazard: hazard.into(),
            countermeasures: countermeasures.into(),
            frequency,
            severity,
        }
    }

    pub fn score(&self) -> i64 {
        self.frequency.saturating_mul(self.severity)
    }

    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.score())
    }

    pub fn stage_kind(&self) -> Stage {
        Stage::classify(&self.stage)
    }

    /// Countermeasure bullets, split on real line breaks and on a literal
    /// `\n` marker left double-escaped by the service.
    pub fn countermeasure_items(&self) -> Vec<String> {
        self.countermeasures
            .replace("\\n", "\n")
            .lines()
            .map(|line| line.trim().trim_start_matches(['-', '•', '*']).trim())
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// The rows produced by one successful generation, in procedural order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTable {
    pub rows: Vec<RiskRow>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl RiskTable {
    pub fn new(rows: Vec<RiskRow>) -> Self {
        Self {
            rows,
            generated_at: Utc::now(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn max_score(&self) -> Option<i64> {
        self.rows.iter().map(RiskRow::score).max()
    }

    pub fn count_band(&self, band: RiskBand) -> usize {
        self.rows.iter().filter(|r| r.band() == band).count()
    }

    /// Replaces the row at `index`; returns false when out of range.
    pub fn update_row(&mut self, index: usize, row: RiskRow) -> bool {
        match self.rows.get_mut(index) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    pub fn push_row(&mut self, row: RiskRow) {
        self.rows.push(row);
    }

    pub fn remove_row(&mut self, index: usize) -> Option<RiskRow> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }
}
