pub mod builder;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{input::TaskDescription, models::EquipmentSelection};

pub use builder::{build_equipment_prompt, build_risk_table_prompt};

/// The two prompt templates the pipeline renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptTemplate {
    EquipmentRecommendation,
    RiskTable,
}

impl PromptTemplate {
    /// Renders the template. Pure string construction, total over any input.
    pub fn render(&self, task: &TaskDescription, selection: Option<&EquipmentSelection>) -> String {
        match self {
            PromptTemplate::EquipmentRecommendation => build_equipment_prompt(task),
            PromptTemplate::RiskTable => build_risk_table_prompt(task, selection),
        }
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptTemplate::EquipmentRecommendation => write!(f, "EQUIPMENT_RECOMMENDATION"),
            PromptTemplate::RiskTable => write!(f, "RISK_TABLE"),
        }
    }
}
