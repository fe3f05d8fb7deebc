use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    client::ApiKey,
    models::{EquipmentDraft, RiskTable},
    validate::ContractWarning,
};

/// Per-session state owned by the caller.
///
/// Intermediate artifacts are replaced wholesale on success and left
/// untouched on failure, so the last good table stays usable.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub started_at: DateTime<Utc>,
    api_key: Option<ApiKey>,
    draft: Option<EquipmentDraft>,
    risk_table: Option<RiskTable>,
    warnings: Vec<ContractWarning>,
}

impl Session {
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            started_at: Utc::now(),
            api_key,
            draft: None,
            risk_table: None,
            warnings: Vec::new(),
        }
    }

    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    pub fn set_api_key(&mut self, key: ApiKey) {
        self.api_key = Some(key);
    }

    pub fn draft(&self) -> Option<&EquipmentDraft> {
        self.draft.as_ref()
    }

    pub fn replace_draft(&mut self, draft: EquipmentDraft) -> &EquipmentDraft {
        self.draft.insert(draft)
    }

    /// Drops the draft once the second prompt has consumed it.
    pub fn discard_draft(&mut self) -> Option<EquipmentDraft> {
        self.draft.take()
    }

    pub fn risk_table(&self) -> Option<&RiskTable> {
        self.risk_table.as_ref()
    }

    /// Mutable access for user edits of the current table.
    pub fn risk_table_mut(&mut self) -> Option<&mut RiskTable> {
        self.risk_table.as_mut()
    }

    pub fn replace_table(&mut self, table: RiskTable, warnings: Vec<ContractWarning>) -> &RiskTable {
        self.warnings = warnings;
        self.risk_table.insert(table)
    }

    /// Prompt-contract warnings for the current table.
    pub fn warnings(&self) -> &[ContractWarning] {
        &self.warnings
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}
