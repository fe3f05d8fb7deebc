use serde::{Deserialize, Serialize};

use crate::{
    models::{EquipmentDraft, EquipmentSelection},
    utils::parse_to_list,
};

/// A user edit of one draft field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEdit {
    /// Multi-select result, taken verbatim.
    Selection(Vec<String>),
    /// Free-text override that fully replaces the pre-filled value.
    Text(String),
}

impl FieldEdit {
    fn resolve(&self) -> Vec<String> {
        match self {
            FieldEdit::Selection(items) => items.clone(),
            FieldEdit::Text(text) => parse_to_list(text),
        }
    }
}

/// Edits per draft field; `None` keeps the draft's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftEdits {
    pub protectors: Option<FieldEdit>,
    pub safety_equip: Option<FieldEdit>,
    pub tools: Option<FieldEdit>,
    pub docs: Option<FieldEdit>,
}

/// Last write wins: an edited field replaces the draft, an untouched field
/// keeps the draft's proposal.
pub fn merge_draft(draft: &EquipmentDraft, edits: &DraftEdits) -> EquipmentSelection {
    fn pick(seed: &[String], edit: Option<&FieldEdit>) -> Vec<String> {
        edit.map_or_else(|| seed.to_vec(), FieldEdit::resolve)
    }

    EquipmentSelection {
        protectors: pick(&draft.protectors, edits.protectors.as_ref()),
        safety_equip: pick(&draft.safety_equip, edits.safety_equip.as_ref()),
        tools: pick(&draft.tools, edits.tools.as_ref()),
        docs: pick(&draft.docs, edits.docs.as_ref()),
    }
}
