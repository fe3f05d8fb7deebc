use serde::{Deserialize, Serialize};

use crate::utils::join_list;

/// JSON keys the equipment recommendation prompt asks for.
pub const DRAFT_KEYS: [&str; 4] = ["protectors", "safety_equip", "tools", "docs"];

/// Preparation lists proposed by the first generation round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentDraft {
    /// 보호구
    pub protectors: Vec<String>,
    /// 안전장비/시설
    pub safety_equip: Vec<String>,
    /// 사용 공구/장비
    pub tools: Vec<String>,
    /// 준비자료/허가서
    pub docs: Vec<String>,
}

impl EquipmentDraft {
    pub fn is_empty(&self) -> bool {
        self.protectors.is_empty()
            && self.safety_equip.is_empty()
            && self.tools.is_empty()
            && self.docs.is_empty()
    }
}

/// Final preparation lists fed into the risk table prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSelection {
    pub protectors: Vec<String>,
    pub safety_equip: Vec<String>,
    pub tools: Vec<String>,
    pub docs: Vec<String>,
}

impl EquipmentSelection {
    pub fn protectors_joined(&self) -> String {
        join_list(&self.protectors)
    }

    pub fn safety_equip_joined(&self) -> String {
        join_list(&self.safety_equip)
    }

    pub fn tools_joined(&self) -> String {
        join_list(&self.tools)
    }

    pub fn docs_joined(&self) -> String {
        join_list(&self.docs)
    }
}

impl From<EquipmentDraft> for EquipmentSelection {
    fn from(draft: EquipmentDraft) -> Self {
        Self {
            protectors: draft.protectors,
            safety_equip: draft.safety_equip,
            tools: draft.tools,
            docs: draft.docs,
        }
    }
}
