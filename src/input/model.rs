use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{input::catalog::TagCatalog, utils::parse_to_list};

pub const DEFAULT_WORKER_COUNT: u32 = 2;

/// Raw form values as they arrive from the user, every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTaskInput {
    /// 작업명, e.g. "외부 비계 해체 작업"
    pub task_name: Option<String>,

    /// 작업 위치, e.g. "105동 외부 지상 3층~5층"
    pub location: Option<String>,

    /// Selected risk-characteristic tags in selection order
    pub tags: Vec<String>,

    /// 기타 위험 특성, e.g. "강풍 예상, 야간 작업"
    pub risk_context: Option<String>,

    pub worker_count: Option<i64>,

    pub materials: Option<String>,

    pub tools: Option<String>,

    /// Either a comma-joined string or individual entries
    pub protective_equipment: Vec<String>,

    pub environment: Option<String>,
}

/// Canonical task record consumed by the prompt builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescription {
    pub task_name: String,
    pub location: String,
    pub tags: Vec<String>,
    pub risk_context: String,
    pub worker_count: u32,
    pub materials: String,
    pub tools: String,
    pub protective_equipment: Vec<String>,
    pub environment: String,
}

impl Default for TaskDescription {
    fn default() -> Self {
        Self {
            task_name: String::new(),
            location: String::new(),
            tags: Vec::new(),
            risk_context: String::new(),
            worker_count: DEFAULT_WORKER_COUNT,
            materials: String::new(),
            tools: String::new(),
            protective_equipment: Vec::new(),
            environment: String::new(),
        }
    }
}

impl TaskDescription {
    /// Normalizes raw form values. Never fails: absent fields become empty
    /// strings or defaults.
    pub fn from_raw(raw: RawTaskInput, catalog: &TagCatalog) -> Self {
        let mut tags: Vec<String> = Vec::with_capacity(raw.tags.len());
        for tag in raw.tags {
            let tag = tag.trim();
            if tag.is_empty() || !catalog.keeps(tag) || tags.iter().any(|t| t == tag) {
                continue;
            }
            if !catalog.contains(tag) {
                debug!("accepting tag outside the catalog: {}", tag);
            }
            tags.push(tag.to_owned());
        }

        let worker_count = raw
            .worker_count
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_WORKER_COUNT);

        let protective_equipment = raw
            .protective_equipment
            .iter()
            .flat_map(|entry| parse_to_list(entry))
            .collect();

        Self {
            task_name: text(raw.task_name),
            location: text(raw.location),
            tags,
            risk_context: text(raw.risk_context),
            worker_count,
            materials: text(raw.materials),
            tools: text(raw.tools),
            protective_equipment,
            environment: text(raw.environment),
        }
    }

    /// Tags joined in selection order.
    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }

    pub fn has_task_name(&self) -> bool {
        !self.task_name.is_empty()
    }
}

fn text(value: Option<String>) -> String {
    value.map(|v| v.trim().to_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_normalizes_to_defaults() {
        let task = TaskDescription::from_raw(RawTaskInput::default(), &TagCatalog::default());
        assert_eq!(task, TaskDescription::default());
        assert_eq!(task.worker_count, 2);
    }

    #[test]
    fn tags_keep_selection_order_and_drop_duplicates() {
        let raw = RawTaskInput {
            tags: vec![
                "화기작업 (화재 발생)".into(),
                "고소작업 (추락 위험)".into(),
                "화기작업 (화재 발생)".into(),
                "  ".into(),
            ],
            ..Default::default()
        };
        let task = TaskDescription::from_raw(raw, &TagCatalog::default());
        assert_eq!(task.tags_joined(), "화기작업 (화재 발생), 고소작업 (추락 위험)");
    }

    #[test]
    fn placeholder_tags_follow_catalog_setting() {
        let raw = RawTaskInput {
            tags: vec!["일반작업 (해당 없음)".into(), "건설기계 사용".into()],
            ..Default::default()
        };

        let task = TaskDescription::from_raw(raw.clone(), &TagCatalog::default());
        assert_eq!(task.tags, vec!["건설기계 사용"]);

        let catalog = TagCatalog {
            exclude_placeholders: false,
            ..Default::default()
        };
        let task = TaskDescription::from_raw(raw, &catalog);
        assert_eq!(task.tags.len(), 2);
    }

    #[test]
    fn non_positive_worker_count_uses_default() {
        for count in [Some(0), Some(-3), None] {
            let raw = RawTaskInput {
                worker_count: count,
                ..Default::default()
            };
            let task = TaskDescription::from_raw(raw, &TagCatalog::default());
            assert_eq!(task.worker_count, DEFAULT_WORKER_COUNT);
        }
    }

    #[test]
    fn protective_equipment_accepts_joined_and_split_entries() {
        let raw = RawTaskInput {
            protective_equipment: vec!["안전모, 안전화".into(), "안전대".into()],
            ..Default::default()
        };
        let task = TaskDescription::from_raw(raw, &TagCatalog::default());
        assert_eq!(task.protective_equipment, vec!["안전모", "안전화", "안전대"]);
    }
}
