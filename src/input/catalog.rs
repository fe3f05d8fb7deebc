use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Tag options offered by the original form, in display order.
pub static DEFAULT_TAGS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "일반작업 (해당 없음)",
        "고소작업 (추락 위험)",
        "화기작업 (화재 발생)",
        "밀폐공간 (질식 위험)",
        "전기작업 (감전 위험)",
        "중량물 취급 (근골격계/낙하)",
        "화학물질 취급",
        "건설기계 사용",
        "해체/철거 작업",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
});

pub static DEFAULT_PLACEHOLDERS: Lazy<Vec<String>> =
    Lazy::new(|| vec!["일반작업 (해당 없음)".to_owned()]);

/// Selectable risk-characteristic tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCatalog {
    pub tags: Vec<String>,

    /// "Not applicable" style options carrying no risk information.
    #[serde(default)]
    pub placeholders: Vec<String>,

    /// Drop placeholder options before they reach a prompt.
    #[serde(default = "default_exclude_placeholders")]
    pub exclude_placeholders: bool,
}

fn default_exclude_placeholders() -> bool {
    true
}

impl Default for TagCatalog {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TAGS.clone(),
            placeholders: DEFAULT_PLACEHOLDERS.clone(),
            exclude_placeholders: true,
        }
    }
}

impl TagCatalog {
    pub fn is_placeholder(&self, tag: &str) -> bool {
        self.placeholders.iter().any(|p| p == tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Options a form should offer, honouring placeholder exclusion.
    pub fn selectable(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter(|t| !(self.exclude_placeholders && self.is_placeholder(t)))
            .map(String::as_str)
    }

    /// Whether a selected tag survives into the prompt.
    pub fn keeps(&self, tag: &str) -> bool {
        !(self.exclude_placeholders && self.is_placeholder(tag))
    }
}
