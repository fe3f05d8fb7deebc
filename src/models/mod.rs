pub mod draft;
pub mod risk;

pub use draft::{DRAFT_KEYS, EquipmentDraft, EquipmentSelection};
pub use risk::{MAX_INSTRUCTED_SCORE, RiskBand, RiskRow, RiskTable, Stage};
