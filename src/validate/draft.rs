use serde_json::{Map, Value};

use crate::{error::SchemaError, models::EquipmentDraft, utils::parse_to_list};

/// Normalizes a recommendation object into token lists.
///
/// Each value may be a comma-joined string or a list; missing keys become
/// empty lists.
pub fn parse_draft(value: &Value) -> Result<EquipmentDraft, SchemaError> {
    let obj = value.as_object().ok_or(SchemaError::not_an_object(0))?;
    Ok(EquipmentDraft {
        protectors: list_field(obj, "protectors")?,
        safety_equip: list_field(obj, "safety_equip")?,
        tools: list_field(obj, "tools")?,
        docs: list_field(obj, "docs")?,
    })
}

fn list_field(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, SchemaError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(parse_to_list(s)),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                let token = item
                    .as_str()
                    .ok_or_else(|| SchemaError::invalid_type(0, key))?;
                out.extend(parse_to_list(token));
            }
            Ok(out)
        }
        Some(_) => Err(SchemaError::invalid_type(0, key)),
    }
}
