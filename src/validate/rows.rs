use serde_json::{Map, Value};

use crate::{
    error::SchemaError,
    models::{RiskRow, RiskTable},
};

/// A required row field and the keys it may arrive under.
struct FieldKeys {
    name: &'static str,
    keys: &'static [&'static str],
}

const STAGE: FieldKeys = FieldKeys {
    name: "stage",
    keys: &["단계", "stage"],
};
const HAZARD: FieldKeys = FieldKeys {
    name: "hazard",
    keys: &["위험요인", "hazard"],
};
const COUNTERMEASURES: FieldKeys = FieldKeys {
    name: "countermeasures",
    keys: &["대책", "countermeasures"],
};
const FREQUENCY: FieldKeys = FieldKeys {
    name: "frequency",
    keys: &["빈도", "frequency"],
};
const SEVERITY: FieldKeys = FieldKeys {
    name: "severity",
    keys: &["강도", "severity"],
};

/// Validates a parsed array into rows, preserving order.
///
/// Any bad row rejects the whole batch; row numbers in the error are 1-based.
/// Frequency and severity are not range-checked.
pub fn validate_rows(value: &Value) -> Result<Vec<RiskRow>, SchemaError> {
    let items = value.as_array().ok_or_else(SchemaError::not_an_array)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let row = index + 1;
            let obj = item.as_object().ok_or(SchemaError::not_an_object(row))?;
            Ok(RiskRow {
                stage: text_field(obj, row, &STAGE)?,
                hazard: text_field(obj, row, &HAZARD)?,
                countermeasures: countermeasures_field(obj, row)?,
                frequency: int_field(obj, row, &FREQUENCY)?,
                severity: int_field(obj, row, &SEVERITY)?,
            })
        })
        .collect()
}

/// Validates and wraps the rows into a freshly stamped table.
pub fn validate_table(value: &Value) -> Result<RiskTable, SchemaError> {
    validate_rows(value).map(RiskTable::new)
}

fn lookup<'a>(obj: &'a Map<String, Value>, row: usize, field: &FieldKeys) -> Result<&'a Value, SchemaError> {
    field
        .keys
        .iter()
        .find_map(|key| obj.get(*key))
        .filter(|v| !v.is_null())
        .ok_or_else(|| SchemaError::missing(row, field.name))
}

fn text_field(obj: &Map<String, Value>, row: usize, field: &FieldKeys) -> Result<String, SchemaError> {
    match lookup(obj, row, field)? {
        Value::String(s) => Ok(s.trim().to_owned()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(SchemaError::invalid_type(row, field.name)),
    }
}

fn countermeasures_field(obj: &Map<String, Value>, row: usize) -> Result<String, SchemaError> {
    match lookup(obj, row, &COUNTERMEASURES)? {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_owned())
                    .ok_or_else(|| SchemaError::invalid_type(row, COUNTERMEASURES.name))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|items| items.join("\n")),
        _ => text_field(obj, row, &COUNTERMEASURES),
    }
}

fn int_field(obj: &Map<String, Value>, row: usize, field: &FieldKeys) -> Result<i64, SchemaError> {
    let value = lookup(obj, row, field)?;
    coerce_int(value).ok_or_else(|| SchemaError::invalid_type(row, field.name))
}

/// Integers, integral floats and numeric strings.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::SchemaErrorKind;

    fn row(stage: &str, f: Value, s: Value) -> Value {
        json!({"단계": stage, "위험요인": "추락", "대책": "- 안전대 체결\n- 작업발판 점검", "빈도": f, "강도": s})
    }

    #[test]
    fn preserves_source_order() {
        let value = json!([
            row("작업준비", json!(2), json!(3)),
            row("본작업: 비계 해체", json!(2), json!(4)),
            row("작업종료/정리", json!(1), json!(2)),
        ]);
        let stages: Vec<_> = validate_rows(&value)
            .unwrap()
            .into_iter()
            .map(|r| r.stage)
            .collect();
        assert_eq!(stages, vec!["작업준비", "본작업: 비계 해체", "작업종료/정리"]);
    }

    #[test]
    fn missing_severity_rejects_whole_batch() {
        let mut second = row("본작업", json!(2), json!(2));
        second.as_object_mut().unwrap().remove("강도");
        let value = json!([row("작업준비", json!(1), json!(1)), second, row("작업종료/정리", json!(1), json!(1))]);

        let err = validate_rows(&value).unwrap_err();
        assert_eq!(err, SchemaError::missing(2, "severity"));
    }

    #[test]
    fn accepts_english_keys() {
        let value = json!([{
            "stage": "preparation",
            "hazard": "loose clothing",
            "countermeasures": "- check PPE\n- tie sleeves",
            "frequency": 2,
            "severity": 3
        }]);
        let rows = validate_rows(&value).unwrap();
        assert_eq!(rows[0].score(), 6);
    }

    #[test]
    fn coerces_numeric_strings_and_integral_floats() {
        let value = json!([row("작업준비", json!(" 3 "), json!(2.0))]);
        let rows = validate_rows(&value).unwrap();
        assert_eq!((rows[0].frequency, rows[0].severity), (3, 2));
    }

    #[test]
    fn rejects_non_integral_frequency() {
        let value = json!([row("작업준비", json!(2.5), json!(2))]);
        let err = validate_rows(&value).unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::InvalidType);
        assert_eq!(err.field, "frequency");
        assert_eq!(err.row, 1);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let value = json!([row("본작업", json!(7), json!(4))]);
        let rows = validate_rows(&value).unwrap();
        assert_eq!(rows[0].score(), 28);
    }

    #[test]
    fn countermeasure_lists_are_joined() {
        let value = json!([{
            "단계": "작업준비", "위험요인": "h", "대책": ["- a", "- b"], "빈도": 1, "강도": 1
        }]);
        assert_eq!(validate_rows(&value).unwrap()[0].countermeasures, "- a\n- b");
    }

    #[test]
    fn root_must_be_an_array() {
        let err = validate_rows(&json!({"rows": []})).unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::NotAnArray);
    }

    #[test]
    fn null_counts_as_missing() {
        let value = json!([row("작업준비", Value::Null, json!(1))]);
        assert_eq!(
            validate_rows(&value).unwrap_err(),
            SchemaError::missing(1, "frequency")
        );
    }
}
