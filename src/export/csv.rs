//! Delimited-text export of a risk table.
//!
//! Columns: 단계, 위험요인, 대책, 빈도, 강도, 위험성, 등급. Output is UTF-8 with a
//! leading BOM so spreadsheet tools detect the encoding of Korean text.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{error::Result, models::RiskRow};

const BOM: &str = "\u{feff}";

#[derive(Debug, Serialize, Deserialize)]
struct ExportRecord {
    #[serde(rename = "단계")]
    stage: String,
    #[serde(rename = "위험요인")]
    hazard: String,
    #[serde(rename = "대책")]
    countermeasures: String,
    #[serde(rename = "빈도")]
    frequency: i64,
    #[serde(rename = "강도")]
    severity: i64,
    #[serde(rename = "위험성")]
    score: i64,
    #[serde(rename = "등급")]
    band: String,
}

impl From<&RiskRow> for ExportRecord {
    fn from(row: &RiskRow) -> Self {
        Self {
            stage: row.stage.clone(),
            hazard: row.hazard.clone(),
            countermeasures: row.countermeasures.clone(),
            frequency: row.frequency,
            severity: row.severity,
            score: row.score(),
            band: row.band().label().to_owned(),
        }
    }
}

impl From<ExportRecord> for RiskRow {
    /// Derived columns are recomputed, not trusted.
    fn from(record: ExportRecord) -> Self {
        RiskRow::new(
            record.stage,
            record.hazard,
            record.countermeasures,
            record.frequency,
            record.severity,
        )
    }
}

pub fn export_csv<W: Write>(rows: &[RiskRow], mut writer: W) -> Result<()> {
    writer.write_all(BOM.as_bytes())?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(ExportRecord::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn import_csv<R: Read>(mut reader: R) -> Result<Vec<RiskRow>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let body = text.strip_prefix(BOM).unwrap_or(&text);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<ExportRecord>() {
        rows.push(record?.into());
    }
    Ok(rows)
}

pub fn export_file(rows: &[RiskRow], path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    export_csv(rows, std::io::BufWriter::new(file))
}

pub fn import_file(path: impl AsRef<Path>) -> Result<Vec<RiskRow>> {
    import_csv(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows() -> Vec<RiskRow> {
        vec![
            RiskRow::new("작업준비", "복장 불량, \"끼임\" 위험", "- 안전모 착용\n- 소매 정리", 2, 3),
            RiskRow::new("본작업: 비계 해체", "추락", "- 안전대 체결\\n- 하부 통제", 2, 4),
            RiskRow::new("작업종료/정리", "자재 낙하", "- 정리정돈\n- 통로 확보", 1, 2),
        ]
    }

    #[test]
    fn export_starts_with_bom_and_korean_header() {
        let mut out = Vec::new();
        export_csv(&rows(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\u{feff}단계,위험요인,대책,빈도,강도,위험성,등급"));
        assert!(text.contains(",2,3,6,상"));
        assert!(text.contains(",1,2,2,하"));
    }

    #[test]
    fn round_trip_keeps_row_tuples() {
        let mut out = Vec::new();
        export_csv(&rows(), &mut out).unwrap();
        let imported = import_csv(out.as_slice()).unwrap();

        let key = |r: &RiskRow| (r.stage.clone(), r.hazard.clone(), r.frequency, r.severity);
        assert_eq!(
            imported.iter().map(key).collect::<Vec<_>>(),
            rows().iter().map(key).collect::<Vec<_>>()
        );
        assert_eq!(imported, rows());
    }

    #[test]
    fn countermeasures_keep_the_literal_line_break_marker() {
        let mut out = Vec::new();
        export_csv(&rows()[1..2], &mut out).unwrap();
        let imported = import_csv(out.as_slice()).unwrap();
        assert_eq!(imported[0].countermeasures, r"- 안전대 체결\n- 하부 통제");
        assert_eq!(imported[0].countermeasure_items(), vec!["안전대 체결", "하부 통제"]);
    }

    #[test]
    fn import_without_bom() {
        let text = "단계,위험요인,대책,빈도,강도,위험성,등급\n작업준비,h,c,3,2,99,하\n";
        let rows = import_csv(text.as_bytes()).unwrap();
        assert_eq!(rows[0].score(), 6);
    }
}
