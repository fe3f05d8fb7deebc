//! Plain-text presentations of a risk table.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    models::{RiskBand, RiskRow},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Dense report table, one line per row.
    #[default]
    Table,
    /// One card per row, marked by risk band.
    Cards,
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "pc" => Ok(ViewMode::Table),
            "cards" | "card" | "mobile" => Ok(ViewMode::Cards),
            other => Err(Error::Config(format!("unknown view mode `{other}`"))),
        }
    }
}

pub fn render(rows: &[RiskRow], mode: ViewMode) -> String {
    match mode {
        ViewMode::Table => render_table(rows),
        ViewMode::Cards => render_cards(rows),
    }
}

/// Markdown-style table. Countermeasure bullets share one cell, separated
/// by `<br>`.
pub fn render_table(rows: &[RiskRow]) -> String {
    let mut out = String::from("| 단계 | 위험요인 | 대책 | 빈도 | 강도 | 위험성 | 등급 |\n");
    out.push_str("|:---:|:---:|:---|:---:|:---:|:---:|:---:|\n");
    for row in rows {
        let measures = row
            .countermeasure_items()
            .iter()
            .map(|item| format!("- {}", cell(item)))
            .collect::<Vec<_>>()
            .join("<br>");
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            cell(&row.stage),
            cell(&row.hazard),
            measures,
            row.frequency,
            row.severity,
            row.score(),
            band_label(row.band()),
        ));
    }
    out
}

pub fn render_cards(rows: &[RiskRow]) -> String {
    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let band = row.band();
        out.push_str(&format!(
            "┌ Step {} [{}]  {} ({})\n",
            index + 1,
            row.stage,
            band_label(band),
            row.score()
        ));
        out.push_str(&format!("│ ⚠️ {}\n", row.hazard));
        for item in row.countermeasure_items() {
            out.push_str(&format!("│   - {item}\n"));
        }
        out.push_str("└\n");
    }
    out
}

fn band_label(band: RiskBand) -> String {
    format!("{} {}", band.marker(), band.label())
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
