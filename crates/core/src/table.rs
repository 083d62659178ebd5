//! Measurement table export
//!
//! One row per metric with section header rows between analyses. The same
//! [`TableRow::cells`] strings feed delimited export and the text renderer, so
//! every consumer shows identical values.

use crate::config::AnalysisSelection;
use crate::metric::{Analysis, MetricResult};
use crate::narrative::{interpretation_word, Locale, PLACEHOLDER};
use crate::sheet::MeasurementSheet;
use std::io::Write;

/// Error types for table export
#[derive(Debug, thiserror::Error)]
pub enum TableExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

pub type TableExportResult<T> = Result<T, TableExportError>;

pub const HEADERS: [&str; 6] = ["Metric", "Value", "Norm", "Unit", "z-score", "Interpretation"];

/// Configuration for delimited export
#[derive(Debug, Clone)]
pub struct TableExportConfig {
    /// Include column headers in the output
    pub include_headers: bool,

    /// Field delimiter
    pub delimiter: u8,
}

impl Default for TableExportConfig {
    fn default() -> Self {
        Self {
            include_headers: true,
            delimiter: b',',
        }
    }
}

/// One line of the measurement table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    /// Sentinel row naming an analysis; other columns are empty
    Section(String),
    Metric {
        name: String,
        value: String,
        norm: String,
        unit: String,
        z_score: String,
        interpretation: String,
    },
}

impl TableRow {
    pub fn section(analysis: Analysis) -> Self {
        TableRow::Section(format!("— {} —", analysis.title()))
    }

    pub fn metric(result: &MetricResult, locale: Locale) -> Self {
        TableRow::Metric {
            name: result.name.to_string(),
            value: format_value(result.value),
            norm: format!("{:.2}", result.norm.mean),
            unit: result.unit.symbol().to_string(),
            z_score: format_z_score(result.z_score),
            interpretation: interpretation_word(result.judgment, locale).to_string(),
        }
    }

    pub fn is_section(&self) -> bool {
        matches!(self, TableRow::Section(_))
    }

    /// Cells in column order
    pub fn cells(&self) -> [&str; 6] {
        match self {
            TableRow::Section(title) => [title.as_str(), "", "", "", "", ""],
            TableRow::Metric {
                name,
                value,
                norm,
                unit,
                z_score,
                interpretation,
            } => [
                name.as_str(),
                value.as_str(),
                norm.as_str(),
                unit.as_str(),
                z_score.as_str(),
                interpretation.as_str(),
            ],
        }
    }
}

/// Two decimals, or the placeholder
pub fn format_value(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Signed, two decimals, or the placeholder
pub fn format_z_score(z: Option<f64>) -> String {
    z.map(|z| format!("{z:+.2}"))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Rows for the enabled analyses, in display order
pub fn build_rows(
    sheet: &MeasurementSheet,
    selection: &AnalysisSelection,
    locale: Locale,
) -> Vec<TableRow> {
    let mut rows = Vec::new();
    for analysis in Analysis::ALL {
        if !selection.includes(analysis) {
            continue;
        }
        rows.push(TableRow::section(analysis));
        rows.extend(sheet.section(analysis).map(|m| TableRow::metric(m, locale)));
    }
    rows
}

/// Write rows as delimited text
pub fn export_csv<W: Write>(
    writer: W,
    rows: &[TableRow],
    config: &TableExportConfig,
) -> TableExportResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.include_headers)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    if config.include_headers {
        csv_writer.write_record(HEADERS)?;
    }

    for row in rows {
        csv_writer.write_record(row.cells())?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export rows to a delimited string
pub fn export_csv_string(
    rows: &[TableRow],
    config: &TableExportConfig,
) -> TableExportResult<String> {
    let mut buffer = Vec::new();
    export_csv(&mut buffer, rows, config)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Fixed-width rendering for terminals
///
/// Widths are counted in characters so the em-dash and degree sign align.
pub fn render_text(rows: &[TableRow]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows.iter().filter(|row| !row.is_section()) {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &HEADERS, &widths);
    for row in rows {
        match row {
            TableRow::Section(title) => {
                out.push_str(title);
                out.push('\n');
            }
            TableRow::Metric { .. } => push_line(&mut out, &row.cells(), &widths),
        }
    }
    out
}

fn push_line(out: &mut String, cells: &[&str; 6], widths: &[usize; 6]) {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        let pad = width.saturating_sub(cell.chars().count());
        // Numeric columns are right-aligned
        if matches!(index, 1 | 2 | 4) {
            line.extend(std::iter::repeat(' ').take(pad));
            line.push_str(cell);
        } else {
            line.push_str(cell);
            line.extend(std::iter::repeat(' ').take(pad));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::landmark::{LandmarkKey, LandmarkSet};
    use crate::metric::{MetricId, NormTable};
    use crate::sheet::compute_all;

    fn partial_sheet() -> MeasurementSheet {
        let landmarks: LandmarkSet = [
            (LandmarkKey::Sella, Point::new(0.0, 100.0)),
            (LandmarkKey::Nasion, Point::new(0.0, 0.0)),
            (LandmarkKey::PointA, Point::new(50.0, -10.0)),
        ]
        .into_iter()
        .collect();
        compute_all(&landmarks, None, &NormTable::new())
    }

    #[test]
    fn test_section_rows() {
        let rows = build_rows(&partial_sheet(), &AnalysisSelection::default(), Locale::En);
        let sections: Vec<&str> = rows
            .iter()
            .filter(|row| row.is_section())
            .map(|row| row.cells()[0])
            .collect();
        assert_eq!(
            sections,
            ["— Steiner —", "— Björk–Jarabak —", "— Soft tissue —", "— Extended —"]
        );
        assert_eq!(rows.len(), 4 + 21);
        assert_eq!(rows[0].cells()[1..], ["", "", "", "", ""]);
    }

    #[test]
    fn test_metric_row_cells() {
        let sheet = partial_sheet();
        let sna = TableRow::metric(sheet.get(MetricId::Sna), Locale::En);
        assert_eq!(sna.cells(), ["SNA", "101.31", "82.00", "°", "+6.44", "increased"]);

        let anb = TableRow::metric(sheet.get(MetricId::Anb), Locale::Es);
        assert_eq!(anb.cells(), ["ANB", "—", "2.00", "°", "—", "—"]);

        let pg = TableRow::metric(sheet.get(MetricId::PgNb), Locale::En);
        assert_eq!(pg.cells()[3], "px");
    }

    #[test]
    fn test_selection_filters_sections() {
        let selection = AnalysisSelection {
            steiner: true,
            bjork_jarabak: false,
            soft_tissue: false,
            extended: false,
        };
        let rows = build_rows(&partial_sheet(), &selection, Locale::En);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0], TableRow::Section("— Steiner —".to_string()));
    }

    #[test]
    fn test_export_csv_headers_and_delimiter() {
        let rows = build_rows(&partial_sheet(), &AnalysisSelection::default(), Locale::En);

        let csv = export_csv_string(&rows, &TableExportConfig::default()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Metric,Value,Norm,Unit,z-score,Interpretation"));
        assert_eq!(lines.next(), Some("— Steiner —,,,,,"));
        assert_eq!(lines.next(), Some("SNA,101.31,82.00,°,+6.44,increased"));

        let config = TableExportConfig {
            include_headers: false,
            delimiter: b';',
        };
        let csv = export_csv_string(&rows, &config).unwrap();
        assert_eq!(csv.lines().next(), Some("— Steiner —;;;;;"));
    }

    #[test]
    fn test_csv_quotes_names_containing_delimiter() {
        let rows = vec![TableRow::Section("a,b".to_string())];
        let config = TableExportConfig {
            include_headers: false,
            ..Default::default()
        };
        assert_eq!(export_csv_string(&rows, &config).unwrap(), "\"a,b\",,,,,\n");
    }

    #[test]
    fn test_text_matches_csv_values() {
        let rows = build_rows(&partial_sheet(), &AnalysisSelection::default(), Locale::En);
        let text = render_text(&rows);
        let csv = export_csv_string(&rows, &TableExportConfig::default()).unwrap();

        let sna_text = text.lines().find(|l| l.starts_with("SNA ")).unwrap();
        let sna_csv = csv.lines().find(|l| l.starts_with("SNA,")).unwrap();
        let text_cells: Vec<&str> = sna_text.split_whitespace().collect();
        let csv_cells: Vec<&str> = sna_csv.split(',').collect();
        assert_eq!(text_cells, csv_cells);
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_value(Some(1.005)), "1.00");
        assert_eq!(format_value(None), "—");
        assert_eq!(format_z_score(Some(0.5)), "+0.50");
        assert_eq!(format_z_score(Some(-1.25)), "-1.25");
        assert_eq!(format_z_score(None), "—");
    }
}
