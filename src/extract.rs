//! # Spreadsheet Extraction
//!
//! Reads one sheet per [`SheetTemplate`] into a [`RawSheetTable`]: resolved
//! headers plus the data rows, with trivia removed.
//!
//! Trivia is recognised by what it contains rather than where it sits:
//! - unit marker rows hold nothing but a unit label such as "GWh" or "Mcm"
//! - note rows hold text but no numbers; the template declares how many trail the data
//! - blank rows are dropped wherever they appear
//!
//! The orientation of the table is left untouched here; see [`crate::reshape`].

pub mod cells;

use self::cells::Cell;
use crate::template::SheetTemplate;
use crate::{EtlError, EtlResult};
use calamine::{Data, Range, Reader, open_workbook_auto};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Unit labels that may appear alone on a marker row under the header.
const UNIT_MARKERS: [&str; 7] = ["GWh", "MWh", "TWh", "Mcm", "PJ", "TJ", "MW"];

/// One data row of a sheet. `label` is the first column of the template span.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based row number in the sheet, for error messages.
    pub row_num: u32,
    pub label: String,
    pub cells: Vec<Cell>,
}

impl RawRow {
    /// Numeric cells, NaN where a cell is empty or not a number.
    pub fn values(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|c| c.as_f64().unwrap_or(f64::NAN))
            .collect()
    }

    fn has_numbers(&self) -> bool {
        self.cells.iter().any(|c| c.as_f64().is_some())
    }

    fn is_blank(&self) -> bool {
        self.label.is_empty() && self.cells.iter().all(Cell::is_empty)
    }

    fn is_unit_marker(&self, unit: &str) -> bool {
        let texts: Vec<String> = std::iter::once(self.label.clone())
            .chain(self.cells.iter().map(Cell::label))
            .filter(|t| !t.is_empty())
            .collect();
        !texts.is_empty()
            && texts.iter().all(|t| {
                t.eq_ignore_ascii_case(unit) || UNIT_MARKERS.iter().any(|u| t.eq_ignore_ascii_case(u))
            })
    }
}

/// Tabular data as it came out of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheetTable {
    pub template_id: String,
    pub sheet: String,
    /// `headers[0]` is "Financial Year" or "Source"; the rest label the value columns.
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawSheetTable {
    pub fn value_headers(&self) -> &[String] {
        &self.headers[1..]
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

// ================================================
// PUBLIC FUNCTIONS
// ================================================

/// Open the template's workbook under `data_dir` and extract its sheet.
///
/// # Errors
/// - Workbook missing or unreadable
/// - Sheet not present in the workbook
/// - Any layout error raised by [`extract_range`]
#[instrument(level = "info", skip(data_dir, template), fields(sheet = %template.location()))]
pub fn extract_sheet(data_dir: &Path, template: &SheetTemplate) -> EtlResult<RawSheetTable> {
    let path = data_dir.join(&template.workbook);
    let mut workbook = open_workbook_auto(&path)?;

    // Check if the expected sheet is present
    let sheet_names = workbook.sheet_names().to_owned();
    if !sheet_names.iter().any(|n| n == &template.sheet) {
        return Err(EtlError::format(
            template.location(),
            format!("sheet not found; workbook has {sheet_names:?}"),
        ));
    }

    let range = workbook.worksheet_range(&template.sheet)?;
    let table = extract_range(&range, template)?;
    info!(
        rows = table.height(),
        columns = table.width(),
        "extracted sheet"
    );
    Ok(table)
}

/// Resolve headers and data rows of an already loaded sheet range.
///
/// Positions are absolute sheet coordinates, so the result does not depend on
/// where the reader decided the used range starts.
///
/// # Errors
/// - `Format` if the header row is empty, the first column is labeled with
///   something other than the canonical label, the number of labeled value
///   columns differs from the template span, a header repeats, an expected
///   header is absent, the declared note rows hold data, or no data rows remain
pub fn extract_range(range: &Range<Data>, template: &SheetTemplate) -> EtlResult<RawSheetTable> {
    let columns = template.column_range()?;
    let header_row = template.skip_rows;
    let location = template.location();
    let label_header = template.orientation.label_header();

    // Headers
    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|c| Cell::from_data(range.get_value((header_row, c))))
        .collect();

    if header_cells.iter().all(Cell::is_empty) {
        return Err(EtlError::format(
            &location,
            format!("header row {} is empty", header_row + 1),
        ));
    }

    let first = header_cells[0].label();
    if !first.is_empty() && !first.eq_ignore_ascii_case(label_header) {
        return Err(EtlError::format(
            &location,
            format!("expected an unlabeled first column, found '{first}'"),
        ));
    }

    let value_headers: Vec<String> = header_cells[1..]
        .iter()
        .map(Cell::label)
        .filter(|h| !h.is_empty())
        .collect();
    if value_headers.len() != columns.width() - 1 {
        return Err(EtlError::format(
            &location,
            format!(
                "template span {columns} expects {} labeled columns, found {}",
                columns.width() - 1,
                value_headers.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = value_headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(EtlError::format(
            &location,
            format!("header '{dup}' appears more than once"),
        ));
    }

    if let Some(absent) = template
        .expected_headers
        .iter()
        .find(|h| !value_headers.contains(h))
    {
        return Err(EtlError::format(
            &location,
            format!("expected header '{absent}' is absent"),
        ));
    }

    let mut headers = Vec::with_capacity(columns.width());
    headers.push(label_header.to_string());
    headers.extend(value_headers);

    // Rows below the header, blank ones dropped
    let last_row = range.end().map(|(r, _)| r).unwrap_or(header_row);
    let mut rows: Vec<RawRow> = (header_row + 1..=last_row)
        .map(|r| {
            let mut cells: Vec<Cell> = columns
                .iter()
                .map(|c| Cell::from_data(range.get_value((r, c))))
                .collect();
            let label = cells.remove(0).label();
            RawRow {
                row_num: r + 1,
                label,
                cells,
            }
        })
        .filter(|row| !row.is_blank())
        .collect();

    // Trailing notes
    let notes = template.note_rows;
    if notes > rows.len() {
        return Err(EtlError::format(
            &location,
            format!("expected {notes} note rows but only {} rows follow the header", rows.len()),
        ));
    }
    let data_len = rows.len() - notes;
    if let Some(row) = rows[data_len..].iter().find(|row| row.has_numbers()) {
        return Err(EtlError::format(
            &location,
            format!(
                "expected {notes} trailing note rows but row {} holds data",
                row.row_num
            ),
        ));
    }
    rows.truncate(data_len);

    // Leading unit markers
    let unit = template.unit.label();
    let markers = rows.iter().take_while(|row| row.is_unit_marker(unit)).count();
    if markers > 0 {
        debug!(markers, "dropped unit marker rows");
        rows.drain(..markers);
    }

    if rows.is_empty() {
        return Err(EtlError::format(&location, "no data rows"));
    }

    Ok(RawSheetTable {
        template_id: template.id.clone(),
        sheet: template.sheet.clone(),
        headers,
        rows,
    })
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Dataset, Orientation, SourceUnit};

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    /// Lay `rows` out starting at absolute position `origin`.
    fn sheet_at(origin: (u32, u32), rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(1) as u32;
        let mut range = Range::new(origin, (origin.0 + height - 1, origin.1 + width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((origin.0 + r as u32, origin.1 + c as u32), cell);
            }
        }
        range
    }

    fn years_template(note_rows: usize) -> SheetTemplate {
        SheetTemplate::builder()
            .id("table_l")
            .workbook("l.xlsx")
            .sheet("Aus")
            .columns("B:D")
            .orientation(Orientation::RowsAreYears)
            .note_rows(note_rows)
            .unit(SourceUnit::GigawattHours)
            .dataset(Dataset::ElectricityConsumption)
            .expected_headers(vec!["Victoria".into(), "Tasmania".into()])
            .build()
    }

    fn table_l_sheet() -> Range<Data> {
        // Header at row 5 (index 4), data starting in column B
        sheet_at(
            (4, 1),
            vec![
                vec![Data::Empty, text("Victoria"), text("Tasmania")],
                vec![Data::Empty, text("GWh"), Data::Empty],
                vec![text("2007-08"), Data::Float(40.0), Data::Float(10.0)],
                vec![text("2008-09"), Data::Float(41.0), Data::Float(11.0)],
                vec![Data::Empty, Data::Empty, Data::Empty],
                vec![text("2009-10"), Data::Float(42.0), Data::Float(12.0)],
                vec![text("Notes: (a) preliminary"), Data::Empty, Data::Empty],
                vec![text("Source: DCCEEW"), Data::Empty, Data::Empty],
            ],
        )
    }

    #[test]
    fn test_extracts_rows_are_years_sheet() {
        let table = extract_range(&table_l_sheet(), &years_template(2)).unwrap();

        assert_eq!(table.headers, vec!["Financial Year", "Victoria", "Tasmania"]);
        assert_eq!(table.value_headers(), &["Victoria".to_string(), "Tasmania".to_string()]);
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["2007-08", "2008-09", "2009-10"]);
        assert_eq!(table.rows[1].values(), vec![41.0, 11.0]);
        assert_eq!(table.rows[0].row_num, 7);
    }

    #[test]
    fn test_note_rows_holding_data_are_rejected() {
        let err = extract_range(&table_l_sheet(), &years_template(3)).unwrap_err();
        assert!(matches!(err, EtlError::Format { .. }));
        assert!(err.to_string().contains("holds data"));
    }

    #[test]
    fn test_too_many_note_rows() {
        let err = extract_range(&table_l_sheet(), &years_template(20)).unwrap_err();
        assert!(matches!(err, EtlError::Format { .. }));
    }

    #[test]
    fn test_missing_expected_header() {
        let range = sheet_at(
            (4, 1),
            vec![
                vec![Data::Empty, text("Victoria"), text("Queensland")],
                vec![text("2008-09"), Data::Float(41.0), Data::Float(11.0)],
            ],
        );
        let err = extract_range(&range, &years_template(0)).unwrap_err();
        assert!(err.to_string().contains("'Tasmania' is absent"));
    }

    #[test]
    fn test_column_count_mismatch() {
        let range = sheet_at(
            (4, 1),
            vec![
                vec![Data::Empty, text("Victoria"), Data::Empty],
                vec![text("2008-09"), Data::Float(41.0), Data::Float(11.0)],
            ],
        );
        let err = extract_range(&range, &years_template(0)).unwrap_err();
        assert!(err.to_string().contains("expects 2 labeled columns, found 1"));
    }

    #[test]
    fn test_empty_header_row_and_no_data() {
        let blank = sheet_at((0, 0), vec![vec![text("title")]]);
        let err = extract_range(&blank, &years_template(0)).unwrap_err();
        assert!(err.to_string().contains("header row 5 is empty"));

        let header_only = sheet_at(
            (4, 1),
            vec![
                vec![Data::Empty, text("Victoria"), text("Tasmania")],
                vec![Data::Empty, text("GWh"), Data::Empty],
            ],
        );
        let err = extract_range(&header_only, &years_template(0)).unwrap_err();
        assert!(err.to_string().contains("no data rows"));
    }

    #[test]
    fn test_labeled_first_column() {
        let canonical = sheet_at(
            (4, 1),
            vec![
                vec![text("Financial Year"), text("Victoria"), text("Tasmania")],
                vec![text("2008-09"), Data::Float(41.0), Data::Float(11.0)],
            ],
        );
        assert!(extract_range(&canonical, &years_template(0)).is_ok());

        let other = sheet_at(
            (4, 1),
            vec![
                vec![text("Fuel"), text("Victoria"), text("Tasmania")],
                vec![text("2008-09"), Data::Float(41.0), Data::Float(11.0)],
            ],
        );
        assert!(extract_range(&other, &years_template(0)).is_err());
    }

    #[test]
    fn test_duplicate_headers() {
        let range = sheet_at(
            (4, 1),
            vec![
                vec![Data::Empty, text("Victoria"), text("Victoria")],
                vec![text("2008-09"), Data::Float(41.0), Data::Float(11.0)],
            ],
        );
        let mut template = years_template(0);
        template.expected_headers.clear();
        let err = extract_range(&range, &template).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_categories_sheet_keeps_source_label() {
        let range = sheet_at(
            (4, 1),
            vec![
                vec![Data::Empty, text("2008-09"), text("2009-10")],
                vec![text("Coal"), Data::Float(1.0), Data::Float(2.0)],
                vec![text("Total"), Data::Float(3.0), Data::Float(4.0)],
            ],
        );
        let template = SheetTemplate::builder()
            .id("table_o_vic")
            .workbook("o.xlsx")
            .sheet("VIC FY")
            .columns("B:D")
            .orientation(Orientation::RowsAreCategories)
            .unit(SourceUnit::GigawattHours)
            .dataset(Dataset::ElectricityGeneration {
                abbreviation: "VIC".into(),
            })
            .build();
        let table = extract_range(&range, &template).unwrap();
        assert_eq!(table.headers, vec!["Source", "2008-09", "2009-10"]);
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn test_missing_workbook_is_an_error() {
        let dir = std::env::temp_dir().join("aes-energy-etl-no-such-dir");
        let result = extract_sheet(&dir, &years_template(0));
        assert!(result.is_err());
    }
}
